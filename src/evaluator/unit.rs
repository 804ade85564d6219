//! @ai:module:intent Score a unit-test suite by paired base/mutated execution
//! @ai:module:layer domain
//! @ai:module:public_api score, evaluate

use crate::dataset::Language;
use crate::execution::{
    ExecutionBackend, ExecutionOutcome, ExecutionRequest, IsolationKey, Variant,
};
use crate::metrics::UnitCounters;
use std::time::Duration;

/// @ai:intent Fold a base and a mutated run into a unit contribution.
///            A failed base run contributes nothing, and mutation credit
///            needs both runs and a changed (errored, failed) profile.
/// @ai:effects pure
pub fn score(base: &ExecutionOutcome, mutated: &ExecutionOutcome) -> UnitCounters {
    let mut contribution = UnitCounters::default();

    let Ok(base) = base else {
        return contribution;
    };

    contribution.total = u64::from(base.ran);
    contribution.executable = u64::from(base.executed());
    contribution.spammy = u64::from(base.failed);

    if let Ok(mutated) = mutated {
        if base.errored != mutated.errored || base.failed != mutated.failed {
            contribution.mutated = u64::from(base.executed());
        }
    }

    contribution
}

/// @ai:intent Run the suite against base code, pause, run it against mutated code
/// @ai:effects fs:write, process, time
pub async fn evaluate<B: ExecutionBackend>(
    backend: &B,
    language: Language,
    code: &str,
    mutated_code: &str,
    tests: &str,
    key: &IsolationKey,
    mutation_delay: Duration,
) -> (ExecutionOutcome, ExecutionOutcome) {
    let base_request = ExecutionRequest {
        code,
        tests,
        language,
        key,
        variant: Variant::Base,
    };
    let base = backend.execute(&base_request).await;

    tokio::time::sleep(mutation_delay).await;

    let mutated_request = ExecutionRequest {
        code: mutated_code,
        variant: Variant::Mutated,
        ..base_request
    };
    let mutated = backend.execute(&mutated_request).await;

    (base, mutated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::testing::ScriptedBackend;
    use crate::execution::{ExecutionFailure, TestCounts};
    use pretty_assertions::assert_eq;

    fn ok(ran: u32, errored: u32, failed: u32) -> ExecutionOutcome {
        Ok(TestCounts::new(ran, errored, failed))
    }

    fn timeout() -> ExecutionOutcome {
        Err(ExecutionFailure::Timeout(Duration::from_secs(1)))
    }

    #[test]
    fn test_mutation_detected_when_failures_change() {
        let contribution = score(&ok(5, 0, 0), &ok(5, 0, 3));
        assert_eq!(
            contribution,
            UnitCounters {
                executable: 5,
                mutated: 5,
                total: 5,
                spammy: 0,
            }
        );
    }

    #[test]
    fn test_identical_profile_earns_no_mutation_credit() {
        let contribution = score(&ok(6, 1, 2), &ok(6, 1, 2));
        assert_eq!(
            contribution,
            UnitCounters {
                executable: 5,
                mutated: 0,
                total: 6,
                spammy: 2,
            }
        );
    }

    #[test]
    fn test_error_change_alone_counts_as_detection() {
        let contribution = score(&ok(4, 0, 1), &ok(4, 2, 1));
        assert_eq!(contribution.mutated, 4);
    }

    #[test]
    fn test_failed_mutated_run_keeps_base_figures() {
        let contribution = score(&ok(4, 1, 1), &timeout());
        assert_eq!(
            contribution,
            UnitCounters {
                executable: 3,
                mutated: 0,
                total: 4,
                spammy: 1,
            }
        );
    }

    #[test]
    fn test_failed_base_run_contributes_nothing() {
        assert_eq!(score(&timeout(), &ok(5, 0, 3)), UnitCounters::default());
    }

    #[tokio::test]
    async fn test_evaluate_runs_base_then_mutated() {
        let backend = ScriptedBackend::new(vec![ok(5, 0, 0), ok(5, 0, 3)]);
        let key = IsolationKey::new("temp_k");

        let (base, mutated) = evaluate(
            &backend,
            Language::Python,
            "base",
            "mutant",
            "tests",
            &key,
            Duration::ZERO,
        )
        .await;

        assert_eq!(base.unwrap(), TestCounts::new(5, 0, 0));
        assert_eq!(mutated.unwrap(), TestCounts::new(5, 0, 3));

        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].code, "base");
        assert_eq!(calls[0].variant, Variant::Base);
        assert_eq!(calls[1].code, "mutant");
        assert_eq!(calls[1].variant, Variant::Mutated);
        assert_eq!(calls[1].tests, "tests");
    }
}
