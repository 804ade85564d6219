//! @ai:module:intent Score correct-scenario and incorrect-scenario test blocks
//! @ai:module:layer domain
//! @ai:module:public_api SEPARATOR, split_generated, score, evaluate

use crate::dataset::Language;
use crate::execution::{
    ExecutionBackend, ExecutionOutcome, ExecutionRequest, IsolationKey, Variant,
};
use crate::metrics::IntegrationalCounters;

/// Literal marker dividing correct-scenario tests from incorrect-scenario tests
pub const SEPARATOR: &str = "### INCORRECT TESTS ###";

/// @ai:intent Split a generation into (correct, incorrect) blocks.
///            Anything but exactly one separator invalidates the whole unit.
/// @ai:effects pure
pub fn split_generated(text: &str) -> Option<(&str, &str)> {
    let mut parts = text.split(SEPARATOR);
    let correct = parts.next()?;
    let incorrect = parts.next()?;

    if parts.next().is_some() {
        return None;
    }

    Some((correct, incorrect))
}

/// @ai:intent Fold both runs into an integrational contribution.
///            Incorrect-scenario credit requires at least one net pass in
///            the correct-scenario run.
/// @ai:effects pure
pub fn score(correct: &ExecutionOutcome, incorrect: &ExecutionOutcome) -> IntegrationalCounters {
    let mut contribution = IntegrationalCounters::default();

    let correct_net = match correct {
        Ok(counts) => {
            contribution.total_correct = u64::from(counts.ran);
            contribution.correct = u64::from(counts.net_passed());
            counts.net_passed()
        }
        Err(_) => 0,
    };

    if let Ok(counts) = incorrect {
        contribution.total_incorrect = u64::from(counts.ran);

        if correct_net != 0 {
            contribution.incorrect = u64::from(counts.failed) + u64::from(counts.errored);
        }
    }

    contribution
}

/// @ai:intent Run both blocks against the base code
/// @ai:effects fs:write, process
pub async fn evaluate<B: ExecutionBackend>(
    backend: &B,
    language: Language,
    code: &str,
    correct_tests: &str,
    incorrect_tests: &str,
    key: &IsolationKey,
) -> (ExecutionOutcome, ExecutionOutcome) {
    let correct_request = ExecutionRequest {
        code,
        tests: correct_tests,
        language,
        key,
        variant: Variant::Base,
    };
    let correct = backend.execute(&correct_request).await;

    let incorrect_request = ExecutionRequest {
        tests: incorrect_tests,
        ..correct_request
    };
    let incorrect = backend.execute(&incorrect_request).await;

    (correct, incorrect)
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

    #[test]
    fn test_split_on_single_separator() {
        let text = format!("def test_ok(): pass\n{SEPARATOR}\ndef test_bad(): pass\n");
        let (correct, incorrect) = split_generated(&text).unwrap();
        assert!(correct.contains("test_ok"));
        assert!(incorrect.contains("test_bad"));
        assert!(!incorrect.contains(SEPARATOR));
    }

    #[test]
    fn test_split_rejects_missing_or_repeated_separator() {
        assert_eq!(split_generated("func TestA(t *testing.T) {}"), None);

        let twice = format!("a{SEPARATOR}b{SEPARATOR}c");
        assert_eq!(split_generated(&twice), None);
    }

    #[test]
    fn test_both_blocks_scored() {
        let contribution = score(&ok(4, 0, 1), &ok(3, 1, 1));
        assert_eq!(
            contribution,
            IntegrationalCounters {
                correct: 3,
                incorrect: 2,
                total_correct: 4,
                total_incorrect: 3,
            }
        );
    }

    #[test]
    fn test_no_incorrect_credit_without_correct_net_pass() {
        let contribution = score(&ok(3, 1, 2), &ok(5, 0, 5));
        assert_eq!(
            contribution,
            IntegrationalCounters {
                correct: 0,
                incorrect: 0,
                total_correct: 3,
                total_incorrect: 5,
            }
        );
    }

    #[test]
    fn test_failed_correct_run_blocks_incorrect_credit() {
        let correct = Err(ExecutionFailure::Parse("garbled".to_string()));
        let contribution = score(&correct, &ok(2, 0, 2));
        assert_eq!(
            contribution,
            IntegrationalCounters {
                total_incorrect: 2,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_failed_incorrect_run_keeps_correct_figures() {
        let incorrect = Err(ExecutionFailure::Parse("garbled".to_string()));
        let contribution = score(&ok(2, 0, 0), &incorrect);
        assert_eq!(
            contribution,
            IntegrationalCounters {
                correct: 2,
                total_correct: 2,
                ..Default::default()
            }
        );
    }

    #[tokio::test]
    async fn test_evaluate_runs_both_blocks_against_base() {
        let backend = ScriptedBackend::new(vec![ok(2, 0, 0), ok(2, 0, 2)]);
        let key = IsolationKey::new("temp_i");

        let (correct, incorrect) =
            evaluate(&backend, Language::Go, "code", "good", "bad", &key).await;
        assert!(correct.is_ok() && incorrect.is_ok());

        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|c| c.code == "code" && c.variant == Variant::Base));
        assert_eq!(calls[0].tests, "good");
        assert_eq!(calls[1].tests, "bad");
    }
}
