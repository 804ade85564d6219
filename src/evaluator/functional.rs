//! @ai:module:intent Score a functional suite by a single base run
//! @ai:module:layer domain
//! @ai:module:public_api score, evaluate

use crate::dataset::Language;
use crate::execution::{
    ExecutionBackend, ExecutionOutcome, ExecutionRequest, IsolationKey, Variant,
};
use crate::metrics::FunctionalCounters;

/// @ai:intent Passed tests out of those that ran; a failed run contributes nothing
/// @ai:effects pure
pub fn score(outcome: &ExecutionOutcome) -> FunctionalCounters {
    match outcome {
        Ok(counts) => FunctionalCounters {
            passed: u64::from(counts.net_passed()),
            total: u64::from(counts.ran),
        },
        Err(_) => FunctionalCounters::default(),
    }
}

/// @ai:effects fs:write, process
pub async fn evaluate<B: ExecutionBackend>(
    backend: &B,
    language: Language,
    code: &str,
    tests: &str,
    key: &IsolationKey,
) -> ExecutionOutcome {
    let request = ExecutionRequest {
        code,
        tests,
        language,
        key,
        variant: Variant::Base,
    };
    backend.execute(&request).await
}
