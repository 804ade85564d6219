//! @ai:module:intent Per-category scoring of generated test suites
//! @ai:module:layer application
//! @ai:module:public_api ScenarioEvaluator, ScoreStatus, SEPARATOR

pub mod functional;
pub mod integrational;
pub mod unit;

#[cfg(test)]
pub(crate) mod testing;

pub use integrational::{split_generated, SEPARATOR};

use crate::dataset::{Task, TaskKind};
use crate::execution::{ExecutionBackend, ExecutionOutcome, IsolationKey};
use crate::metrics::MetricsAggregatorTrait;
use std::time::Duration;

/// @ai:intent Whether a generation was scored or thrown away as malformed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreStatus {
    Scored,
    Discarded,
}

/// @ai:intent Binds an execution backend to the three scoring rules
pub struct ScenarioEvaluator<B: ExecutionBackend> {
    backend: B,
    mutation_delay: Duration,
}

impl<B: ExecutionBackend> ScenarioEvaluator<B> {
    /// @ai:intent Create an evaluator; `mutation_delay` separates base and mutated unit runs
    /// @ai:effects pure
    pub fn new(backend: B, mutation_delay: Duration) -> Self {
        Self {
            backend,
            mutation_delay,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// @ai:intent Execute the generated tests for a task and fold the result into the aggregator
    /// @ai:effects fs:write, process, state:write
    pub async fn evaluate<A: MetricsAggregatorTrait>(
        &self,
        task: &Task,
        tests: &str,
        key: &IsolationKey,
        aggregator: &mut A,
    ) -> ScoreStatus {
        match &task.kind {
            TaskKind::Unit {
                code, mutated_code, ..
            } => {
                let (base, mutated) = unit::evaluate(
                    &self.backend,
                    task.language,
                    code,
                    mutated_code,
                    tests,
                    key,
                    self.mutation_delay,
                )
                .await;
                log_failure(task, "base", &base);
                log_failure(task, "mutated", &mutated);

                let contribution = unit::score(&base, &mutated);
                tracing::info!(
                    "Task {}: {} executable, {} mutation-detecting, {} spammy of {}",
                    task.id,
                    contribution.executable,
                    contribution.mutated,
                    contribution.spammy,
                    contribution.total
                );
                aggregator.record_unit(task.language, contribution);
            }
            TaskKind::Integrational { code } => {
                let Some((correct_tests, incorrect_tests)) = split_generated(tests) else {
                    tracing::warn!(
                        "Discarding task {}: expected exactly one '{}' separator",
                        task.id,
                        SEPARATOR
                    );
                    return ScoreStatus::Discarded;
                };

                let (correct, incorrect) = integrational::evaluate(
                    &self.backend,
                    task.language,
                    code,
                    correct_tests,
                    incorrect_tests,
                    key,
                )
                .await;
                log_failure(task, "correct-scenario", &correct);
                log_failure(task, "incorrect-scenario", &incorrect);

                let contribution = integrational::score(&correct, &incorrect);
                tracing::info!(
                    "Task {}: {}/{} correct-scenario passed, {}/{} incorrect-scenario failed",
                    task.id,
                    contribution.correct,
                    contribution.total_correct,
                    contribution.incorrect,
                    contribution.total_incorrect
                );
                aggregator.record_integrational(task.language, contribution);
            }
            TaskKind::Functional { code, .. } => {
                let outcome =
                    functional::evaluate(&self.backend, task.language, code, tests, key).await;
                log_failure(task, "functional", &outcome);

                let contribution = functional::score(&outcome);
                tracing::info!(
                    "Task {}: {}/{} functional tests passed",
                    task.id,
                    contribution.passed,
                    contribution.total
                );
                aggregator.record_functional(task.language, contribution);
            }
        }

        aggregator.mark_scored();
        ScoreStatus::Scored
    }
}

/// @ai:intent Failed runs are absorbed; leave a trace of why
/// @ai:effects io
fn log_failure(task: &Task, run: &str, outcome: &ExecutionOutcome) {
    if let Err(e) = outcome {
        tracing::warn!(
            "Task {} ({} run) contributes nothing: {}",
            task.id,
            run,
            e
        );
    }
}
