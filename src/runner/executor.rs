//! @ai:module:intent Per-task pipeline: prompt, generate, execute, score
//! @ai:module:layer application
//! @ai:module:public_api BenchmarkExecutor, GenerationCleaner, TaskOutcome
//! @ai:module:stateless false

use crate::dataset::Task;
use crate::evaluator::{ScenarioEvaluator, ScoreStatus};
use crate::execution::{ExecutionBackend, IsolationKey};
use crate::metrics::MetricsAggregator;
use crate::runner::client::{LlmClientTrait, RequestContext};
use crate::runner::prompt::PromptBuilder;
use regex::Regex;
use std::sync::Arc;

/// @ai:intent Turns a raw completion into executable test source
pub struct GenerationCleaner {
    fence_line: Regex,
}

impl GenerationCleaner {
    pub fn new() -> Self {
        Self {
            fence_line: Regex::new(r"(?m)^[ \t]*```[\w+#.-]*[ \t]*\r?(\n|$)").unwrap(),
        }
    }

    /// @ai:intent Remove markdown code-fence lines and surrounding whitespace
    /// @ai:effects pure
    pub fn clean(&self, raw: &str) -> String {
        self.fence_line.replace_all(raw, "").trim().to_string()
    }
}

impl Default for GenerationCleaner {
    fn default() -> Self {
        Self::new()
    }
}

/// @ai:intent What happened to a single task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Scored,
    /// Generation arrived but was malformed for its category
    Discarded,
    /// Endpoint error or empty completion
    GenerationFailed,
}

/// @ai:intent Runs tasks one at a time through generation and scoring
pub struct BenchmarkExecutor<C: LlmClientTrait, B: ExecutionBackend> {
    client: Arc<C>,
    prompts: PromptBuilder,
    cleaner: GenerationCleaner,
    evaluator: ScenarioEvaluator<B>,
}

impl<C: LlmClientTrait, B: ExecutionBackend> BenchmarkExecutor<C, B> {
    /// @ai:intent Create a new benchmark executor
    /// @ai:effects pure
    pub fn new(client: Arc<C>, evaluator: ScenarioEvaluator<B>) -> Self {
        Self {
            client,
            prompts: PromptBuilder::new(),
            cleaner: GenerationCleaner::new(),
            evaluator,
        }
    }

    /// @ai:intent Ask the model for a test suite; None when nothing usable came back
    /// @ai:effects network
    async fn generate(&self, task: &Task, model: &str, key: &IsolationKey) -> Option<String> {
        let prompt = self.prompts.build(task, key);
        let context = RequestContext {
            task_id: task.id.clone(),
            category: task.category(),
            language: task.language,
            module: key.to_string(),
            model: model.to_string(),
        };

        let response = match self.client.complete(&prompt, &context).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Generation failed for task {}: {:#}", task.id, e);
                return None;
            }
        };

        if let (Some(prompt_tokens), Some(completion_tokens)) =
            (response.prompt_tokens, response.completion_tokens)
        {
            tracing::debug!(
                "Task {}: {} prompt tokens, {} completion tokens",
                task.id,
                prompt_tokens,
                completion_tokens
            );
        }

        let tests = self.cleaner.clean(&response.content);
        if tests.is_empty() {
            tracing::warn!("Model returned no test code for task {}", task.id);
            return None;
        }

        Some(tests)
    }

    /// @ai:intent Process one task end to end under a fresh isolation key
    /// @ai:effects network, fs:write, process, state:write
    pub async fn run_task(
        &self,
        task: &Task,
        model: &str,
        aggregator: &mut MetricsAggregator,
    ) -> TaskOutcome {
        let key = IsolationKey::fresh();

        let Some(tests) = self.generate(task, model, &key).await else {
            return TaskOutcome::GenerationFailed;
        };

        match self.evaluator.evaluate(task, &tests, &key, aggregator).await {
            ScoreStatus::Scored => TaskOutcome::Scored,
            ScoreStatus::Discarded => TaskOutcome::Discarded,
        }
    }

    /// @ai:intent Run every task for one model into a fresh aggregator
    /// @ai:effects network, fs:write, process
    pub async fn run_all(&self, tasks: &[Task], model: &str) -> MetricsAggregator {
        let mut aggregator = MetricsAggregator::new();
        let total = tasks.len();
        let mut skipped = 0usize;

        for (index, task) in tasks.iter().enumerate() {
            tracing::info!(
                "[{}/{}] {} {} task {} ({})",
                index + 1,
                total,
                task.language,
                task.category(),
                task.id,
                task.set
            );

            if self.run_task(task, model, &mut aggregator).await != TaskOutcome::Scored {
                skipped += 1;
            }
        }

        tracing::info!(
            "Model {}: {} tasks scored, {} skipped",
            model,
            aggregator.tasks_scored(),
            skipped
        );

        aggregator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Language, TaskKind};
    use crate::evaluator::testing::ScriptedBackend;
    use crate::evaluator::SEPARATOR;
    use crate::execution::TestCounts;
    use crate::metrics::{FunctionalCounters, IntegrationalCounters};
    use crate::runner::client::MockLlmClient;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn functional_task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            language: Language::Python,
            set: "python-library".to_string(),
            kind: TaskKind::Functional {
                code: "class Library: pass".to_string(),
                description: "Manage books".to_string(),
            },
        }
    }

    fn executor(
        reply: MockLlmClient,
        counts: Vec<TestCounts>,
    ) -> BenchmarkExecutor<MockLlmClient, ScriptedBackend> {
        let backend = ScriptedBackend::new(counts.into_iter().map(Ok).collect());
        BenchmarkExecutor::new(
            Arc::new(reply),
            ScenarioEvaluator::new(backend, Duration::ZERO),
        )
    }

    #[test]
    fn test_clean_generation_strips_fences() {
        let raw = "```python\nimport unittest\n\nclass T(unittest.TestCase):\n    pass\n```\n";
        assert_eq!(
            GenerationCleaner::new().clean(raw),
            "import unittest\n\nclass T(unittest.TestCase):\n    pass"
        );
    }

    #[test]
    fn test_clean_generation_keeps_separator_between_blocks() {
        let raw = format!("```go\nfunc TestA(t *testing.T) {{}}\n```\n{SEPARATOR}\n```go\nfunc TestB(t *testing.T) {{}}\n```");
        let cleaned = GenerationCleaner::new().clean(&raw);

        assert!(!cleaned.contains("```"));
        assert_eq!(cleaned.matches(SEPARATOR).count(), 1);
    }

    #[test]
    fn test_clean_generation_of_bare_fences_is_empty() {
        assert_eq!(GenerationCleaner::new().clean("```\n```"), "");
    }

    #[tokio::test]
    async fn test_run_all_scores_each_task_with_distinct_keys() {
        let executor = executor(
            MockLlmClient::new("```python\nimport unittest\n```".to_string()),
            vec![TestCounts::new(4, 0, 1), TestCounts::new(2, 1, 0)],
        );
        let tasks = vec![functional_task("1"), functional_task("2")];

        let aggregator = executor.run_all(&tasks, "m").await;

        assert_eq!(aggregator.tasks_scored(), 2);
        assert_eq!(
            aggregator.overall().functional,
            FunctionalCounters { passed: 4, total: 6 }
        );

        let calls = executor.evaluator.backend().calls();
        assert_eq!(calls.len(), 2);
        assert_ne!(calls[0].module, calls[1].module);
        assert_eq!(calls[0].tests, "import unittest");
    }

    #[tokio::test]
    async fn test_failed_generation_skips_execution() {
        let executor = executor(MockLlmClient::failing("503 Service Unavailable"), vec![]);
        let mut aggregator = MetricsAggregator::new();

        let outcome = executor
            .run_task(&functional_task("1"), "m", &mut aggregator)
            .await;

        assert_eq!(outcome, TaskOutcome::GenerationFailed);
        assert_eq!(aggregator.tasks_scored(), 0);
        assert!(executor.evaluator.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_generation_counts_as_failure() {
        let executor = executor(MockLlmClient::new("```\n```\n".to_string()), vec![]);
        let mut aggregator = MetricsAggregator::new();

        let outcome = executor
            .run_task(&functional_task("1"), "m", &mut aggregator)
            .await;

        assert_eq!(outcome, TaskOutcome::GenerationFailed);
    }

    #[tokio::test]
    async fn test_integrational_without_separator_is_discarded() {
        let executor = executor(
            MockLlmClient::new("def test_a(): pass".to_string()),
            vec![TestCounts::new(1, 0, 0)],
        );
        let task = Task {
            id: "9".to_string(),
            language: Language::Python,
            set: "python-int".to_string(),
            kind: TaskKind::Integrational {
                code: "x = 1".to_string(),
            },
        };
        let mut aggregator = MetricsAggregator::new();

        let outcome = executor.run_task(&task, "m", &mut aggregator).await;

        assert_eq!(outcome, TaskOutcome::Discarded);
        assert_eq!(
            aggregator.overall().integrational,
            IntegrationalCounters::default()
        );
    }

    #[tokio::test]
    async fn test_dry_run_integrational_task_reaches_both_scenarios() {
        let executor = executor(
            MockLlmClient::canned(),
            vec![TestCounts::new(1, 0, 0), TestCounts::new(1, 0, 1)],
        );
        let task = Task {
            id: "4".to_string(),
            language: Language::Python,
            set: "python-int".to_string(),
            kind: TaskKind::Integrational {
                code: "x = 1".to_string(),
            },
        };
        let mut aggregator = MetricsAggregator::new();

        let outcome = executor.run_task(&task, "m", &mut aggregator).await;

        assert_eq!(outcome, TaskOutcome::Scored);
        assert_eq!(
            aggregator.overall().integrational,
            IntegrationalCounters {
                correct: 1,
                incorrect: 1,
                total_correct: 1,
                total_incorrect: 1,
            }
        );

        let calls = executor.evaluator.backend().calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].tests.contains(&format!("import {}", calls[0].module)));
        assert!(!calls[0].tests.contains("```"));
        assert!(calls[1].tests.contains("incorrect scenario"));
    }
}
