//! @ai:module:intent Benchmark measuring how well language models write tests
//! @ai:module:layer application
//! @ai:module:public_api config, dataset, evaluator, execution, metrics, report, runner, toolchain

pub mod config;
pub mod dataset;
pub mod evaluator;
pub mod execution;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod toolchain;

pub use config::BenchmarkConfig;
pub use dataset::{DatasetLoader, Language, Task, TaskCategory};
pub use evaluator::ScenarioEvaluator;
pub use execution::{ExecutionBackend, LanguageBackends};
pub use metrics::{BenchmarkSummary, MetricsAggregator};
pub use report::TextReporter;
pub use runner::{BenchmarkExecutor, LlmClient, LlmClientTrait, MockLlmClient};
pub use toolchain::{ToolchainStatus, ToolchainValidator};
