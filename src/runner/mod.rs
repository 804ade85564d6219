//! @ai:module:intent Test generation through the LLM endpoint and the per-task pipeline
//! @ai:module:layer infrastructure
//! @ai:module:public_api LlmClient, MockLlmClient, BenchmarkExecutor, PromptBuilder, RateLimiter

pub mod client;
pub mod executor;
pub mod prompt;
pub mod rate_limiter;

pub use client::{LlmClient, LlmClientTrait, LlmResponse, MockLlmClient, RequestContext};
pub use executor::{BenchmarkExecutor, GenerationCleaner, TaskOutcome};
pub use prompt::PromptBuilder;
pub use rate_limiter::{RateLimiter, RateLimiterTrait};
