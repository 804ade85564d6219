//! @ai:module:intent Configuration structs for the test-generation benchmark
//! @ai:module:layer infrastructure
//! @ai:module:public_api BenchmarkConfig, ApiConfig, RunConfig, FilterConfig, PathConfig, ExecutionConfig, GoConfig
//! @ai:module:stateless true

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// @ai:intent Main configuration for the benchmark system
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub paths: PathConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
}

/// @ai:intent Chat-completion endpoint configuration
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Environment variable holding the API key; local endpoints accept a dummy key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_models")]
    pub models: Vec<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_rate_limit")]
    pub requests_per_minute: u32,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// @ai:intent Run configuration for benchmark execution
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub dry_run: bool,
    /// Pause between the base and the mutated execution of a unit task
    #[serde(default = "default_mutation_delay")]
    pub mutation_delay_ms: u64,
    #[serde(default)]
    pub filter: FilterConfig,
}

/// @ai:intent Path configuration for input and scratch directories
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_dataset_dir")]
    pub dataset_dir: PathBuf,
    /// Parent of the per-attempt isolated working directories
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
}

/// @ai:intent Test execution settings shared by all language backends
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default = "default_execution_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_python_bin")]
    pub python_bin: String,
    #[serde(default = "default_go_bin")]
    pub go_bin: String,
    #[serde(default)]
    pub go: GoConfig,
}

/// @ai:intent Go backend settings
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoConfig {
    #[serde(default = "default_go_module")]
    pub module_name: String,
    #[serde(default = "default_go_version")]
    pub go_version: String,
    /// Report a build failure as errored tests instead of an empty run.
    /// Off by default so scores stay comparable with earlier runs.
    #[serde(default)]
    pub report_build_failures: bool,
}

/// @ai:intent Filter configuration for selecting tasks
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    pub categories: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    pub task_ids: Option<Vec<String>>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            models: default_models(),
            temperature: default_temperature(),
            requests_per_minute: default_rate_limit(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            mutation_delay_ms: default_mutation_delay(),
            filter: FilterConfig::default(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            dataset_dir: default_dataset_dir(),
            work_dir: default_work_dir(),
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_execution_timeout(),
            python_bin: default_python_bin(),
            go_bin: default_go_bin(),
            go: GoConfig::default(),
        }
    }
}

impl Default for GoConfig {
    fn default() -> Self {
        Self {
            module_name: default_go_module(),
            go_version: default_go_version(),
            report_build_failures: false,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:11434/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_models() -> Vec<String> {
    vec!["llama3.2:3b-instruct-q8_0".to_string()]
}

fn default_temperature() -> f32 {
    0.3
}

fn default_rate_limit() -> u32 {
    60
}

fn default_request_timeout() -> u64 {
    300
}

fn default_mutation_delay() -> u64 {
    500
}

fn default_dataset_dir() -> PathBuf {
    PathBuf::from("Datasets")
}

fn default_work_dir() -> PathBuf {
    PathBuf::from("temp")
}

fn default_execution_timeout() -> u64 {
    60
}

fn default_python_bin() -> String {
    "python3".to_string()
}

fn default_go_bin() -> String {
    "go".to_string()
}

fn default_go_module() -> String {
    "benchtask".to_string()
}

fn default_go_version() -> String {
    "1.21".to_string()
}

impl BenchmarkConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl ExecutionConfig {
    /// @ai:intent Subprocess time budget
    /// @ai:effects pure
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl FilterConfig {
    /// @ai:intent Check if filter matches a task
    /// @ai:effects pure
    pub fn matches(&self, category: &str, language: &str, id: &str) -> bool {
        let category_match = self
            .categories
            .as_ref()
            .map(|c| c.iter().any(|cat| cat == category))
            .unwrap_or(true);

        let language_match = self
            .languages
            .as_ref()
            .map(|l| l.iter().any(|lang| lang == language))
            .unwrap_or(true);

        let id_match = self
            .task_ids
            .as_ref()
            .map(|ids| ids.iter().any(|task_id| task_id == id))
            .unwrap_or(true);

        category_match && language_match && id_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_matches_all_when_empty() {
        let filter = FilterConfig::default();
        assert!(filter.matches("unit", "python", "1"));
    }

    #[test]
    fn test_filter_matches_specific_category() {
        let filter = FilterConfig {
            categories: Some(vec!["unit".to_string()]),
            ..Default::default()
        };
        assert!(filter.matches("unit", "go", "1"));
        assert!(!filter.matches("functional", "go", "1"));
    }

    #[test]
    fn test_filter_matches_multiple_criteria() {
        let filter = FilterConfig {
            categories: Some(vec!["integrational".to_string()]),
            languages: Some(vec!["go".to_string(), "python".to_string()]),
            task_ids: Some(vec!["7".to_string()]),
        };
        assert!(filter.matches("integrational", "go", "7"));
        assert!(!filter.matches("integrational", "go", "8"));
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: BenchmarkConfig = toml::from_str(
            r#"
[api]
models = ["qwen2.5-coder:7b"]

[execution]
timeout_secs = 5
"#,
        )
        .unwrap();

        assert_eq!(config.api.models, vec!["qwen2.5-coder:7b".to_string()]);
        assert!((config.api.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.execution.timeout(), Duration::from_secs(5));
        assert_eq!(config.execution.python_bin, "python3");
        assert!(!config.execution.go.report_build_failures);
        assert_eq!(config.run.mutation_delay_ms, 500);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("benchmark.toml");

        let mut config = BenchmarkConfig::default();
        config.paths.work_dir = PathBuf::from("scratch");
        config.save(&path).unwrap();

        let loaded = BenchmarkConfig::load(&path).unwrap();
        assert_eq!(loaded.paths.work_dir, PathBuf::from("scratch"));
        assert_eq!(loaded.api.base_url, "http://localhost:11434/v1");
    }
}
