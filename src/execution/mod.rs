//! @ai:module:intent Stage generated tests next to code under test and run them
//! @ai:module:layer infrastructure
//! @ai:module:public_api ExecutionBackend, ExecutionRequest, ExecutionOutcome, ExecutionFailure, TestCounts, IsolationKey, Variant, LanguageBackends, PythonBackend, GoBackend

pub mod go;
pub mod normalizer;
pub mod python;
pub mod staging;

pub use go::GoBackend;
pub use normalizer::{parse_unittest_report, GoOutputParser};
pub use python::PythonBackend;
pub use staging::{run_command, RawOutput, StagedUnit};

use crate::config::ExecutionConfig;
use crate::dataset::Language;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// @ai:intent Normalized summary of one test run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TestCounts {
    /// Tests discovered and attempted
    pub ran: u32,
    /// Tests that could not run (load or compile failure)
    pub errored: u32,
    /// Tests that ran and failed an assertion
    pub failed: u32,
}

impl TestCounts {
    /// @ai:intent Build counts from the three runner figures
    /// @ai:effects pure
    pub fn new(ran: u32, errored: u32, failed: u32) -> Self {
        Self {
            ran,
            errored,
            failed,
        }
    }

    /// @ai:intent Tests that executed without a load/compile error
    /// @ai:effects pure
    pub fn executed(&self) -> u32 {
        self.ran.saturating_sub(self.errored)
    }

    /// @ai:intent Tests that executed and passed
    /// @ai:effects pure
    pub fn net_passed(&self) -> u32 {
        self.executed().saturating_sub(self.failed)
    }
}

/// @ai:intent Why a run produced no usable counts
#[derive(Debug, Error)]
pub enum ExecutionFailure {
    #[error("test run exceeded {0:?}")]
    Timeout(Duration),

    #[error("failed to stage files: {0}")]
    Stage(#[from] std::io::Error),

    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unrecognised runner output: {0}")]
    Parse(String),
}

/// Either normalized counts or the reason the run contributes nothing.
pub type ExecutionOutcome = Result<TestCounts, ExecutionFailure>;

/// @ai:intent Which version of the code under test a run targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Base,
    Mutated,
}

impl Variant {
    /// @ai:intent Get string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Base => "base",
            Variant::Mutated => "mutated",
        }
    }
}

/// @ai:intent Unique per-task-attempt identifier, also the module name tests import from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsolationKey(String);

impl IsolationKey {
    /// @ai:intent Allocate a key that is never reused across tasks
    /// @ai:effects random
    pub fn fresh() -> Self {
        Self(format!("temp_{}", Uuid::new_v4().simple()))
    }

    /// @ai:intent Wrap an existing identifier
    /// @ai:effects pure
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// @ai:intent Module name for a variant; the mutated run gets a distinct name
    /// @ai:effects pure
    pub fn for_variant(&self, variant: Variant) -> String {
        match variant {
            Variant::Base => self.0.clone(),
            Variant::Mutated => format!("{}_mut", self.0),
        }
    }
}

impl std::fmt::Display for IsolationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// @ai:intent One code/test pairing to execute
#[derive(Debug, Clone, Copy)]
pub struct ExecutionRequest<'a> {
    pub code: &'a str,
    pub tests: &'a str,
    pub language: Language,
    pub key: &'a IsolationKey,
    pub variant: Variant,
}

impl<'a> ExecutionRequest<'a> {
    /// @ai:intent Module name the staged code file is written under
    /// @ai:effects pure
    pub fn module_name(&self) -> String {
        self.key.for_variant(self.variant)
    }

    /// @ai:intent Test text with imports pointed at this variant's module
    /// @ai:effects pure
    pub fn test_source(&self) -> Cow<'a, str> {
        match self.variant {
            Variant::Base => Cow::Borrowed(self.tests),
            Variant::Mutated => {
                Cow::Owned(self.tests.replace(self.key.as_str(), &self.module_name()))
            }
        }
    }
}

/// @ai:intent Runs a test unit against a code unit in an isolated working area.
///            Generated files are removed before returning, on every path.
#[allow(async_fn_in_trait)]
pub trait ExecutionBackend: Send + Sync {
    /// @ai:intent Execute and normalize one run
    async fn execute(&self, request: &ExecutionRequest<'_>) -> ExecutionOutcome;
}

/// @ai:intent Language dispatcher binding each language to its backend
pub struct LanguageBackends<P: ExecutionBackend = PythonBackend, G: ExecutionBackend = GoBackend> {
    pub python: P,
    pub go: G,
}

impl LanguageBackends {
    /// @ai:intent Build the real backends from configuration
    /// @ai:effects pure
    pub fn from_config(config: &ExecutionConfig, work_dir: &Path) -> Self {
        Self {
            python: PythonBackend::from_config(config, work_dir),
            go: GoBackend::from_config(config, work_dir),
        }
    }
}

impl<P: ExecutionBackend, G: ExecutionBackend> ExecutionBackend for LanguageBackends<P, G> {
    /// @ai:intent Route to the backend for the request's language
    /// @ai:effects fs:write, process
    async fn execute(&self, request: &ExecutionRequest<'_>) -> ExecutionOutcome {
        match request.language {
            Language::Python => self.python.execute(request).await,
            Language::Go => self.go.execute(request).await,
        }
    }
}
