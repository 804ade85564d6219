//! @ai:module:intent Task definitions for the benchmark dataset
//! @ai:module:layer domain
//! @ai:module:public_api Task, TaskKind, TaskCategory, Language
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent Category of benchmark task; selects prompt template and scoring rule
/// @ai:effects pure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Unit,
    Integrational,
    Functional,
}

impl TaskCategory {
    /// Evaluation order used by the dataset loader
    pub const ALL: [TaskCategory; 3] = [
        TaskCategory::Unit,
        TaskCategory::Integrational,
        TaskCategory::Functional,
    ];

    /// @ai:intent Convert category to string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Unit => "unit",
            TaskCategory::Integrational => "integrational",
            TaskCategory::Functional => "functional",
        }
    }
}

impl std::fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent Target language of the code under test
/// @ai:effects pure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Go,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Python, Language::Go];

    /// @ai:intent Convert language to string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Go => "go",
        }
    }

    /// @ai:intent Get file extension for this language
    /// @ai:effects pure
    pub fn extension(&self) -> &'static str {
        match self {
            Language::Python => "py",
            Language::Go => "go",
        }
    }

    /// @ai:intent Test library the generated suite must use
    /// @ai:effects pure
    pub fn test_library(&self) -> &'static str {
        match self {
            Language::Python => "unittest",
            Language::Go => "testing",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent Category-specific task payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    Unit {
        code: String,
        mutated_code: String,
        function_name: String,
    },
    Integrational {
        code: String,
    },
    Functional {
        code: String,
        description: String,
    },
}

/// @ai:intent A benchmark task; immutable once loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub language: Language,
    /// Name of the task set directory the task came from
    pub set: String,
    pub kind: TaskKind,
}

impl Task {
    /// @ai:intent Category derived from the payload variant
    /// @ai:effects pure
    pub fn category(&self) -> TaskCategory {
        match self.kind {
            TaskKind::Unit { .. } => TaskCategory::Unit,
            TaskKind::Integrational { .. } => TaskCategory::Integrational,
            TaskKind::Functional { .. } => TaskCategory::Functional,
        }
    }

    /// @ai:intent The base (presumed-correct) code under test
    /// @ai:effects pure
    pub fn code(&self) -> &str {
        match &self.kind {
            TaskKind::Unit { code, .. }
            | TaskKind::Integrational { code }
            | TaskKind::Functional { code, .. } => code,
        }
    }
}
