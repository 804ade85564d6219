//! @ai:module:intent Detect the interpreters and compilers the execution backends shell out to
//! @ai:module:layer infrastructure
//! @ai:module:public_api ToolchainValidator, ToolchainStatus, MissingTool
//! @ai:module:stateless true

use crate::config::ExecutionConfig;
use crate::dataset::Language;
use std::collections::BTreeSet;
use std::process::Command;

/// @ai:intent Status of toolchain validation
#[derive(Debug)]
pub struct ToolchainStatus {
    pub available_languages: BTreeSet<Language>,
    pub missing_tools: Vec<MissingTool>,
}

impl ToolchainStatus {
    pub fn is_available(&self, language: Language) -> bool {
        self.available_languages.contains(&language)
    }
}

/// @ai:intent Information about a missing tool
#[derive(Debug)]
pub struct MissingTool {
    pub language: Language,
    pub tool_name: String,
    pub install_hint: &'static str,
}

/// @ai:intent Validates that required tools are installed
pub struct ToolchainValidator;

impl ToolchainValidator {
    /// @ai:intent Binary and version-check arguments for each language
    /// @ai:effects pure
    fn language_tools(config: &ExecutionConfig) -> Vec<(Language, &str, &'static [&'static str])> {
        vec![
            (Language::Python, config.python_bin.as_str(), &["--version"]),
            (Language::Go, config.go_bin.as_str(), &["version"]),
        ]
    }

    /// @ai:intent Get install hint for a language toolchain
    /// @ai:effects pure
    fn install_hint(language: Language) -> &'static str {
        match language {
            Language::Python => "Install Python 3: https://www.python.org/downloads/",
            Language::Go => "Install Go: https://go.dev/dl/",
        }
    }

    /// @ai:intent Check if a command runs successfully with the given arguments
    /// @ai:effects io
    pub fn is_tool_available(tool: &str, args: &[&str]) -> bool {
        Command::new(tool)
            .args(args)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// @ai:intent Probe every configured tool and return status
    /// @ai:effects io
    pub fn validate(config: &ExecutionConfig) -> ToolchainStatus {
        let mut available_languages = BTreeSet::new();
        let mut missing_tools = Vec::new();

        for (language, tool, args) in Self::language_tools(config) {
            if Self::is_tool_available(tool, args) {
                available_languages.insert(language);
            } else {
                missing_tools.push(MissingTool {
                    language,
                    tool_name: tool.to_string(),
                    install_hint: Self::install_hint(language),
                });
            }
        }

        ToolchainStatus {
            available_languages,
            missing_tools,
        }
    }

    /// @ai:intent Log warnings for missing tools
    /// @ai:effects io
    pub fn log_warnings(status: &ToolchainStatus) {
        for missing in &status.missing_tools {
            tracing::warn!(
                "Tool '{}' not found - {} tasks will be skipped. {}",
                missing.tool_name,
                missing.language,
                missing.install_hint
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_tools_cover_every_language() {
        let config = ExecutionConfig::default();
        let tools = ToolchainValidator::language_tools(&config);
        assert_eq!(tools.len(), Language::ALL.len());
        assert_eq!(tools[0].1, "python3");
        assert_eq!(tools[1].2, &["version"]);
    }

    #[test]
    fn test_install_hints() {
        assert!(ToolchainValidator::install_hint(Language::Python).contains("python.org"));
        assert!(ToolchainValidator::install_hint(Language::Go).contains("go.dev"));
    }

    #[test]
    fn test_is_tool_available_nonexistent() {
        assert!(!ToolchainValidator::is_tool_available(
            "nonexistent_tool_xyz",
            &["--version"]
        ));
    }

    #[test]
    fn test_missing_binaries_are_reported() {
        let config = ExecutionConfig {
            python_bin: "no-such-python".to_string(),
            go_bin: "no-such-go".to_string(),
            ..ExecutionConfig::default()
        };

        let status = ToolchainValidator::validate(&config);

        assert!(!status.is_available(Language::Python));
        assert_eq!(status.missing_tools.len(), 2);
        assert_eq!(status.missing_tools[1].tool_name, "no-such-go");
    }
}
