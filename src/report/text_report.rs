//! @ai:module:intent Plain-text rendering of a finished run
//! @ai:module:layer infrastructure
//! @ai:module:public_api TextReporter, TextReporterTrait
//! @ai:module:stateless true

use crate::metrics::{BenchmarkSummary, RateSummary};
use std::fmt::Write as FmtWrite;

/// @ai:intent Trait for text report generation
pub trait TextReporterTrait: Send + Sync {
    /// @ai:intent Render the summary as human-readable text
    fn render(&self, summary: &BenchmarkSummary) -> String;
}

/// @ai:intent Renders category blocks with percentage rates
pub struct TextReporter;

impl TextReporter {
    /// @ai:intent Create a new text reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Format a rate in [0, 1] as a percentage with two decimals
    /// @ai:effects pure
    fn percent(rate: f64) -> String {
        format!("{:.2}%", rate * 100.0)
    }

    /// @ai:intent Write one block per category that has a rate; nothing for the rest
    /// @ai:effects pure
    fn render_rates(output: &mut String, rates: &RateSummary, indent: &str) {
        if let Some(unit) = &rates.unit {
            writeln!(output, "{indent}Unit Tests:").unwrap();
            writeln!(
                output,
                "{indent}  - Executable: {} (tests compiled and ran successfully)",
                Self::percent(unit.executable)
            )
            .unwrap();
            writeln!(
                output,
                "{indent}  - Mutation Detection: {} (tests caught mutations)",
                Self::percent(unit.mutation_detection)
            )
            .unwrap();
            writeln!(
                output,
                "{indent}  - Spam Detection: {} (spammy tests)",
                Self::percent(unit.spam)
            )
            .unwrap();
            writeln!(output).unwrap();
        }

        if let Some(integrational) = &rates.integrational {
            writeln!(output, "{indent}Integrational Tests:").unwrap();
            if let Some(rate) = integrational.correct_passed {
                writeln!(
                    output,
                    "{indent}  - Correct Passed: {} (correct tests passed)",
                    Self::percent(rate)
                )
                .unwrap();
            }
            if let Some(rate) = integrational.incorrect_failed {
                writeln!(
                    output,
                    "{indent}  - Incorrect Failed: {} (incorrect tests failed as expected)",
                    Self::percent(rate)
                )
                .unwrap();
            }
            writeln!(output).unwrap();
        }

        if let Some(functional) = &rates.functional {
            writeln!(output, "{indent}Functional Tests:").unwrap();
            writeln!(
                output,
                "{indent}  - Passed: {} (requirements verified)",
                Self::percent(functional.passed)
            )
            .unwrap();
            writeln!(output).unwrap();
        }
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextReporterTrait for TextReporter {
    /// @ai:effects pure
    fn render(&self, summary: &BenchmarkSummary) -> String {
        let mut output = String::new();

        writeln!(output, "Final Results").unwrap();
        writeln!(output, "=============").unwrap();
        writeln!(output, "Model: {}", summary.model).unwrap();
        writeln!(output, "Date: {}", summary.timestamp).unwrap();
        writeln!(output, "Tasks scored: {}", summary.tasks_scored).unwrap();
        writeln!(output).unwrap();

        if summary.overall.is_empty() {
            writeln!(output, "No category produced results.").unwrap();
            return output;
        }

        Self::render_rates(&mut output, &summary.overall, "");

        for (language, rates) in &summary.by_language {
            if rates.is_empty() {
                continue;
            }
            writeln!(output, "[{}]", language).unwrap();
            Self::render_rates(&mut output, rates, "  ");
        }

        output
    }
}
