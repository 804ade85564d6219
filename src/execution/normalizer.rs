//! @ai:module:intent Translate raw runner output into normalized test counts
//! @ai:module:layer domain
//! @ai:module:public_api parse_unittest_report, GoOutputParser, RESULT_MARKER
//! @ai:module:stateless true

use crate::execution::{ExecutionFailure, TestCounts};
use regex::Regex;

/// Prefix of the summary line printed by the unittest shim
pub const RESULT_MARKER: &str = "__TESTGEN_BENCH__";

/// @ai:intent Read the structured counts the unittest shim printed last
/// @ai:effects pure
pub fn parse_unittest_report(stdout: &str) -> Result<TestCounts, ExecutionFailure> {
    let payload = stdout
        .lines()
        .rev()
        .find_map(|line| line.trim().strip_prefix(RESULT_MARKER))
        .ok_or_else(|| ExecutionFailure::Parse("no unittest summary in output".to_string()))?;

    serde_json::from_str(payload)
        .map_err(|e| ExecutionFailure::Parse(format!("bad unittest summary {payload:?}: {e}")))
}

/// @ai:intent Derives counts from `go test -v` text
pub struct GoOutputParser {
    pass: Regex,
    fail: Regex,
    test_decl: Regex,
}

impl GoOutputParser {
    /// @ai:intent Create a parser with compiled patterns
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            pass: Regex::new(r"--- PASS: (\w+)").unwrap(),
            fail: Regex::new(r"--- FAIL: (\w+)").unwrap(),
            test_decl: Regex::new(r"(?m)^func\s+(Test\w*)\s*\(").unwrap(),
        }
    }

    /// @ai:intent Count PASS/FAIL lines. `ran` is the PASS count only, so
    ///            `ran >= failed` does not hold for Go. Errored is always zero
    ///            unless build failures are reported, in which case a failed
    ///            build with no test lines marks every declared test as errored
    /// @ai:effects pure
    pub fn parse(
        &self,
        stdout: &str,
        stderr: &str,
        test_source: &str,
        report_build_failures: bool,
    ) -> TestCounts {
        let passed = self.pass.find_iter(stdout).count() as u32;
        let failed = self.fail.find_iter(stdout).count() as u32;

        if report_build_failures && passed + failed == 0 && is_build_failure(stdout, stderr) {
            let declared = self.declared_tests(test_source);
            return TestCounts::new(declared, declared, 0);
        }

        TestCounts::new(passed, 0, failed)
    }

    /// @ai:intent Number of top-level test functions in a Go test file
    /// @ai:effects pure
    pub fn declared_tests(&self, test_source: &str) -> u32 {
        self.test_decl
            .captures_iter(test_source)
            .filter(|cap| &cap[1] != "TestMain")
            .count() as u32
    }
}

impl Default for GoOutputParser {
    fn default() -> Self {
        Self::new()
    }
}

/// @ai:intent Whether the toolchain stopped before any test ran
/// @ai:effects pure
fn is_build_failure(stdout: &str, stderr: &str) -> bool {
    [stdout, stderr]
        .iter()
        .any(|s| s.contains("[build failed]") || s.contains("[setup failed]"))
}
