//! @ai:module:intent Run generated unittest suites with the Python interpreter
//! @ai:module:layer infrastructure
//! @ai:module:public_api PythonBackend
//! @ai:module:stateless true

use crate::config::ExecutionConfig;
use crate::execution::normalizer::{parse_unittest_report, RESULT_MARKER};
use crate::execution::staging::{run_command, StagedUnit};
use crate::execution::{ExecutionBackend, ExecutionOutcome, ExecutionRequest};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

/// Discovers the test module, runs it with output captured, and prints the
/// result object's counts as one JSON line.
const UNITTEST_SHIM: &str = r#"
import contextlib, io, json, sys, unittest
start_dir, pattern, marker = sys.argv[1], sys.argv[2], sys.argv[3]
stream = io.StringIO()
with contextlib.redirect_stdout(stream), contextlib.redirect_stderr(stream):
    suite = unittest.TestLoader().discover(start_dir=start_dir, pattern=pattern, top_level_dir=start_dir)
    result = unittest.TextTestRunner(stream=stream).run(suite)
sys.stderr.write(stream.getvalue())
print(marker + json.dumps({"ran": result.testsRun, "errored": len(result.errors), "failed": len(result.failures)}))
"#;

/// @ai:intent Executes Python tests through `unittest` discovery
pub struct PythonBackend {
    python_bin: String,
    work_dir: PathBuf,
    timeout: Duration,
}

impl PythonBackend {
    /// @ai:intent Create a backend using the given interpreter
    /// @ai:effects pure
    pub fn new(
        python_bin: impl Into<String>,
        work_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            python_bin: python_bin.into(),
            work_dir: work_dir.into(),
            timeout,
        }
    }

    /// @ai:intent Create a backend from execution configuration
    /// @ai:effects pure
    pub fn from_config(config: &ExecutionConfig, work_dir: &Path) -> Self {
        Self::new(config.python_bin.clone(), work_dir, config.timeout())
    }

    /// @ai:intent Code file and test file names; discovery needs the `_test.py` suffix
    /// @ai:effects pure
    fn file_names(module: &str) -> (String, String) {
        (format!("{module}.py"), format!("{module}_test.py"))
    }
}

impl ExecutionBackend for PythonBackend {
    /// @ai:intent Stage `<module>.py` and `<module>_test.py`, run, normalize, clean up
    /// @ai:effects fs:write, process
    async fn execute(&self, request: &ExecutionRequest<'_>) -> ExecutionOutcome {
        let module = request.module_name();
        let (code_file, test_file) = Self::file_names(&module);

        let unit = StagedUnit::create(&self.work_dir, &module)?;
        unit.write(&code_file, request.code)?;
        unit.write(&test_file, &request.test_source())?;

        let mut cmd = Command::new(&self.python_bin);
        cmd.arg("-c")
            .arg(UNITTEST_SHIM)
            .arg(".")
            .arg(&test_file)
            .arg(RESULT_MARKER)
            .current_dir(unit.path())
            .env("PYTHONDONTWRITEBYTECODE", "1");

        let output = run_command(cmd, &self.python_bin, self.timeout).await;
        unit.cleanup();
        let output = output?;

        tracing::debug!(
            "unittest output for {} ({} variant):\n{}",
            module,
            request.variant.as_str(),
            output.stderr
        );
        parse_unittest_report(&output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Language;
    use crate::execution::{ExecutionFailure, IsolationKey, TestCounts, Variant};
    use crate::toolchain::ToolchainValidator;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const BASE: &str = "def add(a, b):\n    return a + b\n";
    const MUTATED: &str = "def add(a, b):\n    return a - b\n";

    fn python_available() -> bool {
        ToolchainValidator::is_tool_available("python3", &["--version"])
    }

    fn suite(key: &IsolationKey) -> String {
        let body = r#"import unittest
from MODULE import add


class TestAdd(unittest.TestCase):
    def test_zero(self):
        self.assertEqual(add(0, 0), 0)

    def test_positive(self):
        self.assertEqual(add(2, 3), 5)

    def test_negative(self):
        self.assertEqual(add(-2, -3), -5)

    def test_mixed(self):
        self.assertEqual(add(-2, 3), 1)

    def test_right_zero(self):
        self.assertEqual(add(4, 0), 4)
"#;
        body.replace("MODULE", key.as_str())
    }

    async fn run(
        backend: &PythonBackend,
        code: &str,
        tests: &str,
        key: &IsolationKey,
        variant: Variant,
    ) -> ExecutionOutcome {
        let request = ExecutionRequest {
            code,
            tests,
            language: Language::Python,
            key,
            variant,
        };
        backend.execute(&request).await
    }

    #[test]
    fn test_file_names_follow_discovery_pattern() {
        let (code, test) = PythonBackend::file_names("temp_1");
        assert_eq!(code, "temp_1.py");
        assert_eq!(test, "temp_1_test.py");
    }

    #[tokio::test]
    async fn test_base_and_mutated_runs() {
        if !python_available() {
            return;
        }

        let root = TempDir::new().unwrap();
        let backend = PythonBackend::new("python3", root.path(), Duration::from_secs(60));
        let key = IsolationKey::fresh();
        let tests = suite(&key);

        let base = run(&backend, BASE, &tests, &key, Variant::Base).await.unwrap();
        assert_eq!(base, TestCounts::new(5, 0, 0));

        let mutated = run(&backend, MUTATED, &tests, &key, Variant::Mutated).await.unwrap();
        assert_eq!(mutated, TestCounts::new(5, 0, 3));

        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_import_error_counts_as_errored() {
        if !python_available() {
            return;
        }

        let root = TempDir::new().unwrap();
        let backend = PythonBackend::new("python3", root.path(), Duration::from_secs(60));
        let key = IsolationKey::fresh();
        let tests = "import unittest\nfrom no_such_module import add\n";

        let counts = run(&backend, BASE, tests, &key, Variant::Base).await.unwrap();
        assert_eq!(counts, TestCounts::new(1, 1, 0));
    }

    #[tokio::test]
    async fn test_hanging_suite_times_out_and_cleans_up() {
        if !python_available() {
            return;
        }

        let root = TempDir::new().unwrap();
        let backend = PythonBackend::new("python3", root.path(), Duration::from_millis(500));
        let key = IsolationKey::fresh();
        let tests = "import time, unittest\n\nclass T(unittest.TestCase):\n    def test_sleep(self):\n        time.sleep(30)\n";

        let result = run(&backend, BASE, tests, &key, Variant::Base).await;
        assert!(matches!(result, Err(ExecutionFailure::Timeout(_))));
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_interpreter_is_a_failure() {
        let root = TempDir::new().unwrap();
        let backend =
            PythonBackend::new("nonexistent_python_xyz", root.path(), Duration::from_secs(5));
        let key = IsolationKey::fresh();

        let result = run(&backend, BASE, "", &key, Variant::Base).await;
        assert!(matches!(result, Err(ExecutionFailure::Spawn { .. })));
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }
}
