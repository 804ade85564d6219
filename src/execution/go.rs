//! @ai:module:intent Run generated Go test files with `go test -v`
//! @ai:module:layer infrastructure
//! @ai:module:public_api GoBackend
//! @ai:module:stateless true

use crate::config::{ExecutionConfig, GoConfig};
use crate::execution::normalizer::GoOutputParser;
use crate::execution::staging::{run_command, StagedUnit};
use crate::execution::{ExecutionBackend, ExecutionOutcome, ExecutionRequest};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

/// @ai:intent Executes Go tests; each run owns its own module manifest
pub struct GoBackend {
    go_bin: String,
    work_dir: PathBuf,
    timeout: Duration,
    settings: GoConfig,
    parser: GoOutputParser,
}

impl GoBackend {
    /// @ai:intent Create a backend using the given toolchain binary
    /// @ai:effects pure
    pub fn new(
        go_bin: impl Into<String>,
        work_dir: impl Into<PathBuf>,
        timeout: Duration,
        settings: GoConfig,
    ) -> Self {
        Self {
            go_bin: go_bin.into(),
            work_dir: work_dir.into(),
            timeout,
            settings,
            parser: GoOutputParser::new(),
        }
    }

    /// @ai:intent Create a backend from execution configuration
    /// @ai:effects pure
    pub fn from_config(config: &ExecutionConfig, work_dir: &Path) -> Self {
        Self::new(
            config.go_bin.clone(),
            work_dir,
            config.timeout(),
            config.go.clone(),
        )
    }

    /// @ai:intent Code file and test file names; `go test` needs the `_test.go` suffix
    /// @ai:effects pure
    fn file_names(module: &str) -> (String, String) {
        (format!("{module}.go"), format!("{module}_test.go"))
    }

    /// @ai:intent Module manifest private to one staged unit
    /// @ai:effects pure
    fn go_mod(&self) -> String {
        format!(
            "module {}\n\ngo {}\n",
            self.settings.module_name, self.settings.go_version
        )
    }
}

impl ExecutionBackend for GoBackend {
    /// @ai:intent Stage code, tests and go.mod, run verbosely, count PASS/FAIL lines
    /// @ai:effects fs:write, process
    async fn execute(&self, request: &ExecutionRequest<'_>) -> ExecutionOutcome {
        let module = request.module_name();
        let (code_file, test_file) = Self::file_names(&module);
        let test_source = request.test_source();

        let unit = StagedUnit::create(&self.work_dir, &module)?;
        unit.write(&code_file, request.code)?;
        unit.write(&test_file, &test_source)?;
        unit.write("go.mod", &self.go_mod())?;

        let mut cmd = Command::new(&self.go_bin);
        cmd.arg("test")
            .arg("-v")
            .arg(".")
            .current_dir(unit.path())
            .env("GOTOOLCHAIN", "local")
            .env("GOFLAGS", "-mod=mod");

        let output = run_command(cmd, &self.go_bin, self.timeout).await;
        unit.cleanup();
        let output = output?;

        tracing::debug!(
            "go test output for {} ({} variant):\n{}\n{}",
            module,
            request.variant.as_str(),
            output.stdout,
            output.stderr
        );

        Ok(self.parser.parse(
            &output.stdout,
            &output.stderr,
            &test_source,
            self.settings.report_build_failures,
        ))
    }
}
