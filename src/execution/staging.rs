//! @ai:module:intent Per-attempt working directories and bounded subprocess runs
//! @ai:module:layer infrastructure
//! @ai:module:public_api StagedUnit, RawOutput, run_command
//! @ai:module:stateless false

use crate::execution::ExecutionFailure;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tempfile::TempDir;
use tokio::process::Command;

/// @ai:intent Isolated directory holding one run's code and test files.
///            Dropping it removes the directory and everything in it.
pub struct StagedUnit {
    dir: TempDir,
}

impl StagedUnit {
    /// @ai:intent Create a fresh directory under the work root, named after the module
    /// @ai:effects fs:write
    pub fn create(work_root: &Path, module: &str) -> Result<Self, ExecutionFailure> {
        std::fs::create_dir_all(work_root)?;

        let dir = tempfile::Builder::new()
            .prefix(&format!("{module}-"))
            .tempdir_in(work_root)?;

        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// @ai:intent Write a file into the unit directory
    /// @ai:effects fs:write
    pub fn write(&self, file_name: &str, content: &str) -> Result<PathBuf, ExecutionFailure> {
        let path = self.dir.path().join(file_name);
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// @ai:intent Remove the directory now, logging instead of failing
    /// @ai:effects fs:write
    pub fn cleanup(self) {
        let path = self.dir.path().to_path_buf();

        if let Err(e) = self.dir.close() {
            tracing::warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}

/// @ai:intent Captured output of a finished subprocess
#[derive(Debug, Clone)]
pub struct RawOutput {
    pub stdout: String,
    pub stderr: String,
}

/// @ai:intent Run a command to completion, killing it once the timeout elapses
/// @ai:effects process
pub async fn run_command(
    mut cmd: Command,
    program: &str,
    timeout: Duration,
) -> Result<RawOutput, ExecutionFailure> {
    cmd.stdin(Stdio::null()).kill_on_drop(true);

    let output = match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(result) => result.map_err(|source| ExecutionFailure::Spawn {
            program: program.to_string(),
            source,
        })?,
        Err(_) => return Err(ExecutionFailure::Timeout(timeout)),
    };

    Ok(RawOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
