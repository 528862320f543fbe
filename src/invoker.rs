//! Solver invocation
//!
//! A solver is run as `<binary> <instance_file>` and awaited synchronously; exactly one child process
//! exists per call. The outcome is a tagged [`SolverResult`] so an abnormal termination or a launch
//! failure can never be mistaken for a comparable answer.
//!
//! ## I/O Boundary
//!
//! Campaigns talk to solvers through the [`SolverInvoker`] trait. [`ProcessInvoker`] is the real
//! implementation; tests substitute scripted invokers.

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::errors::{HarnessError, InvocationError};

/// What one solver run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult {
    /// Exit status 0; `output` is stdout with trailing whitespace removed.
    Success { output: String },
    /// Non-zero exit (or killed by a signal, `code` is then `None`).
    AbnormalExit { output: String, code: Option<i32> },
    /// The process never ran.
    LaunchFailure { reason: String },
}

/// Runs a solver binary against an instance file.
pub trait SolverInvoker {
    fn run(&mut self, binary: &Path, instance_file: &Path) -> SolverResult;
}

/// Spawns real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessInvoker;

impl ProcessInvoker {
    pub fn new() -> Self {
        Self
    }

    fn spawn(binary: &Path, instance_file: &Path) -> Result<std::process::Output, InvocationError> {
        Command::new(binary)
            .arg(instance_file)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| InvocationError::Spawn {
                binary: binary.to_path_buf(),
                source,
            })
    }
}

impl SolverInvoker for ProcessInvoker {
    #[tracing::instrument(skip_all, fields(binary = %binary.display()))]
    fn run(&mut self, binary: &Path, instance_file: &Path) -> SolverResult {
        tracing::debug!(instance = %instance_file.display(), "spawning solver");

        let output = match Self::spawn(binary, instance_file) {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(error = %e, "solver could not be launched");
                return SolverResult::LaunchFailure { reason: e.to_string() };
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
        if output.status.success() {
            SolverResult::Success { output: stdout }
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(
                code = ?output.status.code(),
                stderr = %stderr.trim_end(),
                "solver exited abnormally"
            );
            SolverResult::AbnormalExit {
                output: stdout,
                code: output.status.code(),
            }
        }
    }
}

/// Resolve a solver path for configuration checks.
///
/// Paths containing a separator must point at an existing file. A bare name is looked up in the
/// current directory first, then on `PATH`, matching how the process will be spawned.
pub fn resolve_binary(binary: &Path) -> Result<PathBuf, HarnessError> {
    if binary.is_file() {
        return Ok(binary.to_path_buf());
    }
    let is_bare_name = binary.components().count() == 1 && !binary.as_os_str().is_empty();
    if is_bare_name {
        if let Some(paths) = env::var_os("PATH") {
            if let Some(found) = env::split_paths(&paths).map(|dir| dir.join(binary)).find(|p| p.is_file()) {
                return Ok(found);
            }
        }
    }
    Err(HarnessError::configuration(format!(
        "solver binary `{}` does not exist",
        binary.display()
    )))
}
