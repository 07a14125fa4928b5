//! Command runner - spawns external programs as child processes

use crate::actions::{Invocation, RunOutcome};
use crate::core::DeployError;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Number of trailing diagnostic lines kept on failure
const DIAGNOSTIC_LINES: usize = 20;

/// Executes a command in a working directory and waits for it
pub trait CommandRunner {
    /// Run `invocation` rooted at `working_dir`
    ///
    /// With `must_succeed`, a spawn failure or non-zero exit is
    /// [`RunOutcome::Fatal`] carrying [`DeployError::CommandFailed`]; without
    /// it the same failures come back as [`RunOutcome::Tolerated`].
    fn run(&self, invocation: &Invocation, working_dir: &Path, must_succeed: bool) -> RunOutcome;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, invocation: &Invocation, working_dir: &Path, must_succeed: bool) -> RunOutcome {
        (**self).run(invocation, working_dir, must_succeed)
    }
}

/// Runs commands with `std::process`, blocking until they exit
///
/// Output is captured rather than shown so it does not tear through the
/// progress display; stdout is logged at debug level and the tail of the
/// diagnostic output is attached to failures.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    fn spawn(&self, invocation: &Invocation, working_dir: &Path) -> Result<(), DeployError> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| DeployError::CommandFailed {
                command: invocation.to_string(),
                status: None,
                stderr: format!("failed to spawn: {}", e),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!("`{}` output:\n{}", invocation, stdout.trim_end());
        }

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let diagnostics = if stderr.trim().is_empty() { stdout } else { stderr };
        Err(DeployError::CommandFailed {
            command: invocation.to_string(),
            status: output.status.code(),
            stderr: tail(&diagnostics, DIAGNOSTIC_LINES),
        })
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation, working_dir: &Path, must_succeed: bool) -> RunOutcome {
        debug!("Running `{}` in {}", invocation, working_dir.display());

        match self.spawn(invocation, working_dir) {
            Ok(()) => RunOutcome::Ok,
            Err(err) if must_succeed => {
                warn!("{}", err);
                RunOutcome::Fatal(err)
            }
            Err(err) => {
                debug!("Tolerating failure: {}", err);
                RunOutcome::Tolerated(err.to_string())
            }
        }
    }
}

/// Keep the last `max_lines` lines of `text`
fn tail(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.trim_end().lines().collect();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join("\n")
}
