//! Copy a static template over a generated file

use super::{Action, ActionContext, RunOutcome};
use crate::core::DeployError;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Writes a template's bytes verbatim to a destination file
///
/// No substitution happens. The destination is overwritten when it exists;
/// its parent directory must already exist.
#[derive(Debug, Clone)]
pub struct WriteTemplate {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl WriteTemplate {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    fn copy(&self) -> Result<usize, DeployError> {
        let content = fs::read(&self.source).map_err(|e| DeployError::io(&self.source, e))?;
        fs::write(&self.destination, &content)
            .map_err(|e| DeployError::io(&self.destination, e))?;
        Ok(content.len())
    }
}

impl Action for WriteTemplate {
    fn describe(&self) -> String {
        format!(
            "write {} from {}",
            self.destination.display(),
            self.source.display()
        )
    }

    fn execute(&self, _ctx: &ActionContext<'_>) -> RunOutcome {
        match self.copy() {
            Ok(bytes) => {
                info!("Wrote {} ({} bytes)", self.destination.display(), bytes);
                RunOutcome::Ok
            }
            Err(err) => RunOutcome::Fatal(err),
        }
    }
}
