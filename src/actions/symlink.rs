//! Replace whatever sits at a path with a fresh symlink

use super::{Action, ActionContext, RunOutcome};
use crate::core::DeployError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Removes anything at `link` then links it to `target`
///
/// Removal is best-effort: a missing path is the normal case on a fresh
/// server. Creating the link is not.
#[derive(Debug, Clone)]
pub struct RecreateSymlink {
    /// What the link points to
    pub target: PathBuf,
    /// Where the link is created
    pub link: PathBuf,
}

impl RecreateSymlink {
    pub fn new(target: impl Into<PathBuf>, link: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            link: link.into(),
        }
    }

    fn remove_existing(&self) -> io::Result<()> {
        let metadata = fs::symlink_metadata(&self.link)?;
        if metadata.is_dir() {
            fs::remove_dir_all(&self.link)
        } else {
            fs::remove_file(&self.link)
        }
    }
}

impl Action for RecreateSymlink {
    fn describe(&self) -> String {
        format!(
            "link {} -> {}",
            self.link.display(),
            self.target.display()
        )
    }

    fn execute(&self, _ctx: &ActionContext<'_>) -> RunOutcome {
        match self.remove_existing() {
            Ok(()) => debug!("Removed existing {}", self.link.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Nothing to remove at {}", self.link.display())
            }
            Err(e) => warn!("Could not remove {}: {}", self.link.display(), e),
        }

        if let Err(e) = create_symlink(&self.target, &self.link) {
            return RunOutcome::Fatal(DeployError::io(&self.link, e));
        }

        info!("Linked {} -> {}", self.link.display(), self.target.display());
        RunOutcome::Ok
    }
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

#[cfg(not(any(unix, windows)))]
fn create_symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are not supported on this platform",
    ))
}
