//! Best-effort relocation of files matching a glob

use super::{Action, ActionContext, RunOutcome};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Moves every file matching `pattern` into `destination`
///
/// Both paths are relative to `working_dir`. This action never fails a
/// pipeline: an invalid pattern, zero matches, or a file that cannot be
/// moved all end up as [`RunOutcome::Tolerated`].
#[derive(Debug, Clone)]
pub struct MoveByGlob {
    pub pattern: String,
    pub destination: PathBuf,
    pub working_dir: PathBuf,
}

impl MoveByGlob {
    pub fn new(
        pattern: impl Into<String>,
        destination: impl Into<PathBuf>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            destination: destination.into(),
            working_dir: working_dir.into(),
        }
    }

    fn full_pattern(&self) -> String {
        let base = glob::Pattern::escape(&self.working_dir.to_string_lossy());
        format!("{}/{}", base.trim_end_matches('/'), self.pattern)
    }

    fn move_matches(&self) -> Result<usize, String> {
        let pattern = self.full_pattern();
        let options = glob::MatchOptions {
            require_literal_leading_dot: true,
            ..glob::MatchOptions::new()
        };
        let entries = glob::glob_with(&pattern, options)
            .map_err(|e| format!("Invalid glob pattern '{}': {}", self.pattern, e))?;

        let destination = self.working_dir.join(&self.destination);
        let mut moved = 0;
        let mut failures = Vec::new();

        for path in entries.filter_map(Result::ok).filter(|p| p.is_file()) {
            let Some(name) = path.file_name() else {
                continue;
            };
            let dest = destination.join(name);
            match move_file(&path, &dest) {
                Ok(()) => {
                    debug!("Moved {} -> {}", path.display(), dest.display());
                    moved += 1;
                }
                Err(e) => failures.push(format!("{}: {}", path.display(), e)),
            }
        }

        if !failures.is_empty() {
            return Err(failures.join("; "));
        }
        if moved == 0 {
            return Err(format!(
                "No files match {} in {}",
                self.pattern,
                self.working_dir.display()
            ));
        }
        Ok(moved)
    }
}

/// Rename, falling back to copy + remove across filesystems
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if !to.parent().is_some_and(Path::is_dir) {
                return Err(rename_err);
            }
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}

impl Action for MoveByGlob {
    fn describe(&self) -> String {
        format!(
            "move {} to {} (in {})",
            self.pattern,
            self.destination.display(),
            self.working_dir.display()
        )
    }

    fn execute(&self, _ctx: &ActionContext<'_>) -> RunOutcome {
        match self.move_matches() {
            Ok(count) => {
                info!("Moved {} file(s) into {}", count, self.destination.display());
                RunOutcome::Ok
            }
            Err(detail) => {
                debug!("Glob move skipped: {}", detail);
                RunOutcome::Tolerated(detail)
            }
        }
    }
}
