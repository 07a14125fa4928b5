//! Handing the terminal to an external editor

use crate::core::DeployError;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Editor used when neither the config nor the environment names one
pub const FALLBACK_EDITOR: &str = "nano";

/// An interactive session the deploy blocks on until it ends
pub trait EditorSession {
    /// Open `path` and wait for the session to finish
    fn open(&self, path: &Path) -> Result<(), DeployError>;
}

/// Runs an editor attached to the current terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalEditor {
    program: String,
    args: Vec<String>,
}

impl TerminalEditor {
    /// Parse an editor command line such as `code --wait`
    ///
    /// Quoting follows shell rules, so `"/opt/Sublime Text/subl" -w` names a
    /// program containing a space. Blank or unbalanced input yields `None`.
    pub fn from_command_line(command: &str) -> Option<Self> {
        if command.trim().is_empty() {
            return None;
        }
        let mut words = shell_words::split(command).ok()?.into_iter();
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
        })
    }

    /// Pick the editor: configured, then `$VISUAL`, then `$EDITOR`, then nano
    pub fn resolve(configured: Option<&str>) -> Self {
        Self::resolve_with(configured, |name| std::env::var(name).ok())
    }

    /// Like [`resolve`](Self::resolve) with a custom variable lookup
    ///
    /// Blank or unparseable candidates are skipped.
    pub fn resolve_with<F>(configured: Option<&str>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let candidates = configured
            .map(str::to_string)
            .into_iter()
            .chain(["VISUAL", "EDITOR"].into_iter().filter_map(&lookup));

        for command in candidates {
            if let Some(editor) = Self::from_command_line(&command) {
                return editor;
            }
            debug!("Skipping unusable editor command '{}'", command);
        }

        Self {
            program: FALLBACK_EDITOR.to_string(),
            args: Vec::new(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl EditorSession for TerminalEditor {
    fn open(&self, path: &Path) -> Result<(), DeployError> {
        info!("Opening {} in {}", path.display(), self.program);

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| DeployError::CommandFailed {
                command: format!("{} {}", self.program, path.display()),
                status: None,
                stderr: format!("failed to spawn: {}", e),
            })?;

        debug!("Editor exited with {}", status);
        Ok(())
    }
}

/// Skips the edit entirely
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEditor;

impl EditorSession for NoopEditor {
    fn open(&self, path: &Path) -> Result<(), DeployError> {
        debug!("Not opening {}: no interactive terminal", path.display());
        Ok(())
    }
}
