//! Error types for deploy operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can stop a deploy
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Command `{command}` failed ({}): {stderr}", describe_status(.status))]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl DeployError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DeployError::Io {
            path: path.into(),
            source,
        }
    }
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {}", code),
        None => "no exit code".to_string(),
    }
}
