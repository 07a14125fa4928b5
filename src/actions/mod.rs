//! Single-shot deploy actions
//!
//! Every provisioning operation is an [`Action`]: it runs once, holds no
//! state between runs, and reports a [`RunOutcome`]. Failures that are
//! expected for a given action (nothing to move, nothing to remove) are
//! reported as [`RunOutcome::Tolerated`] and never abort a pipeline.

pub mod external;
pub mod glob_move;
pub mod symlink;
pub mod template;

pub use external::{ExternalTool, Invocation};
pub use glob_move::MoveByGlob;
pub use symlink::RecreateSymlink;
pub use template::WriteTemplate;

use crate::core::DeployError;
use crate::execution::CommandRunner;
use std::fmt;
use tracing::debug;

/// Outcome of executing an action or a command
#[derive(Debug)]
pub enum RunOutcome {
    /// Action did everything it was asked to
    Ok,
    /// Action failed in a way the caller has agreed to ignore
    Tolerated(String),
    /// Action failed and the pipeline must stop
    Fatal(DeployError),
}

impl RunOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, RunOutcome::Ok)
    }

    pub fn is_tolerated(&self) -> bool {
        matches!(self, RunOutcome::Tolerated(_))
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, RunOutcome::Fatal(_))
    }

    /// Downgrade a fatal outcome to a tolerated one
    pub fn tolerate(self) -> Self {
        match self {
            RunOutcome::Fatal(err) => RunOutcome::Tolerated(err.to_string()),
            other => other,
        }
    }

    /// Convert into a `Result`, treating tolerated failures as success
    pub fn into_result(self) -> Result<(), DeployError> {
        match self {
            RunOutcome::Ok | RunOutcome::Tolerated(_) => Ok(()),
            RunOutcome::Fatal(err) => Err(err),
        }
    }
}

/// Collaborators an action may call into while executing
pub struct ActionContext<'a> {
    pub runner: &'a dyn CommandRunner,
}

impl<'a> ActionContext<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }
}

/// A stateless operation performed by a pipeline step
pub trait Action: fmt::Debug {
    /// Short human-readable summary, used in logs
    fn describe(&self) -> String;

    /// Perform the operation exactly once
    fn execute(&self, ctx: &ActionContext<'_>) -> RunOutcome;
}

/// Runs several actions in order as one
///
/// Stops at the first fatal outcome. Tolerated failures are collected and
/// reported together once every part has run.
#[derive(Debug)]
pub struct Sequence {
    parts: Vec<Box<dyn Action>>,
}

impl Sequence {
    pub fn new(parts: Vec<Box<dyn Action>>) -> Self {
        Self { parts }
    }
}

impl Action for Sequence {
    fn describe(&self) -> String {
        self.parts
            .iter()
            .map(|part| part.describe())
            .collect::<Vec<_>>()
            .join(", then ")
    }

    fn execute(&self, ctx: &ActionContext<'_>) -> RunOutcome {
        let mut tolerated = Vec::new();

        for part in &self.parts {
            debug!("Running {}", part.describe());
            match part.execute(ctx) {
                RunOutcome::Ok => {}
                RunOutcome::Tolerated(detail) => tolerated.push(detail),
                fatal @ RunOutcome::Fatal(_) => return fatal,
            }
        }

        if tolerated.is_empty() {
            RunOutcome::Ok
        } else {
            RunOutcome::Tolerated(tolerated.join("; "))
        }
    }
}
