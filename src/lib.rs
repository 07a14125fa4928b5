//! deployer - provisions a web-application checkout for an environment

pub mod actions;
pub mod cli;
pub mod core;
pub mod execution;
pub mod interaction;

// Re-export commonly used types
pub use actions::{Action, ActionContext, Invocation, RunOutcome};
pub use core::{DeployConfig, DeployError, Environment, ExecutionStatus, Pipeline, Step, StepState};
pub use execution::{CommandRunner, ExecutionEngine, ExecutionEvent, PipelineResult, ProcessRunner};
pub use interaction::{EditorSession, InteractionController, Prompter};
