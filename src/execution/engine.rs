//! Main execution engine - runs a deploy pipeline step by step

use crate::{
    actions::{ActionContext, RunOutcome},
    core::{config::DONE_MESSAGE, DeployError, ExecutionStatus, FailurePolicy, Pipeline},
    execution::CommandRunner,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Events that can occur during pipeline execution
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionEvent {
    PipelineStarted {
        total: usize,
    },
    /// Emitted before a step runs; `current` is the number of finished steps
    StepStarted {
        current: usize,
        total: usize,
        label: String,
    },
    /// Emitted after a step ran; `current` already includes it
    StepCompleted {
        current: usize,
        total: usize,
        label: String,
    },
    /// The step failed but its failure was swallowed
    StepTolerated {
        label: String,
        reason: String,
    },
    StepFailed {
        label: String,
        error: String,
    },
    PipelineCompleted {
        status: ExecutionStatus,
        message: String,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(ExecutionEvent) + Send + Sync>;

/// How a pipeline run ended
#[derive(Debug)]
pub enum PipelineResult {
    Succeeded,
    /// A hard-policy step failed; nothing after it ran
    Failed {
        index: usize,
        label: String,
        error: DeployError,
    },
}

impl PipelineResult {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineResult::Succeeded)
    }
}

/// Runs pipelines one step at a time, in order
pub struct ExecutionEngine<R> {
    runner: R,
    event_handlers: Vec<EventHandler>,
}

impl<R: CommandRunner> ExecutionEngine<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            event_handlers: Vec::new(),
        }
    }

    /// The runner steps use to spawn commands
    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(ExecutionEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    /// Emit an event to all handlers
    fn emit_event(&self, event: ExecutionEvent) {
        for handler in &self.event_handlers {
            handler(event.clone());
        }
    }

    /// Execute the entire pipeline
    ///
    /// Each step runs exactly once. A fatal outcome from a hard-policy step
    /// stops the run immediately; later steps stay pending.
    pub fn execute(&self, pipeline: &mut Pipeline) -> PipelineResult {
        let ctx = ActionContext::new(&self.runner);
        let (steps, state) = pipeline.split_mut();
        let total = steps.len();

        info!("Starting deploy pipeline ({} steps)", total);
        state.start();
        self.emit_event(ExecutionEvent::PipelineStarted { total });

        for (index, step) in steps.iter().enumerate() {
            state.begin_step(index, &step.label);
            self.emit_event(ExecutionEvent::StepStarted {
                current: state.current,
                total,
                label: step.label.clone(),
            });
            debug!("[{}/{}] {}: {}", index + 1, total, step.label, step.action.describe());

            let outcome = match step.policy {
                FailurePolicy::Hard => step.action.execute(&ctx),
                FailurePolicy::Tolerant => step.action.execute(&ctx).tolerate(),
            };

            match outcome {
                RunOutcome::Ok => state.finish_step(index, None),
                RunOutcome::Tolerated(reason) => {
                    warn!("{} {}", step.label, reason);
                    self.emit_event(ExecutionEvent::StepTolerated {
                        label: step.label.clone(),
                        reason: reason.clone(),
                    });
                    state.finish_step(index, Some(reason));
                }
                RunOutcome::Fatal(err) => {
                    error!("Step '{}' failed: {}", step.label, err);
                    state.fail_step(index, err.to_string());
                    self.emit_event(ExecutionEvent::StepFailed {
                        label: step.label.clone(),
                        error: err.to_string(),
                    });
                    self.emit_event(ExecutionEvent::PipelineCompleted {
                        status: ExecutionStatus::Failed,
                        message: state.message.clone(),
                    });
                    return PipelineResult::Failed {
                        index,
                        label: step.label.clone(),
                        error: err,
                    };
                }
            }

            self.emit_event(ExecutionEvent::StepCompleted {
                current: state.current,
                total,
                label: step.label.clone(),
            });
        }

        state.complete(DONE_MESSAGE);
        info!("Deploy pipeline finished");
        self.emit_event(ExecutionEvent::PipelineCompleted {
            status: ExecutionStatus::Completed,
            message: state.message.clone(),
        });

        PipelineResult::Succeeded
    }
}
