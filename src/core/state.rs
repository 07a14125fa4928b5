//! Execution state models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Overall pipeline execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// Pipeline has not started
    Pending,
    /// Pipeline is currently running
    Running,
    /// Every step ran without a hard failure
    Completed,
    /// A hard-policy step failed
    Failed,
}

/// State of a single step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepState {
    /// Step has not run (yet, or ever, if an earlier step failed)
    Pending,
    Running {
        started_at: DateTime<Utc>,
    },
    Completed {
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    },
    /// Step failed but its failure was swallowed
    Tolerated {
        reason: String,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    },
    /// Step failed and stopped the pipeline
    Failed {
        error: String,
        started_at: DateTime<Utc>,
        failed_at: DateTime<Utc>,
    },
}

impl StepState {
    /// Check if step ran at all
    pub fn has_run(&self) -> bool {
        !matches!(self, StepState::Pending)
    }

    fn started_at(&self) -> Option<DateTime<Utc>> {
        match self {
            StepState::Pending => None,
            StepState::Running { started_at }
            | StepState::Completed { started_at, .. }
            | StepState::Tolerated { started_at, .. }
            | StepState::Failed { started_at, .. } => Some(*started_at),
        }
    }
}

/// Progress of one pipeline run
///
/// `current` counts finished steps and never exceeds `total`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineState {
    pub status: ExecutionStatus,

    /// Number of steps that have finished
    pub current: usize,

    pub total: usize,

    /// Label of the active step, or the final status message
    pub message: String,

    /// Per-step state, indexed like the pipeline's steps
    pub steps: Vec<StepState>,

    pub started_at: Option<DateTime<Utc>>,

    pub completed_at: Option<DateTime<Utc>>,
}

impl PipelineState {
    /// Create state for a pipeline of `total` steps
    pub fn new(total: usize) -> Self {
        Self {
            status: ExecutionStatus::Pending,
            current: 0,
            total,
            message: String::new(),
            steps: vec![StepState::Pending; total],
            started_at: None,
            completed_at: None,
        }
    }

    /// Mark pipeline as started
    pub fn start(&mut self) {
        self.status = ExecutionStatus::Running;
        self.started_at = Some(Utc::now());
        self.current = 0;
        self.message.clear();
        self.steps = vec![StepState::Pending; self.total];
    }

    /// Mark step `index` as running and make its label the current message
    pub fn begin_step(&mut self, index: usize, label: &str) {
        self.message = label.to_string();
        if let Some(state) = self.steps.get_mut(index) {
            *state = StepState::Running {
                started_at: Utc::now(),
            };
        }
    }

    /// Record that step `index` finished, successfully or not
    ///
    /// `reason` is `Some` when the step's failure was tolerated.
    pub fn finish_step(&mut self, index: usize, reason: Option<String>) {
        let now = Utc::now();
        if let Some(state) = self.steps.get_mut(index) {
            let started_at = state.started_at().unwrap_or(now);
            *state = match reason {
                None => StepState::Completed {
                    started_at,
                    completed_at: now,
                },
                Some(reason) => StepState::Tolerated {
                    reason,
                    started_at,
                    completed_at: now,
                },
            };
        }
        self.current = (self.current + 1).min(self.total);
    }

    /// Record that step `index` failed and stopped the run
    pub fn fail_step(&mut self, index: usize, error: String) {
        let now = Utc::now();
        if let Some(state) = self.steps.get_mut(index) {
            let started_at = state.started_at().unwrap_or(now);
            *state = StepState::Failed {
                error,
                started_at,
                failed_at: now,
            };
        }
        self.status = ExecutionStatus::Failed;
        self.completed_at = Some(now);
    }

    /// Mark pipeline as completed
    pub fn complete(&mut self, message: &str) {
        self.status = ExecutionStatus::Completed;
        self.message = message.to_string();
        self.completed_at = Some(Utc::now());
    }

    pub fn is_complete(&self) -> bool {
        self.status == ExecutionStatus::Completed
    }

    pub fn has_failed(&self) -> bool {
        self.status == ExecutionStatus::Failed
    }

    /// Calculate progress percentage (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.current as f64 / self.total as f64
    }
}
