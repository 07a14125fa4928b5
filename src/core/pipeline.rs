//! Pipeline domain model

use crate::core::{state::PipelineState, step::Step};

/// An ordered, fixed list of steps plus the state of its current run
#[derive(Debug)]
pub struct Pipeline {
    /// Steps in execution order
    steps: Vec<Step>,

    /// Execution state
    pub state: PipelineState,
}

impl Pipeline {
    pub fn new(steps: Vec<Step>) -> Self {
        let state = PipelineState::new(steps.len());
        Self { steps, state }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Find a step by its label
    pub fn position(&self, label: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.label == label)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Borrow the steps and the mutable run state at the same time
    pub(crate) fn split_mut(&mut self) -> (&[Step], &mut PipelineState) {
        (&self.steps, &mut self.state)
    }
}
