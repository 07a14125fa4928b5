//! Step domain model

use crate::actions::Action;
use serde::{Deserialize, Serialize};

/// What a pipeline does when a step's action fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// A fatal outcome stops the pipeline
    Hard,
    /// Any failure is logged and swallowed
    Tolerant,
}

/// A single labelled entry in a pipeline
#[derive(Debug)]
pub struct Step {
    /// Progress message shown while the step runs
    pub label: String,

    /// The operation performed
    pub action: Box<dyn Action>,

    pub policy: FailurePolicy,
}

impl Step {
    pub fn new(label: impl Into<String>, action: Box<dyn Action>, policy: FailurePolicy) -> Self {
        Self {
            label: label.into(),
            action,
            policy,
        }
    }

    /// A step whose failure aborts the pipeline
    pub fn hard(label: impl Into<String>, action: impl Action + 'static) -> Self {
        Self::new(label, Box::new(action), FailurePolicy::Hard)
    }

    /// A step whose failure is ignored
    pub fn tolerant(label: impl Into<String>, action: impl Action + 'static) -> Self {
        Self::new(label, Box::new(action), FailurePolicy::Tolerant)
    }

    pub fn is_tolerant(&self) -> bool {
        self.policy == FailurePolicy::Tolerant
    }
}
