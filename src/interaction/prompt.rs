//! Yes/no confirmation prompts

use crate::core::DeployError;
use dialoguer::Confirm;
use tracing::debug;

/// Asks the operator a yes/no question
pub trait Prompter {
    /// Ask `prompt`; accepting without an explicit answer yields `default`
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, DeployError>;
}

/// Interactive prompt on the controlling terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, DeployError> {
        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;

        Ok(confirmed)
    }
}

/// Answers every prompt with its default, for unattended runs
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeDefaults;

impl Prompter for AssumeDefaults {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, DeployError> {
        debug!("{} -> {}", prompt, if default { "yes" } else { "no" });
        Ok(default)
    }
}
