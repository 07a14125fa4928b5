//! CLI output formatting

use crate::core::{ExecutionStatus, StepState};
use crate::execution::ExecutionEvent;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

const PROGRESS_TEMPLATE: &str = "[{bar:40.cyan/blue}] => {pos}/{len} -- {msg}";

/// Create the deploy progress bar
pub fn create_progress_bar(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    let style = ProgressStyle::with_template(PROGRESS_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    progress.set_style(style);
    progress
}

/// Event handler that drives `progress` from pipeline events
pub fn progress_handler(progress: ProgressBar) -> impl Fn(ExecutionEvent) + Send + Sync + 'static {
    move |event| match event {
        ExecutionEvent::StepStarted { label, .. } => progress.set_message(label),
        ExecutionEvent::StepCompleted { current, .. } => progress.set_position(current as u64),
        ExecutionEvent::StepTolerated { label, reason } => {
            progress.println(format!("{}{} {}", WARN, style(label).yellow(), style(reason).dim()))
        }
        ExecutionEvent::StepFailed { label, .. } => {
            progress.abandon_with_message(format!("{} {}", style(label).red(), style("failed").red()))
        }
        ExecutionEvent::PipelineCompleted {
            status: ExecutionStatus::Completed,
            message,
        } => progress.finish_with_message(message),
        ExecutionEvent::PipelineStarted { .. } | ExecutionEvent::PipelineCompleted { .. } => {}
    }
}

/// Format a step state for display
pub fn format_step_state(state: &StepState) -> String {
    match state {
        StepState::Pending => style("PENDING").dim().to_string(),
        StepState::Running { .. } => style("RUNNING").yellow().to_string(),
        StepState::Completed { .. } => style("COMPLETED").green().to_string(),
        StepState::Tolerated { .. } => style("TOLERATED").yellow().to_string(),
        StepState::Failed { .. } => style("FAILED").red().to_string(),
    }
}

/// Format an execution event for a plain, line-per-event log
pub fn format_execution_event(event: &ExecutionEvent) -> String {
    match event {
        ExecutionEvent::PipelineStarted { total } => {
            format!("{} Deploying ({} steps)", ROCKET, style(total).cyan())
        }
        ExecutionEvent::StepStarted { current, total, label } => format!(
            "[{}/{}] {}",
            style(current + 1).cyan(),
            style(total).dim(),
            style(label).bold()
        ),
        ExecutionEvent::StepCompleted { label, .. } => format!("{} {}", CHECK, style(label).green()),
        ExecutionEvent::StepTolerated { label, reason } => {
            format!("{} {} ({})", WARN, style(label).yellow(), style(reason).dim())
        }
        ExecutionEvent::StepFailed { label, error } => {
            format!("{} {}: {}", CROSS, style(label).red(), style(error).dim())
        }
        ExecutionEvent::PipelineCompleted { status, message } => match status {
            ExecutionStatus::Completed => format!("{} {}", CHECK, style(message).green()),
            ExecutionStatus::Failed => format!("{} Deploy {}", CROSS, style("failed").red()),
            other => format!("{} {:?}", INFO, other),
        },
    }
}
