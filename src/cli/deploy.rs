//! The `deploy` command: validate, run the pipeline, then the follow-ups

use super::output::*;
use super::Cli;
use crate::core::{DeployConfig, DeployError, Environment, Pipeline};
use crate::execution::{CommandRunner, ExecutionEngine, PipelineResult};
use crate::interaction::{
    AssumeDefaults, DialoguerPrompter, EditorSession, InteractionController, NoopEditor, Prompter,
    TerminalEditor,
};
use anyhow::{Context, Result};
use console::Term;
use std::process::ExitCode;
use tracing::{debug, error};

/// How a deploy invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStatus {
    /// Pipeline and follow-ups all finished
    Finished,
    /// The environment argument was rejected; nothing ran
    InvalidEnvironment,
    /// A hard step failed; the follow-ups were skipped
    PipelineFailed,
}

impl DeployStatus {
    pub fn exit_code(self) -> ExitCode {
        match self {
            DeployStatus::Finished => ExitCode::SUCCESS,
            DeployStatus::InvalidEnvironment | DeployStatus::PipelineFailed => ExitCode::FAILURE,
        }
    }
}

/// Run a full deploy for `cli` with `runner` spawning every external command
pub fn run<R: CommandRunner>(cli: &Cli, runner: R) -> Result<DeployStatus> {
    // Reject an unknown environment before any side effect
    let environment: Environment = match cli.environment.parse() {
        Ok(environment) => environment,
        Err(e) => {
            println!("{} {}", CROSS, style(e).red());
            return Ok(DeployStatus::InvalidEnvironment);
        }
    };

    let project_root = match &cli.project_root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let project_root = project_root
        .canonicalize()
        .with_context(|| format!("Project root {} does not exist", project_root.display()))?;

    let config = DeployConfig::discover(&project_root, cli.config.as_deref())
        .context("Failed to load deploy config")?;
    debug!("Using config: {:?}", config);

    println!(
        "{} Deploying {} configurations...",
        ROCKET,
        style(environment).bold()
    );

    let mut pipeline = config.to_pipeline(&project_root);

    let mut engine = ExecutionEngine::new(runner);
    if Term::stderr().is_term() {
        engine.add_event_handler(progress_handler(create_progress_bar(pipeline.len())));
    } else {
        engine.add_event_handler(|event| println!("{}", format_execution_event(&event)));
    }

    if let PipelineResult::Failed { label, error, .. } = engine.execute(&mut pipeline) {
        print_failure(&pipeline, &label, &error);
        error!("Deploy aborted at '{}': {}", label, error);
        return Ok(DeployStatus::PipelineFailed);
    }
    println!();

    let (prompter, editor): (Box<dyn Prompter>, Box<dyn EditorSession>) = if cli.no_interaction {
        (Box::new(AssumeDefaults), Box::new(NoopEditor))
    } else {
        (
            Box::new(DialoguerPrompter),
            Box::new(TerminalEditor::resolve(config.editor.as_deref())),
        )
    };

    InteractionController::new(
        prompter.as_ref(),
        editor.as_ref(),
        engine.runner(),
        config.migrations(&project_root),
    )
    .run_post_deploy(
        &config.environment_config_path(&project_root),
        &config.client_config_path(&project_root),
    )
    .context("Post-deploy actions failed")?;

    Ok(DeployStatus::Finished)
}

/// Report the failed step and what had run before it
fn print_failure(pipeline: &Pipeline, label: &str, error: &DeployError) {
    println!();
    println!("{} {} {}", CROSS, style(label).bold(), style("failed").red());
    println!("  {}", style(error).red());

    let ran = pipeline
        .steps()
        .iter()
        .zip(&pipeline.state.steps)
        .filter(|(_, state)| state.has_run());
    for (step, state) in ran {
        println!("  {} {}", format_step_state(state), step.label);
    }
    println!(
        "  Stopped at {}/{} steps ({:.0}%)",
        pipeline.state.current,
        pipeline.state.total,
        pipeline.state.progress() * 100.0
    );
}
