//! Post-deploy follow-up actions, each gated by a confirmation

use crate::actions::{Action, ActionContext, ExternalTool, Invocation};
use crate::cli::output::{style, CHECK, INFO};
use crate::core::DeployError;
use crate::execution::CommandRunner;
use crate::interaction::{EditorSession, Prompter};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// The database migration refresh, optionally seeding afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migrations {
    refresh: Invocation,
    seed_flag: String,
    working_dir: PathBuf,
}

impl Migrations {
    pub fn new(
        refresh: Invocation,
        seed_flag: impl Into<String>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            refresh,
            seed_flag: seed_flag.into(),
            working_dir: working_dir.into(),
        }
    }

    /// The command that will run, with or without seeding
    pub fn invocation(&self, seed: bool) -> Invocation {
        if seed {
            self.refresh.clone().arg(self.seed_flag.clone())
        } else {
            self.refresh.clone()
        }
    }

    /// Run the migrations; any failure is returned to the caller
    pub fn run(&self, runner: &dyn CommandRunner, seed: bool) -> Result<(), DeployError> {
        ExternalTool::new(self.invocation(seed), &self.working_dir)
            .execute(&ActionContext::new(runner))
            .into_result()
    }
}

/// Drives the questions asked once the pipeline has succeeded
///
/// Offers to edit the environment config, then the client config, then to
/// run migrations (asking about seeders only if migrations were accepted).
/// Every question defaults to yes.
pub struct InteractionController<'a> {
    prompter: &'a dyn Prompter,
    editor: &'a dyn EditorSession,
    runner: &'a dyn CommandRunner,
    migrations: Migrations,
}

impl<'a> InteractionController<'a> {
    pub fn new(
        prompter: &'a dyn Prompter,
        editor: &'a dyn EditorSession,
        runner: &'a dyn CommandRunner,
        migrations: Migrations,
    ) -> Self {
        Self {
            prompter,
            editor,
            runner,
            migrations,
        }
    }

    /// Run all three follow-ups in order
    ///
    /// Editor outcomes are not checked. A failing migration is returned as
    /// an error.
    pub fn run_post_deploy(
        &self,
        environment_config: &Path,
        client_config: &Path,
    ) -> Result<(), DeployError> {
        self.offer_edit(environment_config)?;
        self.offer_edit(client_config)?;

        if self
            .prompter
            .confirm("Do you wish to run the database migrations?", true)?
        {
            let with_seeders = self.prompter.confirm("Run seeders too?", true)?;

            println!("{} Running database migrations...", INFO);
            info!("Running `{}`", self.migrations.invocation(with_seeders));
            self.migrations.run(self.runner, with_seeders)?;
            println!("{} {}", CHECK, style("Done!").green());
        }

        println!("{} {}", CHECK, style("Finished deploy!").green().bold());
        Ok(())
    }

    fn offer_edit(&self, path: &Path) -> Result<(), DeployError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if self
            .prompter
            .confirm(&format!("Do you wish to edit the {} file now?", name), true)?
        {
            if let Err(err) = self.editor.open(path) {
                warn!("Could not open editor: {}", err);
            }
        }
        Ok(())
    }
}
