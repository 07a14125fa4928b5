use anyhow::Result;
use deployer::cli::{self, Cli};
use deployer::execution::ProcessRunner;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    let cli = Cli::from_args();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set logging subscriber: {}", e))?;

    let status = cli::run(&cli, ProcessRunner::new())?;
    Ok(status.exit_code())
}
