//! Command-line interface

pub mod deploy;
pub mod output;

pub use deploy::{run, DeployStatus};

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Provision a project checkout for a target environment
#[derive(Debug, Parser, Clone)]
#[command(name = "deploy")]
#[command(version)]
#[command(about = "Deploy configurations for a project checkout", long_about = None)]
pub struct Cli {
    /// Target environment: production, staging or qa
    #[arg(default_value = "production")]
    pub environment: String,

    /// Project checkout to deploy (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Path to deploy configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Answer every confirmation with its default and skip the editor
    #[arg(short = 'n', long)]
    pub no_interaction: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
