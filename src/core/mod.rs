//! Core domain models for a deploy
//!
//! This module defines the environment, the steps and pipeline a deploy is
//! made of, their run state, configuration, and errors.

pub mod config;
pub mod environment;
pub mod error;
pub mod pipeline;
pub mod state;
pub mod step;

pub use config::DeployConfig;
pub use environment::Environment;
pub use error::DeployError;
pub use pipeline::*;
pub use state::*;
pub use step::*;
