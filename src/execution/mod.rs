//! Pipeline execution engine

pub mod engine;
pub mod runner;

pub use engine::*;
pub use runner::*;
