//! Interactive phase run after a successful deploy

pub mod controller;
pub mod editor;
pub mod prompt;

pub use controller::{InteractionController, Migrations};
pub use editor::{EditorSession, NoopEditor, TerminalEditor};
pub use prompt::{AssumeDefaults, DialoguerPrompter, Prompter};
