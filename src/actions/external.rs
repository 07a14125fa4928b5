//! External tool invocations (package installer, framework commands, chmod)

use super::{Action, ActionContext, RunOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

/// A program plus its argument list
///
/// Always spawned directly, never through a shell, so arguments reach the
/// program exactly as written. In configuration files an invocation is a
/// list of words: `["php", "artisan", "optimize"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Build from a word list, the first word being the program
    pub fn from_words(words: &[&str]) -> Self {
        let mut words = words.iter();
        let program = words.next().copied().unwrap_or_default();
        Self {
            program: program.to_string(),
            args: words.map(|w| w.to_string()).collect(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<String>> for Invocation {
    type Error = String;

    fn try_from(words: Vec<String>) -> Result<Self, Self::Error> {
        let mut words = words.into_iter();
        match words.next() {
            Some(program) if !program.trim().is_empty() => Ok(Self {
                program,
                args: words.collect(),
            }),
            _ => Err("command must name a program".to_string()),
        }
    }
}

impl From<Invocation> for Vec<String> {
    fn from(invocation: Invocation) -> Self {
        std::iter::once(invocation.program)
            .chain(invocation.args)
            .collect()
    }
}

/// Runs one or more external commands in a fixed working directory
///
/// Commands run in order. In strict mode the first failing command stops
/// the rest and the action is fatal; in tolerant mode every command runs
/// and failures are only reported.
#[derive(Debug, Clone)]
pub struct ExternalTool {
    pub invocations: Vec<Invocation>,
    pub working_dir: PathBuf,
    pub tolerant: bool,
}

impl ExternalTool {
    /// A single command that must succeed
    pub fn new(invocation: Invocation, working_dir: impl Into<PathBuf>) -> Self {
        Self::sequence(vec![invocation], working_dir)
    }

    /// Several commands that must all succeed, run in order
    pub fn sequence(invocations: Vec<Invocation>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            invocations,
            working_dir: working_dir.into(),
            tolerant: false,
        }
    }

    pub fn tolerant(mut self) -> Self {
        self.tolerant = true;
        self
    }
}

impl Action for ExternalTool {
    fn describe(&self) -> String {
        let commands = self
            .invocations
            .iter()
            .map(|inv| format!("`{}`", inv))
            .collect::<Vec<_>>()
            .join(", ");
        format!("run {} in {}", commands, self.working_dir.display())
    }

    fn execute(&self, ctx: &ActionContext<'_>) -> RunOutcome {
        let mut tolerated = Vec::new();

        for invocation in &self.invocations {
            match ctx.runner.run(invocation, &self.working_dir, !self.tolerant) {
                RunOutcome::Ok => {}
                RunOutcome::Tolerated(detail) => {
                    warn!("Ignoring failure of `{}`: {}", invocation, detail);
                    tolerated.push(detail);
                }
                fatal @ RunOutcome::Fatal(_) => return fatal,
            }
        }

        if tolerated.is_empty() {
            RunOutcome::Ok
        } else {
            RunOutcome::Tolerated(tolerated.join("; "))
        }
    }
}
