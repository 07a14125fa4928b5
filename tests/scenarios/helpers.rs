//! Test utility functions for deploy scenarios

use deployer::actions::{Invocation, RunOutcome};
use deployer::core::{DeployConfig, DeployError, Pipeline, StepState};
use deployer::execution::{CommandRunner, ExecutionEngine, ExecutionEvent, PipelineResult};
use deployer::interaction::{EditorSession, Prompter};

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// One command the fake runner was asked to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommand {
    pub command: String,
    pub working_dir: PathBuf,
}

/// Runner that records invocations instead of spawning them
///
/// Commands whose rendered form starts with `fail_on` fail with exit code 1.
#[derive(Debug, Default)]
pub struct FakeRunner {
    calls: Mutex<Vec<RecordedCommand>>,
    fail_on: Option<String>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(prefix: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(prefix.to_string()),
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|c| c.command.clone()).collect()
    }

    pub fn calls(&self) -> Vec<RecordedCommand> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, invocation: &Invocation, working_dir: &Path, must_succeed: bool) -> RunOutcome {
        let command = invocation.to_string();
        self.calls.lock().unwrap().push(RecordedCommand {
            command: command.clone(),
            working_dir: working_dir.to_path_buf(),
        });

        let fails = self.fail_on.as_deref().is_some_and(|p| command.starts_with(p));
        if !fails {
            return RunOutcome::Ok;
        }

        let err = DeployError::CommandFailed {
            command,
            status: Some(1),
            stderr: "simulated failure".to_string(),
        };
        if must_succeed {
            RunOutcome::Fatal(err)
        } else {
            RunOutcome::Tolerated(err.to_string())
        }
    }
}

/// Prompter answering from a fixed script and remembering the questions
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<bool>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().copied().collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, DeployError> {
        self.asked.borrow_mut().push(prompt.to_string());
        Ok(self.answers.borrow_mut().pop_front().unwrap_or(default))
    }
}

/// Editor that only records which files it was asked to open
#[derive(Default)]
pub struct RecordingEditor {
    opened: RefCell<Vec<PathBuf>>,
}

impl RecordingEditor {
    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.borrow().clone()
    }
}

impl EditorSession for RecordingEditor {
    fn open(&self, path: &Path) -> Result<(), DeployError> {
        self.opened.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

pub const ENV_STUB: &str = "APP_ENV=production\nAPP_KEY=\nDB_HOST=127.0.0.1\n";
pub const CLIENT_STUB: &str = "window.config = { api: '/api' };\n";

/// A hosting account laid out the way the deploy expects
///
/// ```text
/// <tmp>/backend            project root
/// <tmp>/backend/stubs      templates
/// <tmp>/backend/public/js
/// <tmp>/backend/storage
/// <tmp>/public_html        web root with server error pages
/// ```
pub struct Fixture {
    _dir: TempDir,
    pub account: PathBuf,
    pub root: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let account = dir.path().canonicalize().unwrap();
        let root = account.join("backend");

        fs::create_dir_all(root.join("stubs")).unwrap();
        fs::create_dir_all(root.join("public/js")).unwrap();
        fs::create_dir_all(root.join("storage/logs")).unwrap();
        fs::write(root.join("stubs/.env.stub"), ENV_STUB).unwrap();
        fs::write(root.join("stubs/config.js.stub"), CLIENT_STUB).unwrap();
        fs::write(root.join("public/index.php"), "<?php\n").unwrap();

        fs::create_dir_all(account.join("public_html")).unwrap();
        fs::write(account.join("public_html/404.shtml"), "not found").unwrap();
        fs::write(account.join("public_html/500.shtml"), "server error").unwrap();

        Self {
            _dir: dir,
            account,
            root,
        }
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.root.join(relative)).unwrap()
    }
}

/// The result of running a pipeline, with every event it emitted
pub struct DeployRun {
    pub pipeline: Pipeline,
    pub result: PipelineResult,
    pub events: Vec<ExecutionEvent>,
}

impl DeployRun {
    pub fn state_of(&self, label: &str) -> &StepState {
        let index = self
            .pipeline
            .position(label)
            .unwrap_or_else(|| panic!("no step labelled '{}'", label));
        &self.pipeline.state.steps[index]
    }

    pub fn started_labels(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ExecutionEvent::StepStarted { label, .. } => Some(label.clone()),
                _ => None,
            })
            .collect()
    }
}

/// Build the pipeline for `fixture` and run it against `runner`
pub fn run_deploy<R: CommandRunner>(
    fixture: &Fixture,
    config: &DeployConfig,
    runner: R,
) -> (DeployRun, R) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);

    let mut engine = ExecutionEngine::new(runner);
    engine.add_event_handler(move |event| sink.lock().unwrap().push(event));

    let mut pipeline = config.to_pipeline(&fixture.root);
    let result = engine.execute(&mut pipeline);
    let events = events.lock().unwrap().clone();

    (
        DeployRun {
            pipeline,
            result,
            events,
        },
        engine.into_runner(),
    )
}

/// Assert that the step with `label` ran to completion
pub fn assert_step_completed(run: &DeployRun, label: &str) {
    let state = run.state_of(label);
    assert!(
        matches!(state, StepState::Completed { .. }),
        "Step '{}' should be completed, got {:?}",
        label,
        state
    );
}
