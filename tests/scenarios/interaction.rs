//! Test: Interaction - the questions asked after a successful deploy

use crate::helpers::*;
use deployer::core::{DeployConfig, DeployError};
use deployer::interaction::{AssumeDefaults, InteractionController, NoopEditor};

const EDIT_ENV: &str = "Do you wish to edit the .env file now?";
const EDIT_CLIENT: &str = "Do you wish to edit the config.js file now?";
const MIGRATE: &str = "Do you wish to run the database migrations?";
const SEED: &str = "Run seeders too?";

fn post_deploy(
    fixture: &Fixture,
    prompter: &ScriptedPrompter,
    editor: &RecordingEditor,
    runner: &FakeRunner,
) -> Result<(), DeployError> {
    let config = DeployConfig::default();
    InteractionController::new(prompter, editor, runner, config.migrations(&fixture.root))
        .run_post_deploy(
            &config.environment_config_path(&fixture.root),
            &config.client_config_path(&fixture.root),
        )
}

#[test]
fn test_accepting_everything() {
    let fixture = Fixture::new();
    let prompter = ScriptedPrompter::new(&[true, true, true, true]);
    let editor = RecordingEditor::default();
    let runner = FakeRunner::new();

    post_deploy(&fixture, &prompter, &editor, &runner).unwrap();

    assert_eq!(prompter.asked(), vec![EDIT_ENV, EDIT_CLIENT, MIGRATE, SEED]);
    assert_eq!(
        editor.opened(),
        vec![fixture.root.join(".env"), fixture.root.join("public/js/config.js")]
    );
    assert_eq!(runner.commands(), vec!["php artisan migrate:refresh --seed"]);
    assert_eq!(runner.calls()[0].working_dir, fixture.root);
}

#[test]
fn test_declining_migrations_skips_seed_question() {
    let fixture = Fixture::new();
    let prompter = ScriptedPrompter::new(&[false, false, false]);
    let editor = RecordingEditor::default();
    let runner = FakeRunner::new();

    post_deploy(&fixture, &prompter, &editor, &runner).unwrap();

    assert_eq!(prompter.asked(), vec![EDIT_ENV, EDIT_CLIENT, MIGRATE]);
    assert!(editor.opened().is_empty());
    assert!(runner.commands().is_empty());
}

#[test]
fn test_migrations_without_seeders() {
    let fixture = Fixture::new();
    let prompter = ScriptedPrompter::new(&[false, true, true, false]);
    let editor = RecordingEditor::default();
    let runner = FakeRunner::new();

    post_deploy(&fixture, &prompter, &editor, &runner).unwrap();

    assert_eq!(editor.opened(), vec![fixture.root.join("public/js/config.js")]);
    assert_eq!(runner.commands(), vec!["php artisan migrate:refresh"]);
}

#[test]
fn test_migration_failure_is_returned() {
    let fixture = Fixture::new();
    let prompter = ScriptedPrompter::new(&[false, false, true, true]);
    let editor = RecordingEditor::default();
    let runner = FakeRunner::failing_on("php artisan migrate:refresh");

    let err = post_deploy(&fixture, &prompter, &editor, &runner).unwrap_err();

    assert!(matches!(err, DeployError::CommandFailed { .. }));
}

#[test]
fn test_unattended_run_takes_defaults() {
    let fixture = Fixture::new();
    let config = DeployConfig::default();
    let runner = FakeRunner::new();

    InteractionController::new(
        &AssumeDefaults,
        &NoopEditor,
        &runner,
        config.migrations(&fixture.root),
    )
    .run_post_deploy(
        &config.environment_config_path(&fixture.root),
        &config.client_config_path(&fixture.root),
    )
    .unwrap();

    assert_eq!(runner.commands(), vec!["php artisan migrate:refresh --seed"]);
}
