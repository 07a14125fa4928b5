//! Test: Command Line - the full `deploy` invocation against a checkout

use crate::helpers::*;
use deployer::cli::{run, Cli, DeployStatus};
use std::fs;

fn cli(args: &[&str], fixture: &Fixture) -> Cli {
    let root = fixture.root.to_string_lossy().into_owned();
    let mut argv = vec!["deploy"];
    argv.extend_from_slice(args);
    argv.extend_from_slice(&["--project-root", root.as_str(), "-n"]);
    Cli::try_parse_from(argv).unwrap()
}

#[test]
fn test_invalid_environment_touches_nothing() {
    let fixture = Fixture::new();
    let runner = FakeRunner::new();

    let status = run(&cli(&["dev"], &fixture), &runner).unwrap();

    assert_eq!(status, DeployStatus::InvalidEnvironment);
    assert!(runner.commands().is_empty());
    assert!(!fixture.root.join(".env").exists());
    assert!(!fixture.root.join("public/js/config.js").exists());
    assert!(fs::symlink_metadata(fixture.account.join("private_html")).is_err());
    assert!(fixture.account.join("public_html/404.shtml").exists());
}

#[test]
fn test_invalid_environment_ignores_broken_config() {
    let fixture = Fixture::new();
    fs::write(fixture.root.join("deploy.yaml"), "permissions: [not, a, map]\n").unwrap();

    let status = run(&cli(&["Production"], &fixture), &FakeRunner::new()).unwrap();

    assert_eq!(status, DeployStatus::InvalidEnvironment);
}

#[test]
fn test_unattended_deploy_runs_pipeline_and_migrations() {
    let fixture = Fixture::new();
    let runner = FakeRunner::new();

    let status = run(&cli(&["staging"], &fixture), &runner).unwrap();

    assert_eq!(status, DeployStatus::Finished);
    assert_eq!(fixture.read(".env"), ENV_STUB);
    assert_eq!(fixture.read("public/js/config.js"), CLIENT_STUB);
    assert_eq!(
        runner.commands().last().map(String::as_str),
        Some("php artisan migrate:refresh --seed")
    );
}

#[test]
fn test_pipeline_failure_skips_follow_ups() {
    let fixture = Fixture::new();
    let runner = FakeRunner::failing_on("composer");

    let status = run(&cli(&[], &fixture), &runner).unwrap();

    assert_eq!(status, DeployStatus::PipelineFailed);
    assert_eq!(runner.commands(), vec!["composer install"]);
}

#[test]
fn test_migration_failure_is_an_error() {
    let fixture = Fixture::new();
    let runner = FakeRunner::failing_on("php artisan migrate:refresh");

    let err = run(&cli(&["qa"], &fixture), &runner).unwrap_err();

    assert!(err.to_string().contains("Post-deploy actions failed"));
}
