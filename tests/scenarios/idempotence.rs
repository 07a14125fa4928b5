//! Test: Idempotence - deploying twice leaves the same result

use crate::helpers::*;
use deployer::core::{DeployConfig, StepState};
use std::fs;

#[test]
fn test_second_deploy_overwrites_config_files() {
    let fixture = Fixture::new();
    let config = DeployConfig::default();

    let (first, _) = run_deploy(&fixture, &config, FakeRunner::new());
    assert!(first.result.is_success());

    fs::write(fixture.root.join(".env"), "APP_ENV=local\n").unwrap();
    fs::write(fixture.root.join("public/js/config.js"), "edited").unwrap();

    let (second, _) = run_deploy(&fixture, &config, FakeRunner::new());

    assert!(second.result.is_success());
    assert_eq!(fixture.read(".env"), ENV_STUB);
    assert_eq!(fixture.read("public/js/config.js"), CLIENT_STUB);
}

#[test]
fn test_second_deploy_tolerates_already_moved_error_pages() {
    let fixture = Fixture::new();
    let config = DeployConfig::default();

    run_deploy(&fixture, &config, FakeRunner::new());
    let (second, _) = run_deploy(&fixture, &config, FakeRunner::new());

    assert!(second.result.is_success());
    assert!(matches!(
        second.state_of("Moving default error views..."),
        StepState::Tolerated { .. }
    ));
    assert_eq!(fixture.read("public/404.shtml"), "not found");
}

#[cfg(unix)]
#[test]
fn test_second_deploy_recreates_symlink() {
    let fixture = Fixture::new();
    let config = DeployConfig::default();

    run_deploy(&fixture, &config, FakeRunner::new());
    let (second, _) = run_deploy(&fixture, &config, FakeRunner::new());

    assert!(second.result.is_success());
    let link = fixture.account.join("private_html");
    assert_eq!(fs::read_link(&link).unwrap(), fixture.root.join("public"));
    assert!(fixture.root.join("public/index.php").exists());
}
