//! End-to-end tests for the `apidoc-sync run` command.
//!
//! The build command used here is a small shell script that proves the
//! fetched sources exist while the build runs.

#![cfg(unix)]

mod common;
use common::prelude::*;

/// Shell snippet that prints the fetched widget-core index.
const SHOW_INDEX: &str = "cat docs/apidoc/widget-core/index.rst";

#[test]
fn test_run_help() {
    let mut cmd = cargo_bin_cmd!("apidoc-sync");
    cmd.arg("run")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--latest"))
        .stdout(predicate::str::contains("--pinned"));
}

#[test]
fn test_run_requires_build_command() {
    let fixture = TestFixture::new();
    fixture.command().arg("run").assert().code(2);
}

#[test]
fn test_run_missing_config() {
    let fixture = TestFixture::new();
    fixture
        .command()
        .args(["run", "--", "true"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_run_pinned_sources_visible_during_build_and_removed_after() {
    if !git_available() {
        return;
    }
    let fixture = TestFixture::new()
        .with_component_repo("widget-core", "1.2.0")
        .with_config()
        .with_manifest(&["widget-core==1.2.0"]);

    fixture
        .command()
        .args(["--color", "never", "run", "--", "sh", "-c", SHOW_INDEX])
        .assert()
        .success()
        .stdout(predicate::str::contains("release 1.2.0"))
        .stdout(predicate::str::contains("[OK] widget-core @ 1.2.0"))
        .stdout(predicate::str::contains("1 of 1 components fetched"));

    assert!(!fixture.target().exists());
}

#[test]
fn test_run_latest_from_environment_restores_existing_sources() {
    if !git_available() {
        return;
    }
    let fixture = TestFixture::new()
        .with_component_repo("widget-core", "1.2.0")
        .with_config()
        .with_manifest(&["widget-core==1.2.0"])
        .with_file("docs/apidoc/widget-core/index.rst", "kept locally");

    fixture
        .command()
        .env("DOCS_FROM_MASTER", "1")
        .args(["run", "--", "sh", "-c", SHOW_INDEX])
        .assert()
        .success()
        .stdout(predicate::str::contains("unreleased"));

    assert_eq!(fixture.read_target("widget-core/index.rst"), "kept locally");
}

#[test]
fn test_run_pinned_flag_overrides_environment() {
    if !git_available() {
        return;
    }
    let fixture = TestFixture::new()
        .with_component_repo("widget-core", "1.2.0")
        .with_config()
        .with_manifest(&["widget-core==1.2.0"]);

    fixture
        .command()
        .env("DOCS_FROM_MASTER", "1")
        .args(["run", "--pinned", "--", "sh", "-c", SHOW_INDEX])
        .assert()
        .success()
        .stdout(predicate::str::contains("release 1.2.0"));
}

#[test]
fn test_run_failed_build_still_cleans_up() {
    if !git_available() {
        return;
    }
    let fixture = TestFixture::new()
        .with_component_repo("widget-core", "1.2.0")
        .with_config()
        .with_manifest(&["widget-core==1.2.0"]);

    fixture
        .command()
        .args(["run", "--", "sh", "-c", "exit 3"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed"));

    assert!(!fixture.target().exists());
}

#[test]
fn test_run_unreachable_component_does_not_block_others() {
    if !git_available() {
        return;
    }
    let fixture = TestFixture::new()
        .with_unreachable_component("widget-gone")
        .with_component_repo("widget-core", "1.2.0")
        .with_config()
        .with_manifest(&["widget-gone==0.1.0", "widget-core==1.2.0"]);

    fixture
        .command()
        .args(["--color", "never", "run", "--", "sh", "-c", SHOW_INDEX])
        .assert()
        .success()
        .stdout(predicate::str::contains("[FAIL] widget-gone @ 0.1.0"))
        .stdout(predicate::str::contains("release 1.2.0"))
        .stderr(predicate::str::contains("Copy from git failed for widget-gone"));
}

#[test]
fn test_run_leaves_preexisting_sources_alone() {
    let fixture = TestFixture::new()
        .with_unreachable_component("widget-core")
        .with_config()
        .with_manifest(&["widget-core==1.2.0"])
        .with_file("docs/apidoc/widget-core/index.rst", "hand written");

    fixture
        .command()
        .args(["--color", "never", "run", "--", "true"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already present"))
        .stderr(predicate::str::contains("already exists, skipping source clone"));

    assert_eq!(fixture.read_target("widget-core/index.rst"), "hand written");
}
