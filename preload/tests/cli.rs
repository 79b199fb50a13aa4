//! End-to-end tests for the preload binary.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use preload_codegen::testing::{Fixture, ProjectFixture};
use tempfile::TempDir;

/// A preload command rooted at `dir`, isolated from the caller's Composer environment.
fn preload_cmd(dir: &std::path::Path) -> Command {
    let mut cmd = cargo_bin_cmd!("preload");
    cmd.env_remove("COMPOSER")
        .env_remove("COMPOSER_VENDOR_DIR")
        .env_remove("RUST_LOG")
        .arg("--working-dir")
        .arg(dir);
    cmd
}

fn fixture() -> Fixture {
    ProjectFixture::new()
        .root_preload(&["app/helpers.php"])
        .package("acme/polyfill", &["bootstrap.php"])
        .existing_file("e1", "acme/other/functions.php")
        .build()
        .unwrap()
}

#[test]
fn test_help() {
    cargo_bin_cmd!("preload")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dump"))
        .stdout(predicate::str::contains("hook"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_dump_writes_files() {
    let fixture = fixture();

    preload_cmd(fixture.root())
        .arg("dump")
        .assert()
        .success()
        .stdout(predicate::str::contains("Adding preload files to the autoload files."))
        .stdout(predicate::str::contains("  + app/helpers.php (acme/app)"))
        .stdout(predicate::str::contains("  + bootstrap.php (acme/polyfill)"))
        .stdout(predicate::str::contains("Updated: vendor/composer/autoload_files.php"))
        .stdout(predicate::str::contains("Updated: vendor/composer/autoload_static.php"))
        .stdout(predicate::str::contains("Static class: ComposerStaticInit0123456789abcdef"));

    let files = fixture.autoload_files().unwrap();
    let helpers = files.find("/app/helpers.php").unwrap();
    let existing = files.find("/acme/other/functions.php").unwrap();
    assert!(helpers < existing);
    assert!(
        fixture
            .autoload_static()
            .unwrap()
            .contains("class ComposerStaticInit0123456789abcdef")
    );
}

#[test]
fn test_dump_twice_is_unchanged() {
    let fixture = fixture();

    preload_cmd(fixture.root()).arg("dump").assert().success();
    preload_cmd(fixture.root())
        .arg("dump")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unchanged: vendor/composer/autoload_files.php"));
}

#[test]
fn test_dump_dry_run_writes_nothing() {
    let fixture = fixture();
    let before = fixture.autoload_files().unwrap();

    preload_cmd(fixture.root())
        .args(["dump", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("── vendor/composer/autoload_files.php ──"))
        .stdout(predicate::str::contains("$baseDir . '/app/helpers.php'"))
        .stdout(predicate::str::contains(
            "2 preload files would be added to vendor/composer/autoload_files.php",
        ));

    assert_eq!(fixture.autoload_files().unwrap(), before);
    assert!(fixture.autoload_static().is_err());
}

#[test]
fn test_nothing_to_preload() {
    let fixture = ProjectFixture::new().build().unwrap();

    preload_cmd(fixture.root())
        .arg("dump")
        .assert()
        .success()
        .stdout(predicate::str::contains("No preload files declared"));

    assert!(fixture.autoload_static().is_err());
}

#[test]
fn test_list() {
    let fixture = fixture();

    preload_cmd(fixture.root())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Preload files (2):"))
        .stdout(predicate::str::contains("  1. app/helpers.php (acme/app)"))
        .stdout(predicate::str::contains(
            "  2. vendor/acme/polyfill/bootstrap.php (acme/polyfill)",
        ));

    assert!(fixture.autoload_static().is_err());
}

#[test]
fn test_hook_runs_once_per_session() {
    let fixture = fixture();

    preload_cmd(fixture.root())
        .args(["hook", "post-autoload-dump", "post-install-cmd"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Adding preload files to the autoload files.").count(1))
        .stdout(predicate::str::contains("post-install-cmd: preload files already added"));
}

#[test]
fn test_hook_rejects_unknown_event() {
    let fixture = fixture();

    preload_cmd(fixture.root())
        .args(["hook", "pre-update-cmd"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pre-update-cmd"));
}

#[test]
fn test_missing_composer_json() {
    let temp = TempDir::new().unwrap();

    preload_cmd(temp.path())
        .arg("dump")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read"));
}
