//! Runs real shell commands against a temporary workspace

mod common;

use common::{config, labels};
use orbit_build::{Orchestrator, ShellRunner};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Workspace whose commands append to a shared log file
fn logging_workspace(root: &Path, packages: &[&str]) -> Orchestrator {
    for package in packages {
        fs::create_dir_all(root.join(package)).unwrap();
    }
    fs::create_dir_all(root.join("sibling")).unwrap();
    let log = root.join("run.log");
    let log = log.display();
    let names = packages
        .iter()
        .map(|p| format!("\"{}\"", p))
        .collect::<Vec<_>>()
        .join(", ");

    let toml = format!(
        r#"
[workspace]
packages = [{names}]
shared_dirs = ["_build"]

[[tools]]
name = "hex"
check = "test -f {root}/.hex-installed"
install = "touch {root}/.hex-installed && echo install-hex >> {log}"

[actions.fetch-dependencies]
command = "echo fetch-$(basename \"$(pwd)\") >> {log}"

[actions.build]
command = "echo build-{{package}}-$MIX_ENV >> {log}"

[actions.test]
command = "echo test-{{package}} >> {log} && test ! -f FAIL"

[actions.deep-clean]
command = "rm -rf _build deps"

[delegate]
dir = "sibling"
command = "echo delegate >> {log}"
"#,
        root = root.display(),
    );
    Orchestrator::from_config(&config(root, &toml)).unwrap()
}

fn read_log(root: &Path) -> Vec<String> {
    fs::read_to_string(root.join("run.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_shell_run_executes_in_order() {
    let temp = TempDir::new().unwrap();
    let orbit = logging_workspace(temp.path(), &["alpha", "beta"]);

    let report = orbit
        .run::<&str>("test", &[], &ShellRunner::new().with_capture(true))
        .unwrap();

    assert!(report.is_success(), "{:?}", report.error());
    assert_eq!(
        read_log(temp.path()),
        vec![
            "install-hex",
            "fetch-alpha",
            "build-alpha-dev",
            "test-alpha",
            "fetch-beta",
            "build-beta-dev",
            "test-beta",
        ]
    );
}

#[test]
fn test_tool_already_present_is_not_reinstalled() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(".hex-installed"), "").unwrap();
    let orbit = logging_workspace(temp.path(), &["alpha"]);

    orbit
        .run::<&str>("fetch-dependencies", &[], &ShellRunner::new())
        .unwrap();

    assert_eq!(read_log(temp.path()), vec!["fetch-alpha"]);
}

#[test]
fn test_failing_test_reports_captured_reason() {
    let temp = TempDir::new().unwrap();
    let orbit = logging_workspace(temp.path(), &["alpha", "beta"]);
    fs::write(temp.path().join("alpha").join("FAIL"), "").unwrap();

    let report = orbit
        .run::<&str>("test", &[], &ShellRunner::new().with_capture(true))
        .unwrap();

    assert!(!report.is_success());
    assert_eq!(report.failed_target().unwrap().target.to_string(), "test(alpha)");
    assert_eq!(
        labels(report.not_run()),
        vec!["fetch-dependencies(beta)", "build(beta)", "test(beta)"]
    );
    assert_eq!(read_log(temp.path()).last().map(String::as_str), Some("test-alpha"));
}

#[test]
fn test_deep_clean_removes_package_and_shared_dirs() {
    let temp = TempDir::new().unwrap();
    let orbit = logging_workspace(temp.path(), &["alpha"]);
    fs::create_dir_all(temp.path().join("alpha/_build/dev")).unwrap();
    fs::create_dir_all(temp.path().join("alpha/deps/jason")).unwrap();
    fs::create_dir_all(temp.path().join("_build/prod")).unwrap();

    let report = orbit
        .run::<&str>("deep-clean", &[], &ShellRunner::new())
        .unwrap();

    assert!(report.is_success(), "{:?}", report.error());
    assert!(!temp.path().join("alpha/_build").exists());
    assert!(!temp.path().join("alpha/deps").exists());
    assert!(!temp.path().join("_build").exists());
    assert_eq!(read_log(temp.path()), vec!["delegate"]);
}

#[test]
fn test_deep_clean_of_never_built_workspace_succeeds() {
    let temp = TempDir::new().unwrap();
    let orbit = logging_workspace(temp.path(), &["alpha"]);

    let report = orbit
        .run::<&str>("deep-clean", &[], &ShellRunner::new())
        .unwrap();

    assert!(report.is_success(), "{:?}", report.error());
}
