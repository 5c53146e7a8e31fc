//! Shared fixtures for orchestrator tests
#![allow(dead_code)]

use orbit_build::{CommandOutcome, CommandRunner, CommandSpec, Orchestrator, OrchestratorResult};
use orbit_config::{Config, ProjectConfig};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// Records every command and fails the ones it was told to
#[derive(Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<CommandSpec>>,
    failing: Vec<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `command` exit with status 1
    pub fn failing_on(mut self, command: &str) -> Self {
        self.failing.push(command.to_string());
        self
    }

    /// Command lines, in invocation order
    pub fn commands(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.command.clone()).collect()
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, spec: &CommandSpec) -> OrchestratorResult<CommandOutcome> {
        self.calls.borrow_mut().push(spec.clone());
        if self.failing.contains(&spec.command) {
            Ok(CommandOutcome::exit(1))
        } else {
            Ok(CommandOutcome::ok())
        }
    }
}

/// Config whose commands name their action and package
pub fn workspace_toml(packages: &[&str]) -> String {
    let packages = packages
        .iter()
        .map(|p| format!("\"{}\"", p))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"
[workspace]
packages = [{packages}]
packages_dir = "apps"

[[tools]]
name = "hex"
install = "install-hex"

[actions.fetch-dependencies]
command = "fetch {{package}}"

[actions.build]
command = "build {{package}}"

[actions.build-release]
command = "build-release {{package}}"

[actions.test]
command = "test {{package}}"

[actions.lint]
command = "lint {{package}}"

[actions.clean]
command = "clean {{package}}"

[actions.deep-clean]
command = "deep-clean {{package}}"

[delegate]
name = "sibling"
dir = "../sibling"
command = "sibling-deep-clean"
"#
    )
}

pub fn config(root: &Path, toml: &str) -> Config {
    Config {
        project: ProjectConfig::parse(toml).unwrap(),
        root: root.to_path_buf(),
    }
}

pub fn orchestrator(root: &Path, packages: &[&str]) -> Orchestrator {
    Orchestrator::from_config(&config(root, &workspace_toml(packages))).unwrap()
}

/// Orchestrator rooted at a path that is never touched
pub fn detached(packages: &[&str]) -> Orchestrator {
    orchestrator(&PathBuf::from("/nonexistent/orbit-ws"), packages)
}

pub fn labels<T: ToString>(ids: impl IntoIterator<Item = T>) -> Vec<String> {
    ids.into_iter().map(|id| id.to_string()).collect()
}
