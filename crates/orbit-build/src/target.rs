//! Targets: the unit of execution
use crate::action::Action;
use crate::registry::Package;
use crate::rules::EnvOverlay;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

/// Identity of a target within one graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetId {
    /// Shared tool bootstrap, independent of any package
    Bootstrap,
    /// An action applied to one package
    Package { action: Action, package: Package },
    /// Removal of the shared directories at the orchestrator root
    SharedCleanup,
    /// Deep-clean of an external build system
    Delegate(String),
}

impl TargetId {
    pub fn package(action: Action, package: Package) -> Self {
        Self::Package { action, package }
    }

    /// Action of a package target
    pub fn action(&self) -> Option<Action> {
        match self {
            Self::Package { action, .. } => Some(*action),
            _ => None,
        }
    }

    /// Package of a package target
    pub fn package_name(&self) -> Option<&Package> {
        match self {
            Self::Package { package, .. } => Some(package),
            _ => None,
        }
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bootstrap => f.write_str("bootstrap"),
            Self::Package { action, package } => write!(f, "{}({})", action, package),
            Self::SharedCleanup => f.write_str("shared-cleanup"),
            Self::Delegate(name) => write!(f, "delegate({})", name),
        }
    }
}

impl Serialize for TargetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A shell command with its working directory and environment overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Shell command line
    pub command: String,
    /// Working directory
    pub cwd: PathBuf,
    /// Variables applied over the inherited environment
    pub env: EnvOverlay,
}

impl CommandSpec {
    pub fn new(command: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            cwd: cwd.into(),
            env: EnvOverlay::new(),
        }
    }

    pub fn with_env(mut self, env: EnvOverlay) -> Self {
        self.env = env;
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{}={} ", key, value)?;
        }
        write!(f, "{}", self.command)
    }
}

/// What running a target does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Ensure the shared tools are installed
    Bootstrap,
    /// Run a package command
    Command(CommandSpec),
    /// Remove directories; missing ones are ignored
    RemoveDirs(Vec<PathBuf>),
    /// Invoke the external delegate's deep-clean
    Delegate,
}

/// An executable node of the target graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub id: TargetId,
    pub step: Step,
    /// No file artifact to check for staleness; always run when requested
    pub idempotent_non_artifact: bool,
}

impl Target {
    pub fn new(id: TargetId, step: Step) -> Self {
        Self {
            id,
            step,
            idempotent_non_artifact: true,
        }
    }

    /// Human-readable description of the step
    pub fn describe(&self) -> String {
        match &self.step {
            Step::Bootstrap => "ensure shared tools".to_string(),
            Step::Command(spec) => spec.to_string(),
            Step::RemoveDirs(dirs) => format!(
                "remove {}",
                dirs.iter()
                    .map(|d| d.display().to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            ),
            Step::Delegate => "external deep-clean".to_string(),
        }
    }
}
