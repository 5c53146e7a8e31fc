//! External delegate invocation
//!
//! A sibling build system outside the package registry, treated as a black
//! box: deep-clean runs its own clean entry point and only looks at the exit
//! status.

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::runner::CommandRunner;
use crate::target::CommandSpec;
use orbit_config::DelegateConfig;
use std::path::{Path, PathBuf};

/// An independently versioned build system invoked during deep-clean
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalDelegate {
    name: String,
    dir: PathBuf,
    command: String,
}

impl ExternalDelegate {
    pub fn new(
        name: impl Into<String>,
        dir: impl Into<PathBuf>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            command: command.into(),
        }
    }

    /// Build from configuration, resolving `dir` against the orchestrator root
    pub fn from_config(config: &DelegateConfig, root: &Path) -> Self {
        Self::new(config.display_name(), root.join(&config.dir), &config.command)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Run the delegate's deep-clean entry point
    pub fn invoke_external_deep_clean(
        &self,
        runner: &dyn CommandRunner,
    ) -> OrchestratorResult<()> {
        tracing::info!(
            delegate = %self.name,
            dir = %self.dir.display(),
            "invoking external deep-clean"
        );

        let outcome = runner
            .run(&CommandSpec::new(&self.command, &self.dir))
            .map_err(|e| OrchestratorError::delegate_failed(&self.name, e.to_string()))?;

        if !outcome.success() {
            return Err(OrchestratorError::delegate_failed(
                &self.name,
                outcome.failure_reason(),
            ));
        }
        Ok(())
    }
}
