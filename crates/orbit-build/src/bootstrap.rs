//! Shared tool bootstrap
//!
//! Installs the package-manager and build-tool plugins every
//! fetch-dependencies target relies on. Installation is "if missing": a
//! tool whose check command succeeds is left alone, and once a call has
//! succeeded later calls in the same process do nothing.

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::runner::CommandRunner;
use crate::target::CommandSpec;
use orbit_config::ToolConfig;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// A tool to ensure before fetching dependencies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    pub name: String,
    /// Install command (should tolerate an existing installation)
    pub install: String,
    /// Command whose success means the tool is present
    pub check: Option<String>,
    /// Executable that must resolve on PATH
    pub program: Option<String>,
}

impl From<&ToolConfig> for ToolSpec {
    fn from(config: &ToolConfig) -> Self {
        Self {
            name: config.name.clone(),
            install: config.install.clone(),
            check: config.check.clone(),
            program: config.program.clone(),
        }
    }
}

/// What a bootstrap call did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Tools whose install command ran
    pub installed: Vec<String>,
    /// Tools found already present
    pub present: Vec<String>,
    /// The bootstrap had already completed in this process
    pub already_done: bool,
}

/// Ensures shared tools are installed, at most once per process
#[derive(Debug)]
pub struct ToolBootstrapper {
    tools: Vec<ToolSpec>,
    cwd: PathBuf,
    done: AtomicBool,
}

impl ToolBootstrapper {
    /// Create a bootstrapper running its commands in `cwd`
    pub fn new(cwd: impl Into<PathBuf>, tools: Vec<ToolSpec>) -> Self {
        Self {
            tools,
            cwd: cwd.into(),
            done: AtomicBool::new(false),
        }
    }

    pub fn tools(&self) -> &[ToolSpec] {
        &self.tools
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Whether a previous call succeeded
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Ensure every tool is installed
    pub fn ensure_tools_installed(
        &self,
        runner: &dyn CommandRunner,
    ) -> OrchestratorResult<BootstrapReport> {
        if self.is_done() {
            tracing::debug!("tool bootstrap already completed");
            return Ok(BootstrapReport {
                already_done: true,
                ..Default::default()
            });
        }

        let mut report = BootstrapReport::default();
        for tool in &self.tools {
            if self.ensure_tool(tool, runner)? {
                report.installed.push(tool.name.clone());
            } else {
                report.present.push(tool.name.clone());
            }
        }

        self.done.store(true, Ordering::Release);
        Ok(report)
    }

    /// Returns true if the install command ran
    fn ensure_tool(
        &self,
        tool: &ToolSpec,
        runner: &dyn CommandRunner,
    ) -> OrchestratorResult<bool> {
        if let Some(program) = &tool.program {
            which::which(program).map_err(|e| {
                OrchestratorError::bootstrap_failed(
                    &tool.name,
                    format!("`{}` not found on PATH: {}", program, e),
                )
            })?;
        }

        if let Some(check) = &tool.check {
            let outcome = runner
                .run(&CommandSpec::new(check, &self.cwd))
                .map_err(|e| OrchestratorError::bootstrap_failed(&tool.name, e.to_string()))?;
            if outcome.success() {
                tracing::debug!(tool = %tool.name, "tool already installed");
                return Ok(false);
            }
        }

        tracing::info!(tool = %tool.name, "installing tool");
        let outcome = runner
            .run(&CommandSpec::new(&tool.install, &self.cwd))
            .map_err(|e| OrchestratorError::bootstrap_failed(&tool.name, e.to_string()))?;
        if !outcome.success() {
            return Err(OrchestratorError::bootstrap_failed(
                &tool.name,
                outcome.failure_reason(),
            ));
        }
        Ok(true)
    }
}
