/// Orchestrator error types
use std::path::PathBuf;
use thiserror::Error;

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Unknown action '{action}' (expected one of: {expected})")]
    UnknownAction { action: String, expected: String },

    #[error("Unknown package '{package}' (registry: {registry})")]
    UnknownPackage { package: String, registry: String },

    #[error("Tool bootstrap failed for '{tool}': {reason}")]
    ToolBootstrapFailure { tool: String, reason: String },

    #[error("Target {target} failed: {reason}")]
    TargetExecutionFailure { target: String, reason: String },

    #[error("External delegate '{delegate}' failed: {reason}")]
    DelegateFailure { delegate: String, reason: String },

    #[error("Circular dependency detected: {0}")]
    CircularDependency(String),

    #[error("Failed to spawn `{command}` in {cwd}: {error}")]
    CommandSpawn {
        command: String,
        cwd: PathBuf,
        error: std::io::Error,
    },

    #[error("I/O error at {path}: {error}")]
    IoError {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] orbit_config::ConfigError),
}

impl OrchestratorError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            error,
        }
    }

    /// Create a target execution failure
    pub fn target_failed(target: impl ToString, reason: impl Into<String>) -> Self {
        Self::TargetExecutionFailure {
            target: target.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a tool bootstrap failure
    pub fn bootstrap_failed(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ToolBootstrapFailure {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Create a delegate failure
    pub fn delegate_failed(delegate: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DelegateFailure {
            delegate: delegate.into(),
            reason: reason.into(),
        }
    }
}
