//! Orbit Configuration System
//!
//! Provides configuration management for orbit workspaces:
//! - Workspace configuration (orbit.toml)
//! - Package registry, environment overlay settings, shared tools
//! - External delegate for deep-clean
//! - Configuration precedence and merging
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded and merged in the following order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Workspace config (./orbit.toml, found by walking up)
//! 3. Environment variables (ORBIT_*)
//! 4. CLI flags
//!
//! # Example
//!
//! ```no_run
//! use orbit_config::ConfigLoader;
//! use std::path::Path;
//!
//! let loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! ```

pub mod loader;
pub mod project;

use std::path::PathBuf;
use thiserror::Error;

/// Name of the workspace configuration file
pub const CONFIG_FILE_NAME: &str = "orbit.toml";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Duplicate package '{0}' in workspace.packages")]
    DuplicatePackage(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use loader::{Config, ConfigLoader};
pub use project::{
    ActionConfig, DelegateConfig, EnvConfig, ProjectConfig, ToolConfig, WorkspaceConfig,
};
