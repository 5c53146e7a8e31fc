//! Configuration Loader
//!
//! Handles locating orbit.toml and merging environment overrides with proper precedence.

use crate::project::ProjectConfig;
use crate::{ConfigResult, CONFIG_FILE_NAME};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides the default build profile
pub const ENV_PROFILE: &str = "ORBIT_PROFILE";
/// Overrides the build output root template
pub const ENV_BUILD_ROOT: &str = "ORBIT_BUILD_ROOT";

/// Configuration loader
///
/// Loads configuration and merges it with proper precedence:
/// 1. Built-in defaults - lowest priority
/// 2. Workspace config (orbit.toml) - overrides defaults
/// 3. Environment variables (ORBIT_*) - overrides workspace
/// 4. CLI flags - highest priority (handled by caller)
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Skip ORBIT_* environment overrides
    ignore_env: bool,
}

/// Merged configuration result
#[derive(Debug, Clone)]
pub struct Config {
    /// Workspace configuration
    pub project: ProjectConfig,

    /// Orchestrator root directory (where orbit.toml was found)
    pub root: PathBuf,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self { ignore_env: false }
    }

    /// Disable environment variable overrides
    pub fn without_env(mut self) -> Self {
        self.ignore_env = true;
        self
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find orbit.toml. A missing file is an error.
    pub fn load_from_directory(&self, start_dir: &Path) -> ConfigResult<Config> {
        let config_path = Self::find_config_file(start_dir)
            .ok_or_else(|| crate::ConfigError::NotFound(start_dir.join(CONFIG_FILE_NAME)))?;
        self.load_from_file(&config_path)
    }

    /// Load configuration from a specific orbit.toml
    pub fn load_from_file(&self, config_path: &Path) -> ConfigResult<Config> {
        let project = ProjectConfig::load_from_file(config_path)?;
        let project = self.apply_env_overrides(project);

        let parent = match config_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        // Absolute, since package commands run in their own directories
        let root = fs::canonicalize(parent)?;

        Ok(Config { project, root })
    }

    /// Find orbit.toml by walking up the directory tree
    pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return Some(config_path);
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return None,
            }
        }
    }

    /// Apply environment variable overrides to the workspace config
    fn apply_env_overrides(&self, mut config: ProjectConfig) -> ProjectConfig {
        if self.ignore_env {
            return config;
        }

        if let Ok(profile) = env::var(ENV_PROFILE) {
            if !profile.is_empty() {
                config.env.default_profile = profile;
            }
        }

        if let Ok(build_root) = env::var(ENV_BUILD_ROOT) {
            if !build_root.is_empty() {
                config.env.build_root = build_root;
            }
        }

        config
    }
}

impl Config {
    /// Get the orchestrator root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Package names in registry order
    pub fn package_names(&self) -> &[String] {
        self.project.package_names()
    }
}
