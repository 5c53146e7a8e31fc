//! Workspace Configuration (orbit.toml)
//!
//! Handles the configuration stored in `orbit.toml` at the orchestrator root.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Workspace configuration from orbit.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Package registry and directory layout
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Environment overlay settings
    #[serde(default)]
    pub env: EnvConfig,

    /// Shared build tools installed once per run
    #[serde(default = "default_tools")]
    pub tools: Vec<ToolConfig>,

    /// Per-action overrides, keyed by action name (e.g. "build")
    #[serde(default)]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub actions: BTreeMap<String, ActionConfig>,

    /// External build system cleaned during deep-clean
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegate: Option<DelegateConfig>,
}

/// Package registry and directory layout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceConfig {
    /// Ordered package names
    #[serde(default)]
    pub packages: Vec<String>,

    /// Directory holding one subdirectory per package (default: ".")
    #[serde(default = "default_packages_dir")]
    pub packages_dir: PathBuf,

    /// Shared directories at the root removed by deep-clean
    #[serde(default = "default_shared_dirs")]
    pub shared_dirs: Vec<PathBuf>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            packages: Vec::new(),
            packages_dir: default_packages_dir(),
            shared_dirs: default_shared_dirs(),
        }
    }
}

/// Environment overlay settings for build, build-release, test and lint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EnvConfig {
    /// Variable selecting the build profile
    #[serde(default = "default_profile_var")]
    pub profile_var: String,

    /// Profile used by every action except build-release
    #[serde(default = "default_profile")]
    pub default_profile: String,

    /// Profile used by build-release
    #[serde(default = "default_release_profile")]
    pub release_profile: String,

    /// Variable overriding the build output root
    #[serde(default = "default_build_root_var")]
    pub build_root_var: String,

    /// Build output root template (`{root}` and `{package}` are substituted)
    #[serde(default = "default_build_root")]
    pub build_root: String,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            profile_var: default_profile_var(),
            default_profile: default_profile(),
            release_profile: default_release_profile(),
            build_root_var: default_build_root_var(),
            build_root: default_build_root(),
        }
    }
}

/// A shared build tool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    /// Tool name, used in diagnostics
    pub name: String,

    /// Install command; expected to be a no-op when the tool is present
    pub install: String,

    /// Command whose success means the tool is already installed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<String>,

    /// Executable that must be on PATH before installing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
}

impl ToolConfig {
    pub fn new(name: impl Into<String>, install: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            install: install.into(),
            check: None,
            program: None,
        }
    }
}

/// Override for a single action's rule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ActionConfig {
    /// Replacement command template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Extra environment entries, applied over the standard overlay
    #[serde(default)]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

/// External build system invoked by deep-clean
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DelegateConfig {
    /// Display name (default: the directory's file name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Root of the external build system, relative to the orchestrator root
    pub dir: PathBuf,

    /// Deep-clean entry point, run with no arguments
    #[serde(default = "default_delegate_command")]
    pub command: String,
}

impl DelegateConfig {
    /// Effective display name
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| self.dir.display().to_string())
        })
    }
}

fn default_packages_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_shared_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("_build"), PathBuf::from("deps")]
}

fn default_profile_var() -> String {
    "MIX_ENV".to_string()
}

fn default_profile() -> String {
    "dev".to_string()
}

fn default_release_profile() -> String {
    "prod".to_string()
}

fn default_build_root_var() -> String {
    "MIX_BUILD_ROOT".to_string()
}

fn default_build_root() -> String {
    "{root}/_build".to_string()
}

fn default_delegate_command() -> String {
    "make deep_clean".to_string()
}

fn default_tools() -> Vec<ToolConfig> {
    vec![
        ToolConfig::new("hex", "mix local.hex --force --if-missing"),
        ToolConfig::new("rebar", "mix local.rebar --force --if-missing"),
    ]
}

impl ProjectConfig {
    /// Load workspace configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config = Self::parse(&content).map_err(|e| match e {
            ConfigError::TomlParseError { error, .. } => ConfigError::TomlParseError {
                file: path.to_path_buf(),
                error,
            },
            other => other,
        })?;
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
            file: PathBuf::from(crate::CONFIG_FILE_NAME),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the workspace configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let mut seen = HashSet::new();
        for name in &self.workspace.packages {
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "workspace.packages".to_string(),
                    reason: "package name cannot be empty".to_string(),
                });
            }
            if name.contains('/') || name.contains('\\') {
                return Err(ConfigError::InvalidValue {
                    field: "workspace.packages".to_string(),
                    reason: format!("package name '{}' must not contain path separators", name),
                });
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicatePackage(name.clone()));
            }
        }

        for tool in &self.tools {
            if tool.name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "tools.name".to_string(),
                    reason: "tool name cannot be empty".to_string(),
                });
            }
            if tool.install.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("tools.{}.install", tool.name),
                    reason: "install command cannot be empty".to_string(),
                });
            }
        }

        if self.env.profile_var.is_empty() || self.env.build_root_var.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "env".to_string(),
                reason: "variable names cannot be empty".to_string(),
            });
        }

        if let Some(delegate) = &self.delegate {
            if delegate.command.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "delegate.command".to_string(),
                    reason: "command cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Package names in registry order
    pub fn package_names(&self) -> &[String] {
        &self.workspace.packages
    }
}
