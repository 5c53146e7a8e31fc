pub mod packages;
pub mod plan;
pub mod run;

use anyhow::{Context, Result};
use orbit_build::Orchestrator;
use orbit_config::{ConfigLoader, CONFIG_FILE_NAME};
use std::path::PathBuf;

/// Flags shared by every subcommand
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Start directory for orbit.toml discovery (defaults to current directory)
    pub root: Option<PathBuf>,
    /// Default build profile override
    pub profile: Option<String>,
    pub json: bool,
    pub verbose: bool,
    pub quiet: bool,
    pub capture: bool,
    pub no_color: bool,
}

/// Load orbit.toml and build the orchestrator from it
pub fn load_orchestrator(options: &GlobalOptions) -> Result<Orchestrator> {
    let start = match &options.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    let mut config = ConfigLoader::new()
        .load_from_directory(&start)
        .with_context(|| format!("Failed to load {} from {}", CONFIG_FILE_NAME, start.display()))?;

    if let Some(profile) = &options.profile {
        config.project.env.default_profile = profile.clone();
    }
    tracing::info!(root = %config.root().display(), "loaded configuration");

    Orchestrator::from_config(&config).context("Invalid workspace configuration")
}
