use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use orbit_build::Action;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod reporter;

/// Orbit build orchestrator for multi-package workspaces.
///
/// Orbit expands an action into a graph of per-package targets, installs the
/// shared tools once, and runs every target in dependency order. The first
/// failure stops the run.
///
/// EXAMPLES:
///     orbit build                    Build every package in the workspace
///     orbit test api web             Test two packages, in that order
///     orbit build-release            Build with the release profile
///     orbit deep-clean               Remove all build state, then delegate
///     orbit plan test api            Show what `orbit test api` would run
///     orbit packages                 List the workspace packages
///
/// ENVIRONMENT VARIABLES:
///     ORBIT_JSON        Set to '1' for JSON output by default
///     ORBIT_CAPTURE     Set to '1' to capture command output by default
///     ORBIT_PROFILE     Override the default build profile
///     ORBIT_BUILD_ROOT  Override the shared build root
///     RUST_LOG          Log filter (e.g. 'orbit_build=debug')
///     NO_COLOR          Set to disable colored output
#[derive(Parser)]
#[command(name = "orbit")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory to start searching for orbit.toml from
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Build profile for build, test and lint
    #[arg(long, global = true, value_name = "NAME")]
    profile: Option<String>,

    /// JSON output
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (per-target logging)
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Quiet output (errors only)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Capture command output and include stderr in failure reasons
    #[arg(long, global = true)]
    capture: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch dependencies for packages
    ///
    /// Installs the shared tools first if they are missing.
    ///
    /// EXAMPLES:
    ///     orbit fetch-dependencies         Fetch for every package
    ///     orbit deps api                   Fetch for one package
    #[command(visible_alias = "deps")]
    FetchDependencies {
        /// Packages to act on (default: all, in workspace order)
        packages: Vec<String>,
    },

    /// Build packages with the default profile
    ///
    /// EXAMPLES:
    ///     orbit build                      Build every package
    ///     orbit build api --profile test   Build one package as 'test'
    #[command(visible_alias = "b")]
    Build {
        /// Packages to act on (default: all, in workspace order)
        packages: Vec<String>,
    },

    /// Build packages with the release profile
    ///
    /// EXAMPLES:
    ///     orbit build-release              Release build of every package
    BuildRelease {
        /// Packages to act on (default: all, in workspace order)
        packages: Vec<String>,
    },

    /// Run package test suites
    ///
    /// Builds each package before testing it.
    ///
    /// EXAMPLES:
    ///     orbit test                       Test every package
    ///     orbit test web --capture         Show stderr of a failing suite
    #[command(visible_alias = "t")]
    Test {
        /// Packages to act on (default: all, in workspace order)
        packages: Vec<String>,
    },

    /// Run package linters
    ///
    /// EXAMPLES:
    ///     orbit lint                       Lint every package
    Lint {
        /// Packages to act on (default: all, in workspace order)
        packages: Vec<String>,
    },

    /// Clean package build outputs
    ///
    /// Has no prerequisites, so it works on packages that were never built.
    ///
    /// EXAMPLES:
    ///     orbit clean                      Clean every package
    Clean {
        /// Packages to act on (default: all, in workspace order)
        packages: Vec<String>,
    },

    /// Remove all build state
    ///
    /// Deep-cleans each package, removes the shared directories at the
    /// workspace root, then runs the external delegate's deep-clean.
    ///
    /// EXAMPLES:
    ///     orbit deep-clean                 Deep-clean everything
    ///     orbit deep-clean api             Deep-clean one package
    DeepClean {
        /// Packages to act on (default: all, in workspace order)
        packages: Vec<String>,
    },

    /// Show the targets an action would run, without running them
    ///
    /// EXAMPLES:
    ///     orbit plan build                 Plan a full build
    ///     orbit plan deep-clean --json     Plan as JSON
    #[command(visible_alias = "p")]
    Plan {
        /// Action to plan (e.g. build, test, deep-clean)
        action: String,
        /// Packages to act on (default: all, in workspace order)
        packages: Vec<String>,
    },

    /// List the workspace packages in order
    Packages,

    /// Generate shell completions
    ///
    /// EXAMPLES:
    ///     orbit completions bash > ~/.local/share/bash-completion/completions/orbit
    ///     orbit completions zsh > ~/.zfunc/_orbit
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// The action and package subset for action subcommands
    fn into_action(self) -> Option<(Action, Vec<String>)> {
        match self {
            Self::FetchDependencies { packages } => Some((Action::FetchDependencies, packages)),
            Self::Build { packages } => Some((Action::Build, packages)),
            Self::BuildRelease { packages } => Some((Action::BuildRelease, packages)),
            Self::Test { packages } => Some((Action::Test, packages)),
            Self::Lint { packages } => Some((Action::Lint, packages)),
            Self::Clean { packages } => Some((Action::Clean, packages)),
            Self::DeepClean { packages } => Some((Action::DeepClean, packages)),
            Self::Plan { .. } | Self::Packages | Self::Completions { .. } => None,
        }
    }
}

/// Filter from RUST_LOG when set, otherwise the flag-derived level
fn log_filter(rust_log: Option<&str>, verbose: bool, quiet: bool) -> EnvFilter {
    let default_level = if verbose {
        tracing::Level::INFO
    } else if quiet {
        tracing::Level::ERROR
    } else {
        tracing::Level::WARN
    };

    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::default().add_directive(default_level.into()))
}

fn init_tracing(verbose: bool, quiet: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref(), verbose, quiet))
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cli_config = config::Config::from_env();
    init_tracing(cli.verbose, cli.quiet);

    let options = commands::GlobalOptions {
        root: cli.root,
        profile: cli.profile,
        // Command-line flag overrides environment variable
        json: cli.json || cli_config.default_json,
        verbose: cli.verbose,
        quiet: cli.quiet,
        capture: cli.capture || cli_config.capture,
        no_color: cli_config.no_color,
    };

    match cli.command {
        Commands::Plan { action, packages } => commands::plan::run(&options, &action, &packages)?,
        Commands::Packages => commands::packages::run(&options)?,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
        }
        command => {
            if let Some((action, packages)) = command.into_action() {
                commands::run::run(&options, action, &packages)?;
            }
        }
    }

    Ok(())
}
