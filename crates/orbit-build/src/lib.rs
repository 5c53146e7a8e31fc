//! Orbit build orchestration
//!
//! Expands lifecycle actions over a fixed set of packages and runs them:
//! - Action enumeration and the pattern rule table
//! - Package registry and per-package working directories
//! - Target graph expansion with memoized prerequisites
//! - Fail-fast sequential execution with a run-once guard
//! - Shared tool bootstrap, installed at most once
//! - External delegate invoked by deep-clean

pub mod action;
pub mod bootstrap;
pub mod delegate;
pub mod error;
pub mod executor;
pub mod expander;
pub mod graph;
pub mod orchestrator;
pub mod registry;
pub mod report;
pub mod rules;
pub mod runner;
pub mod target;

// Re-export main types
pub use action::Action;
pub use bootstrap::{BootstrapReport, ToolBootstrapper, ToolSpec};
pub use delegate::ExternalDelegate;
pub use error::{OrchestratorError, OrchestratorResult};
pub use executor::Executor;
pub use expander::GraphExpander;
pub use graph::TargetGraph;
pub use orchestrator::Orchestrator;
pub use registry::{Package, PackageRegistry};
pub use report::{RunReport, TargetReport, TargetStatus};
pub use rules::{EnvOverlay, RuleTable, RuleTemplate};
pub use runner::{CommandOutcome, CommandRunner, ShellRunner};
pub use target::{CommandSpec, Step, Target, TargetId};
