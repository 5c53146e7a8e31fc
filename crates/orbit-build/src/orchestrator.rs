//! Orchestrator: configuration, expansion and execution wired together
use crate::action::Action;
use crate::bootstrap::{ToolBootstrapper, ToolSpec};
use crate::delegate::ExternalDelegate;
use crate::error::OrchestratorResult;
use crate::executor::Executor;
use crate::expander::GraphExpander;
use crate::graph::TargetGraph;
use crate::registry::{Package, PackageRegistry};
use crate::report::RunReport;
use crate::rules::RuleTable;
use crate::runner::CommandRunner;
use orbit_config::Config;
use std::path::{Path, PathBuf};

/// Process-wide, read-only orchestrator state
#[derive(Debug)]
pub struct Orchestrator {
    root: PathBuf,
    registry: PackageRegistry,
    rules: RuleTable,
    bootstrapper: ToolBootstrapper,
    delegate: Option<ExternalDelegate>,
    shared_dirs: Vec<PathBuf>,
}

impl Orchestrator {
    /// Create an orchestrator with no tools, delegate or shared directories
    pub fn new(root: impl Into<PathBuf>, registry: PackageRegistry, rules: RuleTable) -> Self {
        let root = root.into();
        Self {
            bootstrapper: ToolBootstrapper::new(&root, Vec::new()),
            root,
            registry,
            rules,
            delegate: None,
            shared_dirs: Vec::new(),
        }
    }

    /// Build from loaded configuration
    pub fn from_config(config: &Config) -> OrchestratorResult<Self> {
        let project = &config.project;
        let root = config.root().to_path_buf();
        let registry = PackageRegistry::new(
            root.join(&project.workspace.packages_dir),
            project.package_names().iter().cloned(),
        );
        let rules = RuleTable::from_config(&project.env, &project.actions)?;
        let tools = project.tools.iter().map(ToolSpec::from).collect();

        let mut orchestrator = Self::new(&root, registry, rules)
            .with_tools(tools)
            .with_shared_dirs(project.workspace.shared_dirs.clone());
        if let Some(delegate) = &project.delegate {
            orchestrator = orchestrator.with_delegate(ExternalDelegate::from_config(delegate, &root));
        }
        Ok(orchestrator)
    }

    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.bootstrapper = ToolBootstrapper::new(&self.root, tools);
        self
    }

    pub fn with_delegate(mut self, delegate: ExternalDelegate) -> Self {
        self.delegate = Some(delegate);
        self
    }

    pub fn with_shared_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.shared_dirs = dirs;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn registry(&self) -> &PackageRegistry {
        &self.registry
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn bootstrapper(&self) -> &ToolBootstrapper {
        &self.bootstrapper
    }

    pub fn delegate(&self) -> Option<&ExternalDelegate> {
        self.delegate.as_ref()
    }

    /// Validate a request: the action first, then every package
    pub fn resolve_request<S: AsRef<str>>(
        &self,
        action: &str,
        packages: &[S],
    ) -> OrchestratorResult<(Action, Vec<Package>)> {
        let action: Action = action.parse()?;
        let packages = self.registry.select(packages)?;
        Ok((action, packages))
    }

    /// Expand an already-validated request
    pub fn expand(&self, action: Action, packages: &[Package]) -> TargetGraph {
        GraphExpander::new(&self.rules, &self.registry, &self.root)
            .with_shared_dirs(&self.shared_dirs)
            .with_delegate(self.delegate.as_ref().map(ExternalDelegate::name))
            .expand(action, packages)
    }

    /// Validate and expand a request without running it
    pub fn plan<S: AsRef<str>>(
        &self,
        action: &str,
        packages: &[S],
    ) -> OrchestratorResult<TargetGraph> {
        let (action, packages) = self.resolve_request(action, packages)?;
        let graph = self.expand(action, &packages);
        graph.validate()?;
        Ok(graph)
    }

    /// Executor wired to this orchestrator's bootstrapper and delegate
    pub fn executor<'a>(&'a self, runner: &'a dyn CommandRunner) -> Executor<'a> {
        Executor::new(runner)
            .with_bootstrapper(&self.bootstrapper)
            .with_delegate(self.delegate.as_ref())
    }

    /// Validate, expand and execute a request
    ///
    /// `Err` means the request was rejected before anything ran. Execution
    /// failures are reported through [`RunReport::error`].
    pub fn run<S: AsRef<str>>(
        &self,
        action: &str,
        packages: &[S],
        runner: &dyn CommandRunner,
    ) -> OrchestratorResult<RunReport> {
        let graph = self.plan(action, packages)?;
        tracing::info!(action, targets = graph.len(), "expanded target graph");
        self.executor(runner).run(&graph)
    }
}
