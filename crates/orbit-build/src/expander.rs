//! Target graph expansion
//!
//! Instantiates one target per (action, package) pair and wires each to its
//! prerequisites per the rule table. Prerequisite targets and the shared
//! bootstrap target are memoized, so each appears once per graph.

use crate::action::Action;
use crate::graph::TargetGraph;
use crate::registry::{Package, PackageRegistry};
use crate::rules::RuleTable;
use crate::target::{CommandSpec, Step, Target, TargetId};
use std::path::{Path, PathBuf};

/// Expands a requested action over packages into a [`TargetGraph`]
#[derive(Debug, Clone)]
pub struct GraphExpander<'a> {
    rules: &'a RuleTable,
    registry: &'a PackageRegistry,
    root: &'a Path,
    /// Directories removed after every package's deep-clean
    shared_dirs: Vec<PathBuf>,
    /// Name of the external delegate run at the end of deep-clean
    delegate: Option<String>,
}

impl<'a> GraphExpander<'a> {
    pub fn new(rules: &'a RuleTable, registry: &'a PackageRegistry, root: &'a Path) -> Self {
        Self {
            rules,
            registry,
            root,
            shared_dirs: Vec::new(),
            delegate: None,
        }
    }

    /// Shared directories, relative paths resolved against the root
    pub fn with_shared_dirs(mut self, dirs: &[PathBuf]) -> Self {
        self.shared_dirs = dirs.iter().map(|d| self.root.join(d)).collect();
        self
    }

    pub fn with_delegate(mut self, name: Option<&str>) -> Self {
        self.delegate = name.map(str::to_string);
        self
    }

    /// Expand `action` over `packages`, preserving their order
    ///
    /// An empty package list yields an empty graph. Deep-clean additionally
    /// gets the shared-directory removal after all package targets, then the
    /// external delegate after that.
    pub fn expand(&self, action: Action, packages: &[Package]) -> TargetGraph {
        let mut graph = TargetGraph::new();
        if packages.is_empty() {
            return graph;
        }

        let mut requested = Vec::with_capacity(packages.len());
        for package in packages {
            let index = self.resolve(&mut graph, action, package);
            graph.add_root(index);
            requested.push(index);
        }

        if action == Action::DeepClean {
            let cleanup = graph.add_target(Target::new(
                TargetId::SharedCleanup,
                Step::RemoveDirs(self.shared_dirs.clone()),
            ));
            for &index in &requested {
                graph.add_prerequisite(cleanup, index);
            }
            graph.add_root(cleanup);

            if let Some(name) = &self.delegate {
                let delegate =
                    graph.add_target(Target::new(TargetId::Delegate(name.clone()), Step::Delegate));
                graph.add_prerequisite(delegate, cleanup);
                graph.add_root(delegate);
            }
        }

        graph
    }

    /// Resolve (and memoize) the target for `action` on `package`
    fn resolve(&self, graph: &mut TargetGraph, action: Action, package: &Package) -> usize {
        let id = TargetId::package(action, package.clone());
        if let Some(index) = graph.index_of(&id) {
            return index;
        }

        let rule = self.rules.rule_for(action);
        let spec = CommandSpec::new(
            rule.command(package, self.root),
            self.registry.working_dir(package),
        )
        .with_env(rule.environment(package, self.root));
        let index = graph.add_target(Target::new(id, Step::Command(spec)));

        if rule.requires_bootstrap() {
            let bootstrap = graph.add_target(Target::new(TargetId::Bootstrap, Step::Bootstrap));
            graph.add_prerequisite(index, bootstrap);
        }

        if let Some(prerequisite) = rule.prerequisite() {
            let prerequisite = self.resolve(graph, prerequisite, package);
            graph.add_prerequisite(index, prerequisite);
        }

        index
    }
}
