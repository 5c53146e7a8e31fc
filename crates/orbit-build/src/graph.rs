//! Target graph and execution order
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::target::{Target, TargetId};
use std::collections::HashMap;

/// Dependency DAG over targets for one invocation
///
/// Targets are stored in insertion order and keyed by [`TargetId`], so each
/// identity appears at most once no matter how many dependents reference it.
#[derive(Debug, Clone, Default)]
pub struct TargetGraph {
    targets: Vec<Target>,
    index: HashMap<TargetId, usize>,
    /// Prerequisite edges per target, in declaration order
    prerequisites: Vec<Vec<usize>>,
    /// Requested targets, in request order
    roots: Vec<usize>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

impl TargetGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a target, or return the existing one with the same id
    pub fn add_target(&mut self, target: Target) -> usize {
        if let Some(&index) = self.index.get(&target.id) {
            return index;
        }
        let index = self.targets.len();
        self.index.insert(target.id.clone(), index);
        self.targets.push(target);
        self.prerequisites.push(Vec::new());
        index
    }

    /// Record that `dependent` must wait for `prerequisite`
    pub fn add_prerequisite(&mut self, dependent: usize, prerequisite: usize) {
        let edges = &mut self.prerequisites[dependent];
        if !edges.contains(&prerequisite) {
            edges.push(prerequisite);
        }
    }

    /// Mark a target as explicitly requested
    pub fn add_root(&mut self, index: usize) {
        if !self.roots.contains(&index) {
            self.roots.push(index);
        }
    }

    /// Index of a target by id
    pub fn index_of(&self, id: &TargetId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Get a target by id
    pub fn get(&self, id: &TargetId) -> Option<&Target> {
        self.index_of(id).map(|i| &self.targets[i])
    }

    pub fn contains(&self, id: &TargetId) -> bool {
        self.index.contains_key(id)
    }

    /// Direct prerequisites of a target
    pub fn prerequisites_of(&self, id: &TargetId) -> Vec<&TargetId> {
        self.index_of(id)
            .map(|i| {
                self.prerequisites[i]
                    .iter()
                    .map(|&p| &self.targets[p].id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All targets in insertion order
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Requested targets, in request order
    pub fn roots(&self) -> Vec<&TargetId> {
        self.roots.iter().map(|&i| &self.targets[i].id).collect()
    }

    /// Get target count
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Check if graph is empty
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Validate the graph
    pub fn validate(&self) -> OrchestratorResult<()> {
        self.execution_order().map(|_| ())
    }

    /// Compute a deterministic topological order
    ///
    /// Depth-first post-order from each root in request order, visiting
    /// prerequisites in declaration order; targets not reachable from any
    /// root follow in insertion order. Prerequisites always precede their
    /// dependents, and one package's chain completes before the next
    /// requested package starts.
    pub fn execution_order(&self) -> OrchestratorResult<Vec<&Target>> {
        let mut marks = vec![Mark::Unvisited; self.targets.len()];
        let mut order = Vec::with_capacity(self.targets.len());
        let mut path = Vec::new();

        let starts = self
            .roots
            .iter()
            .copied()
            .chain(0..self.targets.len());
        for start in starts {
            self.visit(start, &mut marks, &mut path, &mut order)?;
        }

        Ok(order.into_iter().map(|i| &self.targets[i]).collect())
    }

    fn visit(
        &self,
        index: usize,
        marks: &mut [Mark],
        path: &mut Vec<usize>,
        order: &mut Vec<usize>,
    ) -> OrchestratorResult<()> {
        match marks[index] {
            Mark::Done => return Ok(()),
            Mark::InProgress => {
                // Found cycle - extract the cycle from path
                let start = path.iter().position(|&i| i == index).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..]
                    .iter()
                    .map(|&i| self.targets[i].id.to_string())
                    .collect();
                cycle.push(self.targets[index].id.to_string());
                return Err(OrchestratorError::CircularDependency(cycle.join(" -> ")));
            }
            Mark::Unvisited => {}
        }

        marks[index] = Mark::InProgress;
        path.push(index);
        for &prerequisite in &self.prerequisites[index] {
            self.visit(prerequisite, marks, path, order)?;
        }
        path.pop();
        marks[index] = Mark::Done;
        order.push(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::registry::Package;
    use crate::target::Step;

    fn node(action: Action, package: &str) -> Target {
        Target::new(
            TargetId::package(action, Package::new(package)),
            Step::RemoveDirs(Vec::new()),
        )
    }

    fn ids(order: Vec<&Target>) -> Vec<String> {
        order.into_iter().map(|t| t.id.to_string()).collect()
    }

    #[test]
    fn test_empty_graph() {
        let graph = TargetGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
        assert!(graph.execution_order().unwrap().is_empty());
    }

    #[test]
    fn test_add_target_is_memoized() {
        let mut graph = TargetGraph::new();
        let first = graph.add_target(Target::new(TargetId::Bootstrap, Step::Bootstrap));
        let second = graph.add_target(Target::new(TargetId::Bootstrap, Step::Bootstrap));
        assert_eq!(first, second);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_linear_dependency_chain() {
        let mut graph = TargetGraph::new();
        let test = graph.add_target(node(Action::Test, "a"));
        let build = graph.add_target(node(Action::Build, "a"));
        let fetch = graph.add_target(node(Action::FetchDependencies, "a"));
        graph.add_prerequisite(test, build);
        graph.add_prerequisite(build, fetch);
        graph.add_root(test);

        assert_eq!(
            ids(graph.execution_order().unwrap()),
            vec!["fetch-dependencies(a)", "build(a)", "test(a)"]
        );
    }

    #[test]
    fn test_diamond_runs_shared_prerequisite_once() {
        let mut graph = TargetGraph::new();
        let lint = graph.add_target(node(Action::Lint, "a"));
        let test = graph.add_target(node(Action::Test, "a"));
        let build = graph.add_target(node(Action::Build, "a"));
        graph.add_prerequisite(lint, build);
        graph.add_prerequisite(test, build);
        graph.add_root(lint);
        graph.add_root(test);

        assert_eq!(
            ids(graph.execution_order().unwrap()),
            vec!["build(a)", "lint(a)", "test(a)"]
        );
    }

    #[test]
    fn test_roots_drive_order_across_packages() {
        let mut graph = TargetGraph::new();
        let build_b = graph.add_target(node(Action::Build, "b"));
        let build_a = graph.add_target(node(Action::Build, "a"));
        graph.add_root(build_a);
        graph.add_root(build_b);

        assert_eq!(
            ids(graph.execution_order().unwrap()),
            vec!["build(a)", "build(b)"]
        );
    }

    #[test]
    fn test_circular_dependency_detection() {
        let mut graph = TargetGraph::new();
        let a = graph.add_target(node(Action::Build, "a"));
        let b = graph.add_target(node(Action::Test, "a"));
        graph.add_prerequisite(a, b);
        graph.add_prerequisite(b, a);
        graph.add_root(a);

        match graph.validate() {
            Err(OrchestratorError::CircularDependency(msg)) => {
                assert_eq!(msg, "build(a) -> test(a) -> build(a)");
            }
            other => panic!("Expected CircularDependency error, got {:?}", other),
        }
    }

    #[test]
    fn test_prerequisites_of() {
        let mut graph = TargetGraph::new();
        let build = graph.add_target(node(Action::Build, "a"));
        let fetch = graph.add_target(node(Action::FetchDependencies, "a"));
        graph.add_prerequisite(build, fetch);
        graph.add_prerequisite(build, fetch);

        let build_id = TargetId::package(Action::Build, Package::new("a"));
        let prereqs = graph.prerequisites_of(&build_id);
        assert_eq!(prereqs.len(), 1);
        assert_eq!(prereqs[0].to_string(), "fetch-dependencies(a)");
    }
}
