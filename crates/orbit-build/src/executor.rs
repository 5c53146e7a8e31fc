//! Fail-fast, sequential execution of a target graph
use crate::bootstrap::ToolBootstrapper;
use crate::delegate::ExternalDelegate;
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::graph::TargetGraph;
use crate::report::{RunReport, TargetReport, TargetStatus};
use crate::runner::CommandRunner;
use crate::target::{Step, Target, TargetId};
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Runs targets in topological order, one at a time
///
/// The run-once guard lives for the executor's lifetime: a target that
/// succeeded in an earlier [`Executor::run`] call is reported as skipped.
pub struct Executor<'a> {
    runner: &'a dyn CommandRunner,
    bootstrapper: Option<&'a ToolBootstrapper>,
    delegate: Option<&'a ExternalDelegate>,
    completed: RefCell<HashSet<TargetId>>,
}

impl<'a> Executor<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self {
            runner,
            bootstrapper: None,
            delegate: None,
            completed: RefCell::new(HashSet::new()),
        }
    }

    pub fn with_bootstrapper(mut self, bootstrapper: &'a ToolBootstrapper) -> Self {
        self.bootstrapper = Some(bootstrapper);
        self
    }

    pub fn with_delegate(mut self, delegate: Option<&'a ExternalDelegate>) -> Self {
        self.delegate = delegate;
        self
    }

    /// Whether a target already succeeded under this executor
    pub fn has_completed(&self, id: &TargetId) -> bool {
        self.completed.borrow().contains(id)
    }

    /// Execute the graph
    ///
    /// Returns `Err` only when no order exists (a cycle). Target failures
    /// are recorded in the report: the failing target is marked failed, every
    /// later target is left not-run, and [`RunReport::error`] attributes the
    /// abort.
    pub fn run(&self, graph: &TargetGraph) -> OrchestratorResult<RunReport> {
        let order = graph.execution_order()?;
        let action = graph.roots().first().and_then(|id| id.action());
        let mut report = RunReport::new(action);
        let start = Instant::now();

        for target in order {
            if report.error.is_some() {
                report.targets.push(TargetReport {
                    target: target.id.clone(),
                    status: TargetStatus::NotRun,
                    duration: Duration::ZERO,
                });
                continue;
            }

            if self.has_completed(&target.id) {
                tracing::debug!(id = %target.id, "already ran in this invocation");
                report.targets.push(TargetReport {
                    target: target.id.clone(),
                    status: TargetStatus::Skipped,
                    duration: Duration::ZERO,
                });
                continue;
            }

            tracing::info!(id = %target.id, step = %target.describe(), "running");
            let target_start = Instant::now();
            let result = self.execute(target);
            let duration = target_start.elapsed();

            let status = match result {
                Ok(()) => {
                    tracing::info!(id = %target.id, seconds = duration.as_secs_f64(), "done");
                    self.completed.borrow_mut().insert(target.id.clone());
                    TargetStatus::Succeeded
                }
                Err(error) => {
                    tracing::warn!(id = %target.id, %error, "failed, aborting run");
                    let reason = failure_reason(&error);
                    report.error = Some(error);
                    TargetStatus::Failed { reason }
                }
            };

            report.targets.push(TargetReport {
                target: target.id.clone(),
                status,
                duration,
            });
        }

        report.total_time = start.elapsed();
        Ok(report)
    }

    fn execute(&self, target: &Target) -> OrchestratorResult<()> {
        match &target.step {
            Step::Bootstrap => match self.bootstrapper {
                Some(bootstrapper) => bootstrapper
                    .ensure_tools_installed(self.runner)
                    .map(|_| ()),
                None => Ok(()),
            },
            Step::Command(spec) => {
                let outcome = self
                    .runner
                    .run(spec)
                    .map_err(|e| OrchestratorError::target_failed(&target.id, e.to_string()))?;
                if outcome.success() {
                    Ok(())
                } else {
                    Err(OrchestratorError::target_failed(
                        &target.id,
                        outcome.failure_reason(),
                    ))
                }
            }
            Step::RemoveDirs(dirs) => remove_dirs(dirs)
                .map_err(|e| OrchestratorError::target_failed(&target.id, e.to_string())),
            Step::Delegate => match self.delegate {
                Some(delegate) => delegate.invoke_external_deep_clean(self.runner),
                None => Err(OrchestratorError::delegate_failed(
                    target.id.to_string(),
                    "no external delegate configured",
                )),
            },
        }
    }
}

/// Reason recorded on the failed target
fn failure_reason(error: &OrchestratorError) -> String {
    match error {
        OrchestratorError::TargetExecutionFailure { reason, .. }
        | OrchestratorError::DelegateFailure { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}

/// Remove directories; a missing directory is not an error
fn remove_dirs(dirs: &[PathBuf]) -> OrchestratorResult<()> {
    for dir in dirs {
        match std::fs::remove_dir_all(dir) {
            Ok(()) => tracing::debug!(dir = %dir.display(), "removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(OrchestratorError::io(dir, e)),
        }
    }
    Ok(())
}
