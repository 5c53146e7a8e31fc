//! Action commands - expand and execute one action over packages

use super::{load_orchestrator, GlobalOptions};
use crate::reporter::RunReporter;
use anyhow::{Context, Result};
use orbit_build::{Action, RunReport, ShellRunner};

/// Run `action` over `packages` (all packages when empty)
pub fn run(options: &GlobalOptions, action: Action, packages: &[String]) -> Result<()> {
    let orchestrator = load_orchestrator(options)?;

    // Child output would corrupt JSON on stdout
    let runner = ShellRunner::new().with_capture(options.capture || options.json);

    let mut report = orchestrator
        .run(action.name(), packages, &runner)
        .with_context(|| format!("Cannot run {}", action))?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&json_report(&report))?);
    } else if !options.quiet || !report.is_success() {
        RunReporter::new(options.verbose)
            .with_no_color(options.no_color)
            .report(&report);
    }

    match report.error.take() {
        Some(error) => Err(anyhow::Error::new(error).context(format!("{} failed", action))),
        None if !report.is_success() => anyhow::bail!("{} failed", action),
        None => Ok(()),
    }
}

fn json_report(report: &RunReport) -> serde_json::Value {
    serde_json::json!({
        "success": report.is_success(),
        "action": report.action,
        "failed": report.failed_target().map(|t| t.target.to_string()),
        "error": report.error().map(|e| e.to_string()),
        "seconds": report.total_time.as_secs_f64(),
        "targets": report.targets,
    })
}
