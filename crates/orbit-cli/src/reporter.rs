//! Run reporter - display target results

use colored::*;
use orbit_build::{RunReport, TargetReport, TargetStatus};
use std::fmt::Write;

/// Human-readable run reporter
pub struct RunReporter {
    /// Also list targets skipped by the run-once guard
    verbose: bool,
    /// Disable colored output
    no_color: bool,
}

impl RunReporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            no_color: false,
        }
    }

    /// Disable colored output
    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    /// Print the report to stdout
    pub fn report(&self, report: &RunReport) {
        if self.no_color {
            colored::control::set_override(false);
        }

        print!("{}", self.render(report));

        if self.no_color {
            colored::control::unset_override();
        }
    }

    /// Attempted targets, then a summary line naming the failing target
    pub fn render(&self, report: &RunReport) -> String {
        let mut out = String::new();

        for target in report.attempted() {
            if target.status == TargetStatus::Skipped && !self.verbose {
                continue;
            }
            let _ = writeln!(out, "{}", Self::target_line(target));
        }

        let not_run = report.not_run();
        if !not_run.is_empty() {
            let names: Vec<String> = not_run.iter().map(|id| id.to_string()).collect();
            let _ = writeln!(
                out,
                "  {} {}",
                "not run:".dimmed(),
                names.join(", ").dimmed()
            );
        }

        let _ = writeln!(out, "{}", "─".repeat(50));
        let action = report
            .action
            .map(|a| a.to_string())
            .unwrap_or_else(|| "run".to_string());

        match report.failed_target() {
            Some(failed) => {
                let _ = writeln!(
                    out,
                    "{} {} failed at {}",
                    "FAILED".red().bold(),
                    action,
                    failed.target.to_string().bold()
                );
            }
            None => {
                let executed = report.executed().len();
                let _ = writeln!(
                    out,
                    "{} {} | {} targets run in {:.2?}",
                    "OK".green().bold(),
                    action,
                    executed.to_string().bold(),
                    report.total_time
                );
            }
        }
        out
    }

    fn target_line(target: &TargetReport) -> String {
        match &target.status {
            TargetStatus::Succeeded => format!(
                "  {} {} ({:.2?})",
                "✓".green(),
                target.target,
                target.duration
            ),
            TargetStatus::Skipped => format!("  {} {} (already done)", "-".dimmed(), target.target),
            TargetStatus::Failed { reason } => {
                let mut line = format!("  {} {}", "✗".red().bold(), target.target.to_string().bold());
                for reason_line in reason.lines() {
                    line.push_str(&format!("\n      {}", reason_line.dimmed()));
                }
                line
            }
            TargetStatus::NotRun => format!("  {} {}", "·".dimmed(), target.target),
        }
    }
}
