//! Command execution
//!
//! Every external effect of a run goes through [`CommandRunner`], so the
//! executor, bootstrapper and delegate never spawn processes directly.

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::target::CommandSpec;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of running one command
#[derive(Debug, Clone, Default)]
pub struct CommandOutcome {
    /// Exit code (`None` if terminated by a signal)
    pub exit_code: Option<i32>,
    /// Captured stdout (empty unless capturing)
    pub stdout: String,
    /// Captured stderr (empty unless capturing)
    pub stderr: String,
    /// Wall-clock time
    pub duration: Duration,
}

impl CommandOutcome {
    /// A successful outcome with no output
    pub fn ok() -> Self {
        Self {
            exit_code: Some(0),
            ..Default::default()
        }
    }

    /// A failed outcome with the given exit code
    pub fn exit(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            ..Default::default()
        }
    }

    /// Check if the command succeeded
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Short failure description, including the tail of stderr when captured
    pub fn failure_reason(&self) -> String {
        let status = match self.exit_code {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        };
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            return status;
        }
        let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
        let tail: Vec<&str> = tail.into_iter().rev().collect();
        format!("{}: {}", status, tail.join("\n"))
    }
}

/// Runs shell commands
pub trait CommandRunner {
    fn run(&self, spec: &CommandSpec) -> OrchestratorResult<CommandOutcome>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, spec: &CommandSpec) -> OrchestratorResult<CommandOutcome> {
        (**self).run(spec)
    }
}

/// Runs commands through `sh -c`
///
/// The child inherits the caller's environment with the spec's overlay
/// applied on top.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    /// Capture output instead of streaming it to the terminal
    capture: bool,
}

impl ShellRunner {
    /// Create a runner that streams command output
    pub fn new() -> Self {
        Self { capture: false }
    }

    /// Capture stdout/stderr instead of streaming it
    pub fn with_capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, spec: &CommandSpec) -> OrchestratorResult<CommandOutcome> {
        let start = Instant::now();
        let spawn_error = |error| OrchestratorError::CommandSpawn {
            command: spec.command.clone(),
            cwd: spec.cwd.clone(),
            error,
        };

        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg(&spec.command)
            .current_dir(&spec.cwd)
            .envs(&spec.env)
            .stdin(Stdio::null());

        tracing::debug!(command = %spec.command, cwd = %spec.cwd.display(), "spawning");

        if self.capture {
            let output = command
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn()
                .map_err(spawn_error)?
                .wait_with_output()
                .map_err(spawn_error)?;

            Ok(CommandOutcome {
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                duration: start.elapsed(),
            })
        } else {
            let status = command
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .map_err(spawn_error)?;

            Ok(CommandOutcome {
                exit_code: status.code(),
                duration: start.elapsed(),
                ..Default::default()
            })
        }
    }
}
