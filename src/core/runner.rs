//! Command Runner: run one external command and report whether it succeeded.
//!
//! Every operation in the crate funnels its subprocesses through
//! [`CommandRunner`], so pipelines can be driven by a stub in tests.

use std::cell::RefCell;
use std::process::{Command, Stdio};

use serde::Serialize;

use crate::error::{CommandFailedDetails, Error, Result};
use crate::utils::shell;
use crate::utils::style::{self, Tone};

/// Outcome of one external command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    pub success: bool,
    pub exit_code: i32,
}

impl CommandStatus {
    pub fn ok() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    pub fn failed(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

pub trait CommandRunner {
    /// Run `command` to completion.
    ///
    /// A non-zero exit is reported through the returned status, never as an
    /// error. `Err` is reserved for the environment itself failing (no shell).
    fn run(&self, command: &str, label: Option<&str>) -> Result<CommandStatus>;

    /// Text safe to show to the operator for `command`.
    fn display(&self, command: &str) -> String {
        command.to_string()
    }
}

/// Run a command and turn a non-zero exit into [`ErrorCode::CommandFailed`].
///
/// [`ErrorCode::CommandFailed`]: crate::error::ErrorCode::CommandFailed
pub fn run_step(runner: &dyn CommandRunner, command: &str, label: Option<&str>) -> Result<()> {
    let status = runner.run(command, label)?;
    if status.success {
        return Ok(());
    }

    Err(Error::command_failed(CommandFailedDetails {
        label: label.map(str::to_string),
        command: runner.display(command),
        exit_code: status.exit_code,
    }))
}

/// Runs commands through the system shell with stdio inherited from the
/// caller, so build output and followed logs stream straight to the console.
#[derive(Debug, Default)]
pub struct ShellRunner {
    secrets: Vec<String>,
}

impl ShellRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mask `secret` wherever it appears in echoed commands.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        if !secret.is_empty() {
            self.secrets.push(secret);
        }
        self
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, label: Option<&str>) -> Result<CommandStatus> {
        if let Some(label) = label {
            style::step(&format!("Running: {}", label), Tone::Progress);
        }
        println!("Executing: {}", self.display(command));

        #[cfg(windows)]
        let mut cmd = {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command]);
            cmd
        };

        #[cfg(not(windows))]
        let mut cmd = {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command]);
            cmd
        };

        let status = cmd
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| Error::internal_io(e.to_string(), Some("spawn shell".to_string())))?;

        if status.success() {
            return Ok(CommandStatus::ok());
        }

        let shown = match label {
            Some(label) => label.to_string(),
            None => self.display(command),
        };
        style::step(&format!("Step failed: {}", shown), Tone::Failure);

        // Killed by a signal: no exit code.
        Ok(CommandStatus::failed(status.code().unwrap_or(-1)))
    }

    fn display(&self, command: &str) -> String {
        shell::mask_secrets(command, &self.secrets)
    }
}

/// One command issued during an invocation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub command: String,
    pub success: bool,
    pub exit_code: i32,
}

/// Wraps another runner and remembers every command it was asked to run.
pub struct RecordingRunner<'a> {
    inner: &'a dyn CommandRunner,
    steps: RefCell<Vec<StepRecord>>,
}

impl<'a> RecordingRunner<'a> {
    pub fn new(inner: &'a dyn CommandRunner) -> Self {
        Self {
            inner,
            steps: RefCell::new(Vec::new()),
        }
    }

    pub fn into_steps(self) -> Vec<StepRecord> {
        self.steps.into_inner()
    }
}

impl CommandRunner for RecordingRunner<'_> {
    fn run(&self, command: &str, label: Option<&str>) -> Result<CommandStatus> {
        let status = self.inner.run(command, label)?;
        self.steps.borrow_mut().push(StepRecord {
            label: label.map(str::to_string),
            command: self.inner.display(command),
            success: status.success,
            exit_code: status.exit_code,
        });
        Ok(status)
    }

    fn display(&self, command: &str) -> String {
        self.inner.display(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    struct FixedRunner(CommandStatus);

    impl CommandRunner for FixedRunner {
        fn run(&self, _command: &str, _label: Option<&str>) -> Result<CommandStatus> {
            Ok(self.0)
        }

        fn display(&self, command: &str) -> String {
            command.replace("hunter2", "****")
        }
    }

    #[cfg(not(windows))]
    #[test]
    fn shell_runner_reports_success() {
        let status = ShellRunner::new().run("true", None).unwrap();
        assert_eq!(status, CommandStatus::ok());
    }

    #[cfg(not(windows))]
    #[test]
    fn shell_runner_reports_exit_code_without_error() {
        let status = ShellRunner::new().run("exit 7", Some("Exit seven")).unwrap();
        assert!(!status.success);
        assert_eq!(status.exit_code, 7);
    }

    #[test]
    fn shell_runner_masks_registered_secrets() {
        let runner = ShellRunner::new().with_secret("hunter2").with_secret("");
        assert_eq!(
            runner.display("export APP_SECRET=hunter2"),
            "export APP_SECRET=****"
        );
    }

    #[test]
    fn run_step_maps_failure_to_command_failed() {
        let runner = FixedRunner(CommandStatus::failed(2));
        let err = run_step(&runner, "mvn test", Some("Run Tests")).unwrap_err();
        assert_eq!(err.code, ErrorCode::CommandFailed);
        assert_eq!(err.command_exit_code(), Some(2));
        assert_eq!(err.details["label"], "Run Tests");
    }

    #[test]
    fn run_step_error_uses_masked_command() {
        let runner = FixedRunner(CommandStatus::failed(1));
        let err = run_step(&runner, "echo hunter2", None).unwrap_err();
        assert_eq!(err.message, "Step failed: echo ****");
    }

    #[test]
    fn recording_runner_keeps_order_and_outcome() {
        let inner = FixedRunner(CommandStatus::ok());
        let recorder = RecordingRunner::new(&inner);
        recorder.run("docker-compose down", Some("Stop")).unwrap();
        recorder.run("docker-compose up -d hunter2", None).unwrap();

        let steps = recorder.into_steps();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].label.as_deref(), Some("Stop"));
        assert_eq!(steps[1].command, "docker-compose up -d ****");
        assert!(steps.iter().all(|s| s.success));
    }
}
