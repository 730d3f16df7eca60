//! CLI response formatting and output.
//!
//! Provides the JSON envelope, plain-text error lines and exit code mapping.

use dockhand::error::Hint;
use dockhand::style::{self, Tone};
use dockhand::{Error, ErrorCode, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<Hint>>,
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            format!(
                "{{\"success\": false, \"error\": {{\"code\": \"internal.json_error\", \"message\": {:?}}}}}",
                e.to_string()
            )
        })
    }
}

impl CliResponse<()> {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(CliError {
                code: err.code.as_str().to_string(),
                message: err.message.clone(),
                details: err.details.clone(),
                hints: if err.hints.is_empty() {
                    None
                } else {
                    Some(err.hints.clone())
                },
            }),
        }
    }
}

fn print_payload(payload: &str) {
    use std::io::{self, Write};

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    // A closed pipe (e.g. `| head`) is not worth failing the run over.
    let _ = writeln!(handle, "{}", payload);
}

pub fn print_json_result<T: Serialize>(result: &Result<(T, i32)>) {
    let payload = match result {
        Ok((data, _)) => CliResponse::success(data).to_json(),
        Err(err) => CliResponse::<()>::from_error(err).to_json(),
    };
    print_payload(&payload);
}

/// Print errors the failing operation did not already report itself.
pub fn print_error_line(err: &Error) {
    if err.code.is_step_failure() {
        return;
    }

    style::step(&err.message, Tone::Failure);
    for hint in &err.hints {
        eprintln!("  hint: {}", hint.message);
    }
}

pub fn exit_code_for_error(err: &Error) -> i32 {
    if let Some(code) = err.command_exit_code() {
        return if code > 0 { code } else { 1 };
    }

    match err.code {
        ErrorCode::ConfigInvalidJson | ErrorCode::ConfigInvalidValue => 2,

        ErrorCode::RequirementsToolMissing
        | ErrorCode::BuildArtifactNotFound
        | ErrorCode::RemoteHostNotConfigured
        | ErrorCode::CommandFailed
        | ErrorCode::InternalIoError => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockhand::error::CommandFailedDetails;

    fn command_failure(exit_code: i32) -> Error {
        Error::command_failed(CommandFailedDetails {
            label: Some("Build with Maven".to_string()),
            command: "mvn clean package -DskipTests".to_string(),
            exit_code,
        })
    }

    #[test]
    fn command_failure_exits_with_child_code() {
        assert_eq!(exit_code_for_error(&command_failure(127)), 127);
    }

    #[test]
    fn signalled_child_exits_with_one() {
        assert_eq!(exit_code_for_error(&command_failure(-1)), 1);
    }

    #[test]
    fn config_errors_exit_with_two() {
        let err = Error::config_invalid_value("env_file", None, "line 1: expected KEY=VALUE");
        assert_eq!(exit_code_for_error(&err), 2);
        assert_eq!(exit_code_for_error(&Error::artifact_not_found("a.jar")), 1);
    }

    #[test]
    fn error_envelope_carries_code_and_details() {
        let err = command_failure(3).at_step("build");
        let json = CliResponse::<()>::from_error(&err).to_json();

        assert!(json.contains("\"success\": false"));
        assert!(json.contains("\"code\": \"command.failed\""));
        assert!(json.contains("\"exitCode\": 3"));
        assert!(json.contains("\"step\": \"build\""));
    }

    #[test]
    fn host_not_configured_envelope_has_hint() {
        let err = Error::remote_host_not_configured("EC2_HOST");
        let json = CliResponse::<()>::from_error(&err).to_json();
        assert!(json.contains("remote.host_not_configured"));
        assert!(json.contains("Export EC2_HOST"));
    }
}
