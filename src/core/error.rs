use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,
    ConfigInvalidValue,

    RequirementsToolMissing,
    BuildArtifactNotFound,
    RemoteHostNotConfigured,
    CommandFailed,

    InternalIoError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::RequirementsToolMissing => "requirements.tool_missing",
            ErrorCode::BuildArtifactNotFound => "build.artifact_not_found",
            ErrorCode::RemoteHostNotConfigured => "remote.host_not_configured",
            ErrorCode::CommandFailed => "command.failed",

            ErrorCode::InternalIoError => "internal.io_error",
        }
    }

    /// Failures an operation already reported on the console when it hit them.
    pub fn is_step_failure(&self) -> bool {
        matches!(
            self,
            ErrorCode::RequirementsToolMissing
                | ErrorCode::BuildArtifactNotFound
                | ErrorCode::RemoteHostNotConfigured
                | ErrorCode::CommandFailed
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolMissingDetails {
    pub tools: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactNotFoundDetails {
    pub path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteHostNotConfiguredDetails {
    pub env_var: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandFailedDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub command: String,
    pub exit_code: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let path = path.into();
        let details = to_details(ConfigInvalidJsonDetails {
            path: path.clone(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidJson,
            format!("Invalid JSON in {}: {}", path, err),
            details,
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let problem = problem.into();
        let details = to_details(ConfigInvalidValueDetails {
            key: key.clone(),
            value,
            problem: problem.clone(),
        });

        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid configuration value for '{}': {}", key, problem),
            details,
        )
    }

    pub fn tool_missing(tools: Vec<String>) -> Self {
        let message = format!("Missing required tools: {}", tools.join(", "));
        Self::new(
            ErrorCode::RequirementsToolMissing,
            message,
            to_details(ToolMissingDetails { tools }),
        )
        .with_hint("Install the missing tools and make sure they are on PATH")
    }

    pub fn artifact_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::BuildArtifactNotFound,
            "ERROR: Build JAR not found!",
            to_details(ArtifactNotFoundDetails { path }),
        )
        .with_hint("Run 'dockhand build' first")
    }

    pub fn remote_host_not_configured(env_var: impl Into<String>) -> Self {
        let env_var = env_var.into();
        Self::new(
            ErrorCode::RemoteHostNotConfigured,
            format!("Remote host not configured: set {}", env_var),
            to_details(RemoteHostNotConfiguredDetails {
                env_var: env_var.clone(),
            }),
        )
        .with_hint(format!("Export {} or add it to your .env file", env_var))
    }

    pub fn command_failed(details: CommandFailedDetails) -> Self {
        let message = format!(
            "Step failed: {}",
            details.label.as_deref().unwrap_or(&details.command)
        );
        Self::new(ErrorCode::CommandFailed, message, to_details(details))
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let error = error.into();
        let message = match &context {
            Some(ctx) => format!("IO error ({}): {}", ctx, error),
            None => format!("IO error: {}", error),
        };
        Self::new(
            ErrorCode::InternalIoError,
            message,
            to_details(InternalIoErrorDetails { error, context }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }

    /// Tag the error with the pipeline step it surfaced from.
    pub fn at_step(mut self, step: &str) -> Self {
        if let Value::Object(map) = &mut self.details {
            map.insert("step".to_string(), Value::String(step.to_string()));
        }
        self
    }

    /// Exit code of the external command behind a `CommandFailed` error.
    pub fn command_exit_code(&self) -> Option<i32> {
        if self.code != ErrorCode::CommandFailed {
            return None;
        }
        self.details
            .get("exitCode")
            .and_then(Value::as_i64)
            .map(|code| code as i32)
    }
}
