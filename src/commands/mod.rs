use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use serde_json::Value;

use dockhand::env_file::{EnvFile, DEFAULT_ENV_FILE};
use dockhand::requirements::{SystemProbe, ToolProbe};
use dockhand::{defaults, Action, ActionOutcome, Config, DeployContext};
use dockhand::{CommandRunner, RecordingRunner, ShellRunner, StepRecord};

pub type CmdResult<T> = dockhand::Result<(T, i32)>;

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Force rebuild when starting/restarting
    #[arg(long, global = true)]
    pub force: bool,

    /// Print a JSON summary of the run to stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Dotenv file to read remote settings from (skipped when absent)
    #[arg(long, global = true, value_name = "PATH", default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    /// Settings file (defaults to ./dockhand.json when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutput {
    pub action: String,
    pub force: bool,
    #[serde(skip_serializing_if = "is_done")]
    pub outcome: ActionOutcome,
    pub steps: Vec<StepRecord>,
}

fn is_done(outcome: &ActionOutcome) -> bool {
    matches!(outcome, ActionOutcome::Done)
}

/// Build the immutable configuration for this invocation.
pub fn load_config(global: &GlobalArgs) -> dockhand::Result<Config> {
    let defaults = defaults::load_defaults(global.config.as_deref())?;
    let env = EnvFile::load_optional(Path::new(&global.env_file))?;
    Ok(Config::from_sources(defaults, |key| env.lookup(key)))
}

pub fn run(action: Action, global: &GlobalArgs) -> CmdResult<ActionOutput> {
    let config = load_config(global)?;

    let shell = ShellRunner::new().with_secret(config.remote.secret.clone());
    perform_recorded(&config, &shell, &SystemProbe, action, global.force)
}

/// Perform `action`, keeping a record of every command it issued.
///
/// On failure the records travel with the error under `details.steps`.
fn perform_recorded(
    config: &Config,
    runner: &dyn CommandRunner,
    probe: &dyn ToolProbe,
    action: Action,
    force: bool,
) -> CmdResult<ActionOutput> {
    let recorder = RecordingRunner::new(runner);
    let ctx = DeployContext::new(config, &recorder, probe);

    let outcome = dockhand::perform(&ctx, action, force);
    let steps = recorder.into_steps();

    match outcome {
        Ok(outcome) => Ok((
            ActionOutput {
                action: action.to_string(),
                force,
                outcome,
                steps,
            },
            0,
        )),
        Err(err) => Err(attach_steps(err, &steps)),
    }
}

fn attach_steps(mut err: dockhand::Error, steps: &[StepRecord]) -> dockhand::Error {
    if let (Value::Object(map), Ok(steps)) = (&mut err.details, serde_json::to_value(steps)) {
        map.insert("steps".to_string(), steps);
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockhand::defaults::builtin_defaults;
    use dockhand::{CommandStatus, ErrorCode};

    struct FailOn(&'static str);

    impl CommandRunner for FailOn {
        fn run(&self, command: &str, _label: Option<&str>) -> dockhand::Result<CommandStatus> {
            if command.contains(self.0) {
                Ok(CommandStatus::failed(3))
            } else {
                Ok(CommandStatus::ok())
            }
        }
    }

    struct AllTools;

    impl ToolProbe for AllTools {
        fn is_available(&self, _tool: &str) -> bool {
            true
        }
    }

    fn config() -> Config {
        let mut config = Config::from_sources(builtin_defaults(), |_| None);
        config.artifact_path = "does/not/exist/app.jar".into();
        config
    }

    #[test]
    fn successful_action_reports_its_steps() {
        let (output, code) =
            perform_recorded(&config(), &FailOn("never"), &AllTools, Action::Stop, false).unwrap();

        assert_eq!(code, 0);
        assert_eq!(output.action, "stop");
        assert_eq!(output.steps.len(), 1);
        assert_eq!(output.steps[0].command, "docker-compose down");
    }

    #[test]
    fn failed_action_keeps_steps_up_to_the_failure() {
        let err = perform_recorded(&config(), &FailOn("mvn test"), &AllTools, Action::Full, false)
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::CommandFailed);
        assert_eq!(err.details["step"], "test");

        let steps = err.details["steps"].as_array().unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0]["command"], "mvn clean package -DskipTests");
        assert_eq!(steps[1]["command"], "mvn test");
        assert_eq!(steps[1]["success"], false);
        assert_eq!(steps[1]["exitCode"], 3);
    }

    #[test]
    fn failure_before_any_command_has_empty_steps() {
        let err = perform_recorded(&config(), &FailOn("never"), &AllTools, Action::Deploy, false)
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::BuildArtifactNotFound);
        assert_eq!(err.details["steps"], serde_json::json!([]));
    }
}
