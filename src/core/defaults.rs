use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "dockhand.json";

/// Root configuration structure for dockhand.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DockhandConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// All configurable defaults that can be overridden via dockhand.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default = "default_app")]
    pub app: AppConfig,

    #[serde(default = "default_tools")]
    pub tools: ToolsConfig,

    #[serde(default = "default_remote")]
    pub remote: RemoteDefaults,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            app: default_app(),
            tools: default_tools(),
            remote: default_remote(),
        }
    }
}

/// The application being shipped.
///
/// `artifact_path` and `image_name` follow `name` unless set explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_path: Option<String>,
    pub deploy_dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
    pub local_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "patientlookup".to_string(),
            artifact_path: None,
            deploy_dir: "deployed/".to_string(),
            image_name: None,
            local_url: "http://localhost:8080".to_string(),
        }
    }
}

impl AppConfig {
    pub fn artifact_path(&self) -> String {
        self.artifact_path
            .clone()
            .unwrap_or_else(|| format!("target/{}-0.0.1-SNAPSHOT.jar", self.name))
    }

    pub fn image_name(&self) -> String {
        self.image_name
            .clone()
            .unwrap_or_else(|| format!("{}-api", self.name))
    }
}

/// External tool invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub build_command: String,
    pub test_command: String,
    pub compose_program: String,
    pub prune_command: String,
    pub required: Vec<String>,
    pub remote_required: Vec<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            build_command: "mvn clean package -DskipTests".to_string(),
            test_command: "mvn test".to_string(),
            compose_program: "docker-compose".to_string(),
            prune_command: "docker system prune -f".to_string(),
            required: vec![
                "docker".to_string(),
                "docker-compose".to_string(),
                "mvn".to_string(),
            ],
            remote_required: vec!["aws".to_string()],
        }
    }
}

/// Fallbacks for the remote host settings plus the files shipped to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteDefaults {
    pub user: String,
    pub app_dir: String,
    pub key_path: String,
    pub secret_env_name: String,
    pub log_tail_lines: u32,
    pub compose_download_url: String,
    pub files: RemoteFiles,
}

impl Default for RemoteDefaults {
    fn default() -> Self {
        Self {
            user: "ec2-user".to_string(),
            app_dir: "/home/ec2-user/patientlookup".to_string(),
            key_path: "~/.ssh/id_rsa".to_string(),
            secret_env_name: "APP_SECRET".to_string(),
            log_tail_lines: 50,
            compose_download_url: "https://github.com/docker/compose/releases/latest/download/docker-compose-$(uname -s)-$(uname -m)".to_string(),
            files: RemoteFiles::default(),
        }
    }
}

/// Project files copied to the remote application directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteFiles {
    pub compose_file: String,
    pub build_recipe: String,
    pub project_descriptor: String,
    pub source_dir: String,
    pub prod_config: String,
}

impl Default for RemoteFiles {
    fn default() -> Self {
        Self {
            compose_file: "docker-compose.yml".to_string(),
            build_recipe: "Dockerfile".to_string(),
            project_descriptor: "pom.xml".to_string(),
            source_dir: "src".to_string(),
            prod_config: "application-prod.properties".to_string(),
        }
    }
}

fn default_app() -> AppConfig {
    AppConfig::default()
}

fn default_tools() -> ToolsConfig {
    ToolsConfig::default()
}

fn default_remote() -> RemoteDefaults {
    RemoteDefaults::default()
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load defaults, merging file config with built-in defaults.
///
/// An explicit `path` must exist. Without one, `dockhand.json` in the working
/// directory is used when present and built-in defaults otherwise.
pub fn load_defaults(path: Option<&Path>) -> Result<Defaults> {
    match path {
        Some(path) => Ok(load_config_from_file(path)?.defaults),
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.exists() {
                Ok(load_config_from_file(path)?.defaults)
            } else {
                Ok(builtin_defaults())
            }
        }
    }
}

fn load_config_from_file(path: &Path) -> Result<DockhandConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    let config: DockhandConfig = serde_json::from_str(&content)
        .map_err(|e| Error::config_invalid_json(path.display().to_string(), e))?;

    log_status!("config", "Loaded {}", path.display());
    Ok(config)
}

/// Get built-in defaults (ignoring any file config)
pub fn builtin_defaults() -> Defaults {
    Defaults::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tempfile::tempdir;

    #[test]
    fn builtin_artifact_path_follows_app_name() {
        let defaults = builtin_defaults();
        assert_eq!(
            defaults.app.artifact_path(),
            "target/patientlookup-0.0.1-SNAPSHOT.jar"
        );
        assert_eq!(defaults.app.image_name(), "patientlookup-api");
        assert_eq!(defaults.remote.log_tail_lines, 50);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dockhand.json");
        fs::write(
            &path,
            r#"{"defaults": {"tools": {"build_command": "mvn -q package"}, "remote": {"log_tail_lines": 10}}}"#,
        )
        .unwrap();

        let defaults = load_defaults(Some(&path)).unwrap();
        assert_eq!(defaults.tools.build_command, "mvn -q package");
        assert_eq!(defaults.tools.test_command, "mvn test");
        assert_eq!(defaults.remote.log_tail_lines, 10);
        assert_eq!(defaults.remote.user, "ec2-user");
        assert_eq!(defaults.app.name, "patientlookup");
    }

    #[test]
    fn renamed_app_moves_derived_names_along() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dockhand.json");
        fs::write(&path, r#"{"defaults": {"app": {"name": "billing"}}}"#).unwrap();

        let defaults = load_defaults(Some(&path)).unwrap();
        assert_eq!(
            defaults.app.artifact_path(),
            "target/billing-0.0.1-SNAPSHOT.jar"
        );
        assert_eq!(defaults.app.image_name(), "billing-api");
    }

    #[test]
    fn explicit_artifact_path_wins_over_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dockhand.json");
        fs::write(
            &path,
            r#"{"defaults": {"app": {"name": "billing", "artifact_path": "build/libs/app.jar"}}}"#,
        )
        .unwrap();

        let defaults = load_defaults(Some(&path)).unwrap();
        assert_eq!(defaults.app.artifact_path(), "build/libs/app.jar");
        assert_eq!(defaults.app.image_name(), "billing-api");
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dockhand.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_defaults(Some(&path)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalidJson);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = load_defaults(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalIoError);
    }
}
