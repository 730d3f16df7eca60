//! Immutable run configuration.
//!
//! Built once at startup from [`Defaults`] plus environment lookups and then
//! passed by reference into every operation.

use std::path::PathBuf;

use crate::defaults::{Defaults, RemoteFiles, ToolsConfig};

pub const ENV_REMOTE_HOST: &str = "EC2_HOST";
pub const ENV_REMOTE_USER: &str = "EC2_USER";
pub const ENV_REMOTE_APP_DIR: &str = "EC2_APP_DIR";
pub const ENV_REMOTE_KEY_PATH: &str = "EC2_KEY_PATH";

#[derive(Debug, Clone)]
pub struct Config {
    pub app_name: String,
    pub artifact_path: PathBuf,
    pub deploy_dir: PathBuf,
    pub image_name: String,
    pub local_url: String,
    pub tools: ToolsConfig,
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// `None` when no host was configured; remote operations refuse to run.
    pub host: Option<String>,
    pub user: String,
    pub app_dir: String,
    pub key_path: String,
    pub secret_env_name: String,
    pub secret: String,
    pub log_tail_lines: u32,
    pub compose_download_url: String,
    pub files: RemoteFiles,
}

impl Config {
    /// Build the configuration from defaults and an environment lookup.
    ///
    /// Empty environment values count as unset.
    pub fn from_sources<F>(defaults: Defaults, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let remote_defaults = defaults.remote;
        let key_path = var(ENV_REMOTE_KEY_PATH).unwrap_or(remote_defaults.key_path);
        let secret = var(&remote_defaults.secret_env_name).unwrap_or_default();

        Self {
            artifact_path: PathBuf::from(defaults.app.artifact_path()),
            image_name: defaults.app.image_name(),
            app_name: defaults.app.name,
            deploy_dir: PathBuf::from(defaults.app.deploy_dir),
            local_url: defaults.app.local_url,
            tools: defaults.tools,
            remote: RemoteConfig {
                host: var(ENV_REMOTE_HOST),
                user: var(ENV_REMOTE_USER).unwrap_or(remote_defaults.user),
                app_dir: var(ENV_REMOTE_APP_DIR).unwrap_or(remote_defaults.app_dir),
                key_path: shellexpand::tilde(&key_path).to_string(),
                secret_env_name: remote_defaults.secret_env_name,
                secret,
                log_tail_lines: remote_defaults.log_tail_lines,
                compose_download_url: remote_defaults.compose_download_url,
                files: remote_defaults.files,
            },
        }
    }

    pub fn artifact_exists(&self) -> bool {
        self.artifact_path.is_file()
    }

    /// File name of the build artifact (e.g. `app-0.0.1.jar`).
    pub fn artifact_file_name(&self) -> String {
        self.artifact_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.artifact_path.display().to_string())
    }
}
