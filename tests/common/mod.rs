#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use dockhand::defaults::builtin_defaults;
use dockhand::requirements::ToolProbe;
use dockhand::{CommandRunner, CommandStatus, Config};

/// Records every command and fails the first one containing `fail_on`.
#[derive(Default)]
pub struct FakeRunner {
    pub calls: RefCell<Vec<String>>,
    fail_on: Option<(&'static str, i32)>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(needle: &'static str, exit_code: i32) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_on: Some((needle, exit_code)),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, command: &str, _label: Option<&str>) -> dockhand::Result<CommandStatus> {
        self.calls.borrow_mut().push(command.to_string());
        match self.fail_on {
            Some((needle, code)) if command.contains(needle) => Ok(CommandStatus::failed(code)),
            _ => Ok(CommandStatus::ok()),
        }
    }
}

pub struct Tools(pub Vec<&'static str>);

impl Tools {
    pub fn all() -> Self {
        Tools(vec!["docker", "docker-compose", "mvn", "aws"])
    }
}

impl ToolProbe for Tools {
    fn is_available(&self, tool: &str) -> bool {
        self.0.contains(&tool)
    }
}

/// Config rooted in `dir`, with the artifact built when `with_artifact`.
pub fn config_in(dir: &Path, with_artifact: bool, host: Option<&str>) -> Config {
    let mut vars: HashMap<&str, String> = HashMap::new();
    vars.insert("EC2_KEY_PATH", "/keys/deploy.pem".to_string());
    vars.insert("APP_SECRET", "s3cr3t".to_string());
    if let Some(host) = host {
        vars.insert("EC2_HOST", host.to_string());
    }

    let mut config = Config::from_sources(builtin_defaults(), |key| vars.get(key).cloned());
    config.artifact_path = dir.join("target").join("app.jar");
    config.deploy_dir = dir.join("deployed");

    if with_artifact {
        std::fs::create_dir_all(dir.join("target")).unwrap();
        std::fs::write(&config.artifact_path, b"jar").unwrap();
    }
    config
}
