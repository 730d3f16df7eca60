//! Everything an operation needs, bundled once per invocation.

use crate::config::Config;
use crate::error::Result;
use crate::requirements::ToolProbe;
use crate::runner::{self, CommandRunner};

/// Borrowed handles to the configuration and the process capabilities.
///
/// Operations take `&DeployContext` instead of reaching for globals, so tests
/// substitute the runner, the tool probe or the whole configuration.
#[derive(Clone, Copy)]
pub struct DeployContext<'a> {
    pub config: &'a Config,
    pub runner: &'a dyn CommandRunner,
    pub probe: &'a dyn ToolProbe,
}

impl<'a> DeployContext<'a> {
    pub fn new(
        config: &'a Config,
        runner: &'a dyn CommandRunner,
        probe: &'a dyn ToolProbe,
    ) -> Self {
        Self {
            config,
            runner,
            probe,
        }
    }

    /// Run one labelled command, failing on non-zero exit.
    pub fn run(&self, command: &str, label: &str) -> Result<()> {
        runner::run_step(self.runner, command, Some(label))
    }

    /// `<compose program> <args>`, e.g. `docker-compose up -d`.
    pub fn compose(&self, args: &str) -> String {
        format!("{} {}", self.config.tools.compose_program, args)
    }
}
