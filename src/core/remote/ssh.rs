//! `ssh`/`scp` command formatting for a single key-authenticated host.

use crate::config::{RemoteConfig, ENV_REMOTE_HOST};
use crate::error::{Error, Result};
use crate::remote::RemoteExecutor;
use crate::runner::{self, CommandRunner};
use crate::utils::shell;

/// Where and as whom remote commands run.
#[derive(Debug, Clone, Copy)]
pub struct SshTarget<'a> {
    pub host: &'a str,
    pub user: &'a str,
    pub key_path: &'a str,
}

impl<'a> SshTarget<'a> {
    /// Fails with `remote_host_not_configured` when no host is set.
    pub fn from_config(remote: &'a RemoteConfig) -> Result<Self> {
        let host = remote
            .host
            .as_deref()
            .ok_or_else(|| Error::remote_host_not_configured(ENV_REMOTE_HOST))?;

        Ok(Self {
            host,
            user: &remote.user,
            key_path: &remote.key_path,
        })
    }

    fn options(&self) -> String {
        format!(
            "-i {} -o StrictHostKeyChecking=no",
            shell::quote_arg(self.key_path)
        )
    }

    fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    /// `ssh ... user@host '<command>'`
    pub fn exec_command(&self, command: &str) -> String {
        format!(
            "ssh {} {} {}",
            self.options(),
            self.destination(),
            shell::escape_command_for_shell(command)
        )
    }

    /// `scp ... [-r] <local> user@host:<remote>`
    pub fn copy_command(&self, local: &str, remote: &str, recursive: bool) -> String {
        let recursive = if recursive { " -r" } else { "" };
        format!(
            "scp {}{} {} {}:{}",
            self.options(),
            recursive,
            shell::quote_arg(local),
            self.destination(),
            shell::quote_arg(remote)
        )
    }
}

/// [`RemoteExecutor`] that shells out to `ssh` and `scp` through the runner.
pub struct SshExecutor<'a> {
    runner: &'a dyn CommandRunner,
    target: SshTarget<'a>,
}

impl<'a> SshExecutor<'a> {
    pub fn new(runner: &'a dyn CommandRunner, target: SshTarget<'a>) -> Self {
        Self { runner, target }
    }

    pub fn target(&self) -> &SshTarget<'a> {
        &self.target
    }
}

impl RemoteExecutor for SshExecutor<'_> {
    fn exec(&self, command: &str, label: &str) -> Result<()> {
        runner::run_step(self.runner, &self.target.exec_command(command), Some(label))
    }

    fn copy(&self, local: &str, remote: &str, recursive: bool, label: &str) -> Result<()> {
        log_status!("remote", "Copying {} to {}:{}", local, self.target.host, remote);
        runner::run_step(
            self.runner,
            &self.target.copy_command(local, remote, recursive),
            Some(label),
        )
    }
}
