//! Single remote host lifecycle over `ssh`/`scp`.
//!
//! Every entry point validates that a host is configured before issuing any
//! remote call; see [`RemoteStack::connect`].

pub mod deploy;
pub mod provision;
pub mod ssh;

use crate::config::Config;
use crate::context::DeployContext;
use crate::error::Result;
use crate::lifecycle::StackTarget;
use crate::utils::shell;
use crate::utils::style::{self, Tone};

pub use deploy::deploy;
pub use provision::provision;
pub use ssh::{SshExecutor, SshTarget};

/// Run commands on, and copy files to, the remote host.
pub trait RemoteExecutor {
    fn exec(&self, command: &str, label: &str) -> Result<()>;

    fn copy(&self, local: &str, remote: &str, recursive: bool, label: &str) -> Result<()>;
}

/// The compose stack inside the remote application directory.
pub struct RemoteStack<'a> {
    ctx: DeployContext<'a>,
    executor: SshExecutor<'a>,
}

impl<'a> RemoteStack<'a> {
    /// Fails with `remote_host_not_configured` before any remote call.
    pub fn connect(ctx: DeployContext<'a>) -> Result<Self> {
        let config: &'a Config = ctx.config;
        let target = SshTarget::from_config(&config.remote).inspect_err(|err| {
            style::step(&err.message, Tone::Failure);
        })?;
        Ok(Self {
            ctx,
            executor: SshExecutor::new(ctx.runner, target),
        })
    }

    pub fn context(&self) -> &DeployContext<'a> {
        &self.ctx
    }

    pub fn executor(&self) -> &dyn RemoteExecutor {
        &self.executor
    }

    pub fn host(&self) -> &str {
        self.executor.target().host
    }

    /// `cd <app dir> && <command>`
    fn in_app_dir(&self, command: &str) -> String {
        format!(
            "cd {} && {}",
            shell::quote_arg(&self.ctx.config.remote.app_dir),
            command
        )
    }

    /// Container states, then the last log lines.
    ///
    /// Both calls are fail-fast: the log tail is skipped when listing fails.
    pub fn status(&self) -> Result<()> {
        let ctx = &self.ctx;
        self.executor
            .exec(&self.in_app_dir(&ctx.compose("ps")), "Container status")?;
        self.executor.exec(
            &self.in_app_dir(&ctx.compose(&format!(
                "logs --tail={}",
                ctx.config.remote.log_tail_lines
            ))),
            "Recent logs",
        )
    }

    /// Stream logs until the remote process exits or is interrupted.
    pub fn follow_logs(&self) -> Result<()> {
        self.executor
            .exec(&self.in_app_dir(&self.ctx.compose("logs -f")), "Follow logs")
    }
}

impl StackTarget for RemoteStack<'_> {
    /// Exports the secret into the remote shell before `up`. `force` has no
    /// remote meaning: images are always rebuilt from the copied sources.
    fn start(&self, _force: bool) -> Result<()> {
        let remote = &self.ctx.config.remote;
        let export = format!(
            "export {}={}",
            remote.secret_env_name,
            shell::quote_arg(&remote.secret)
        );
        let command = self.in_app_dir(&format!(
            "{} && {}",
            export,
            self.ctx.compose("up -d --build")
        ));

        self.executor.exec(&command, "Start remote Docker Compose")?;
        style::step(
            &format!("Application started on {}", self.host()),
            Tone::Success,
        );
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        self.executor.exec(
            &self.in_app_dir(&self.ctx.compose("down")),
            "Stop remote Docker Compose",
        )
    }
}
