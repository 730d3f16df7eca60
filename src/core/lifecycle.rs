//! Container stack lifecycle shared by the local and remote targets.

use crate::build;
use crate::context::DeployContext;
use crate::error::Result;
use crate::utils::style::{self, Tone};

/// A compose stack that can be brought up and torn down.
pub trait StackTarget {
    fn start(&self, force: bool) -> Result<()>;

    fn stop(&self) -> Result<()>;

    /// Stop, then start. Start is never attempted when stop fails.
    fn restart(&self, force: bool) -> Result<()> {
        self.stop()?;
        self.start(force)
    }
}

/// The compose stack on this machine.
pub struct LocalStack<'a> {
    ctx: DeployContext<'a>,
}

impl<'a> LocalStack<'a> {
    pub fn new(ctx: DeployContext<'a>) -> Self {
        Self { ctx }
    }
}

impl StackTarget for LocalStack<'_> {
    /// Rebuild first when forced or when the artifact is missing.
    fn start(&self, force: bool) -> Result<()> {
        let ctx = &self.ctx;

        if force || !ctx.config.artifact_exists() {
            style::step("Building application...", Tone::Progress);
            build::build(ctx)?;
            build::image_build(ctx)?;
        }

        ctx.run(&ctx.compose("up -d"), "Start Docker Compose")?;
        style::step(
            &format!("Application is running at {}", ctx.config.local_url),
            Tone::Success,
        );
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        let ctx = &self.ctx;
        ctx.run(&ctx.compose("down"), "Stop Docker Compose")
    }
}

/// Prune unused container resources without prompting.
pub fn cleanup(ctx: &DeployContext) -> Result<()> {
    style::step("Cleaning up...", Tone::Progress);
    ctx.run(&ctx.config.tools.prune_command, "Clean Docker")
}
