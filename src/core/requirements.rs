//! Requirement check: are the external tools on PATH?

use crate::context::DeployContext;
use crate::error::{Error, Result};
use crate::utils::style::{self, Tone};

/// Resolves executables by name.
pub trait ToolProbe {
    fn is_available(&self, tool: &str) -> bool;
}

/// Looks tools up on the real `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProbe;

impl ToolProbe for SystemProbe {
    fn is_available(&self, tool: &str) -> bool {
        which::which(tool).is_ok()
    }
}

/// Which requirement set to verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementScope {
    Local,
    /// Local tools plus the cloud CLI used by the remote pipeline.
    Remote,
}

/// Names from `tools` that `probe` cannot resolve, in input order.
pub fn missing_tools(probe: &dyn ToolProbe, tools: &[String]) -> Vec<String> {
    tools
        .iter()
        .filter(|tool| !probe.is_available(tool))
        .cloned()
        .collect()
}

pub fn check(ctx: &DeployContext, scope: RequirementScope) -> Result<()> {
    style::step("Checking requirements...", Tone::Progress);

    let mut tools = ctx.config.tools.required.clone();
    if scope == RequirementScope::Remote {
        tools.extend(ctx.config.tools.remote_required.iter().cloned());
    }

    let missing = missing_tools(ctx.probe, &tools);
    if !missing.is_empty() {
        let err = Error::tool_missing(missing);
        style::step(&err.message, Tone::Failure);
        return Err(err);
    }

    style::step("All requirements met!", Tone::Success);
    Ok(())
}
