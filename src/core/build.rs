//! Build tool and image build invocations.

use crate::context::DeployContext;
use crate::error::Result;

/// Compile and package the application, skipping the build tool's tests.
pub fn build(ctx: &DeployContext) -> Result<()> {
    ctx.run(&ctx.config.tools.build_command, "Build with Maven")
}

/// Run the build tool's test phase. Independent of [`build`].
pub fn test(ctx: &DeployContext) -> Result<()> {
    ctx.run(&ctx.config.tools.test_command, "Run Tests")
}

/// Build the container images declared in the compose file.
pub fn image_build(ctx: &DeployContext) -> Result<()> {
    ctx.run(&ctx.compose("build"), "Docker Compose Build")
}
