//! Copy the built artifact into the local deployment directory.

use std::fs;

use serde::Serialize;

use crate::context::DeployContext;
use crate::error::{Error, Result};
use crate::utils::style::{self, Tone};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PackageResult {
    pub artifact: String,
    pub deployed_to: String,
}

/// Copy the artifact into the deploy directory, creating it when absent.
///
/// Fails with `artifact_not_found` before touching the filesystem when the
/// artifact has not been built.
pub fn deploy_local(ctx: &DeployContext) -> Result<PackageResult> {
    let config = ctx.config;

    if !config.artifact_exists() {
        let err = Error::artifact_not_found(config.artifact_path.display().to_string());
        style::step(&err.message, Tone::Failure);
        return Err(err);
    }

    fs::create_dir_all(&config.deploy_dir).map_err(|e| {
        Error::internal_io(
            e.to_string(),
            Some(format!("create {}", config.deploy_dir.display())),
        )
    })?;

    let target = config.deploy_dir.join(config.artifact_file_name());
    fs::copy(&config.artifact_path, &target).map_err(|e| {
        Error::internal_io(
            e.to_string(),
            Some(format!(
                "copy {} to {}",
                config.artifact_path.display(),
                target.display()
            )),
        )
    })?;

    let deployed_to = target.display().to_string();
    style::step(&format!("Deployed to {}", deployed_to), Tone::Success);

    Ok(PackageResult {
        artifact: config.artifact_path.display().to_string(),
        deployed_to,
    })
}
