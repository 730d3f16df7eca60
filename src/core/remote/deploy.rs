use crate::error::{Error, Result};
use crate::remote::{provision, RemoteStack};
use crate::utils::shell;
use crate::utils::style::{self, Tone};

/// Provision the host and ship everything needed to build and run the stack.
///
/// Copies happen in a fixed order. Nothing is rolled back on failure: files
/// already copied stay on the host and a re-run overwrites them.
pub fn deploy(stack: &RemoteStack) -> Result<()> {
    let config = stack.context().config;
    let remote = &config.remote;
    let executor = stack.executor();

    if !config.artifact_exists() {
        let err = Error::artifact_not_found(config.artifact_path.display().to_string());
        style::step(&err.message, Tone::Failure);
        return Err(err);
    }

    style::step(
        &format!("Deploying {} to {}", config.app_name, stack.host()),
        Tone::Progress,
    );

    provision(executor, remote)?;

    let app_dir = remote.app_dir.trim_end_matches('/');
    executor.exec(
        &format!("mkdir -p {}", shell::quote_arg(&format!("{}/target", app_dir))),
        "Create remote app directory",
    )?;

    let env_path = shell::quote_arg(&format!("{}/.env", app_dir));
    executor.exec(
        &format!(
            "printf '%s\\n' {} > {} && chmod 600 {}",
            shell::quote_arg(&format!("{}={}", remote.secret_env_name, remote.secret)),
            env_path,
            env_path
        ),
        "Write remote .env",
    )?;

    let files = &remote.files;
    let dir = format!("{}/", app_dir);
    let artifact = config.artifact_path.display().to_string();
    let copies: [(&str, String, bool); 6] = [
        (files.compose_file.as_str(), dir.clone(), false),
        (files.build_recipe.as_str(), dir.clone(), false),
        (files.project_descriptor.as_str(), dir.clone(), false),
        (files.source_dir.as_str(), dir.clone(), true),
        (artifact.as_str(), format!("{}target/", dir), false),
        (files.prod_config.as_str(), dir.clone(), false),
    ];

    for (local, remote_path, recursive) in copies {
        executor.copy(local, &remote_path, recursive, &format!("Copy {}", local))?;
    }

    style::step(
        &format!("Deployed to {}:{}", stack.host(), app_dir),
        Tone::Success,
    );
    Ok(())
}
