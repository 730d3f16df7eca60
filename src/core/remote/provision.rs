use crate::config::RemoteConfig;
use crate::error::Result;
use crate::remote::RemoteExecutor;
use crate::utils::style::{self, Tone};

const COMPOSE_BIN: &str = "/usr/local/bin/docker-compose";

/// Install the container engine and compose on the host, then let the remote
/// user talk to the engine. Each step is its own remote call; the first
/// failure aborts.
pub fn provision(executor: &dyn RemoteExecutor, remote: &RemoteConfig) -> Result<()> {
    style::step("Installing Docker on remote host...", Tone::Progress);

    for (command, label) in provision_steps(remote) {
        executor.exec(&command, &label)?;
    }

    style::step("Docker installed", Tone::Success);
    Ok(())
}

/// Ordered `(command, label)` pairs run by [`provision`].
pub fn provision_steps(remote: &RemoteConfig) -> Vec<(String, String)> {
    vec![
        (
            "sudo yum update -y".to_string(),
            "Update packages".to_string(),
        ),
        (
            "sudo yum install -y docker".to_string(),
            "Install Docker".to_string(),
        ),
        (
            "sudo systemctl enable --now docker".to_string(),
            "Start Docker service".to_string(),
        ),
        (
            format!(
                "sudo curl -L \"{}\" -o {}",
                remote.compose_download_url, COMPOSE_BIN
            ),
            "Download Docker Compose".to_string(),
        ),
        (
            format!("sudo chmod +x {}", COMPOSE_BIN),
            "Make Docker Compose executable".to_string(),
        ),
        (
            format!("sudo usermod -aG docker {}", remote.user),
            format!("Add {} to docker group", remote.user),
        ),
    ]
}
