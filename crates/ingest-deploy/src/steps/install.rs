//! Step: install Python dependencies at the destination.

use std::path::Path;

use tracing::info;

use crate::config::DeployConfig;
use crate::error::{DeployError, DeployResult};
use crate::exec;
use crate::paths::DeployPaths;

/// pip argv against the synced requirements manifest. A wheelhouse path
/// makes the install fully offline (`--no-index`).
pub fn pip_args(requirements: &Path, wheelhouse: Option<&Path>) -> Vec<String> {
    let mut args = vec!["install".to_string()];
    if let Some(wheels) = wheelhouse {
        args.push("--no-index".to_string());
        args.push(format!("--find-links={}", wheels.display()));
    }
    args.push("-r".to_string());
    args.push(requirements.display().to_string());
    args
}

pub async fn run(config: &DeployConfig, paths: &DeployPaths) -> DeployResult<()> {
    // The venv pip must exist before anything is handed to it.
    if which::which(&config.pip_bin).is_err() {
        return Err(DeployError::Precondition(format!(
            "pip not found at {}",
            config.pip_bin.display()
        )));
    }

    let wheelhouse = tokio::fs::try_exists(&config.wheels_dir)
        .await
        .unwrap_or(false);
    if wheelhouse {
        info!("installing offline from {}", config.wheels_dir.display());
    } else {
        info!("wheel cache absent, installing from the package index");
    }

    let requirements = paths.requirements();
    let wheels = wheelhouse.then(|| config.wheels_dir.as_path());
    exec::run_streamed(&config.pip_bin, &pip_args(&requirements, wheels)).await?;
    Ok(())
}
