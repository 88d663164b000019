//! Step: reload systemd and restart the stack.

use std::path::Path;

use tracing::info;

use crate::config::DeployConfig;
use crate::error::DeployResult;
use crate::exec;

async fn systemctl(bin: &Path, args: &[&str]) -> DeployResult<()> {
    exec::run(bin, args).await?;
    Ok(())
}

/// Reload unit definitions, then restart the API before the worker. The
/// order is fixed so restart lines land in the journal in the same order
/// every deploy.
pub async fn run(config: &DeployConfig) -> DeployResult<()> {
    systemctl(&config.systemctl_bin, &["daemon-reload"]).await?;
    info!("unit definitions reloaded");

    for unit in [&config.api_unit, &config.worker_unit] {
        let service = format!("{unit}.service");
        systemctl(&config.systemctl_bin, &["restart", &service]).await?;
        info!(unit = %unit, "restarted");
    }
    Ok(())
}
