//! Step: mirror the working tree into the production directory.

use std::path::Path;

use crate::config::DeployConfig;
use crate::error::{DeployError, DeployResult};
use crate::exec;

/// Entries never copied and, via `--delete`, never removed from the
/// destination either. The env file is here so the mirror cannot clobber
/// production credentials; it moves only through the one-time bootstrap.
const EXCLUDES: [&str; 9] = [
    ".git",
    "__pycache__",
    "*.pyc",
    ".idea",
    ".vscode",
    "*.swp",
    "venv",
    ".venv",
    ".env",
];

/// rsync argv: archive mode, mirror deletions, fixed exclusion set.
///
/// The source gets a trailing slash so its contents land directly inside the
/// destination instead of under a subdirectory named after the source.
pub fn rsync_args(source: &Path, dest: &Path) -> Vec<String> {
    let mut args = vec!["-a".to_string(), "--delete".to_string()];
    for pattern in EXCLUDES {
        args.push(format!("--exclude={pattern}"));
    }
    args.push(format!("{}/", source.display()));
    args.push(dest.display().to_string());
    args
}

pub async fn run(config: &DeployConfig) -> DeployResult<()> {
    tokio::fs::create_dir_all(&config.dest_dir)
        .await
        .map_err(|e| {
            DeployError::Precondition(format!(
                "create destination {}: {e}",
                config.dest_dir.display()
            ))
        })?;
    let args = rsync_args(&config.source_dir, &config.dest_dir);
    exec::run_streamed(&config.rsync_bin, &args).await?;
    Ok(())
}
