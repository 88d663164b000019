//! Steps: one-time environment file bootstrap, then its precondition.
//!
//! The tree sync excludes the env file entirely, so this bootstrap is the
//! only channel by which a working-tree `.env` ever reaches production: it
//! seeds a brand-new destination and otherwise leaves the production copy
//! alone. The precondition after it refuses to start services without one.

use std::path::Path;

use crate::error::{DeployError, DeployResult};
use crate::paths::{DeployPaths, ENV_FILE_NAME};

/// What the bootstrap found.
#[derive(Debug, PartialEq, Eq)]
pub enum EnvBootstrap {
    /// Destination had no env file; the working tree copy was installed.
    Seeded,
    /// Destination already had one. It was not touched.
    AlreadyPresent,
    /// Neither side has one. The precondition check will abort the run.
    Missing,
}

/// Copy `<source>/.env` to the destination only when the destination has
/// none. An existing production env file always wins.
pub async fn bootstrap(source_dir: &Path, paths: &DeployPaths) -> DeployResult<EnvBootstrap> {
    let dest_env = paths.env_file();
    if tokio::fs::try_exists(&dest_env).await.unwrap_or(false) {
        return Ok(EnvBootstrap::AlreadyPresent);
    }

    let source_env = source_dir.join(ENV_FILE_NAME);
    if !tokio::fs::try_exists(&source_env).await.unwrap_or(false) {
        return Ok(EnvBootstrap::Missing);
    }

    tokio::fs::copy(&source_env, &dest_env).await.map_err(|e| {
        DeployError::Precondition(format!(
            "copy {} to {}: {e}",
            source_env.display(),
            dest_env.display()
        ))
    })?;
    Ok(EnvBootstrap::Seeded)
}

/// Fatal when the destination still has no env file after bootstrap.
pub async fn require(paths: &DeployPaths) -> DeployResult<()> {
    let env_file = paths.env_file();
    if tokio::fs::try_exists(&env_file).await.unwrap_or(false) {
        Ok(())
    } else {
        Err(DeployError::Precondition(format!(
            "{} is missing; create it before deploying",
            env_file.display()
        )))
    }
}
