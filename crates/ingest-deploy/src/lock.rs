//! Deploy lock.
//!
//! One sequencer per destination tree: an exclusive flock on a file keyed by
//! the destination path. A second run against the same tree fails fast
//! instead of interleaving rsync and restarts with the first.

use std::fs::File;
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::fcntl::{Flock, FlockArg};

use crate::error::{DeployError, DeployResult};

fn open_lock_file(path: &Path) -> DeployResult<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            DeployError::Internal(format!("create lock dir {}: {e}", parent.display()))
        })?;
    }
    // Never truncate: the file may be flocked by a live deployment.
    File::options()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(path)
        .map_err(|e| DeployError::Internal(format!("open lock file {}: {e}", path.display())))
}

/// Take the deploy lock without waiting.
///
/// The returned guard holds the lock until dropped. An already-held lock is
/// a precondition failure, not something to queue behind: the tree is being
/// deployed right now and this run should not stack on top of it.
pub async fn try_acquire(path: PathBuf) -> DeployResult<Flock<File>> {
    tokio::task::spawn_blocking(move || {
        let file = open_lock_file(&path)?;
        Flock::lock(file, FlockArg::LockExclusiveNonblock).map_err(|(_, errno)| {
            if errno == Errno::EWOULDBLOCK {
                DeployError::Precondition(format!(
                    "another deployment holds {}",
                    path.display()
                ))
            } else {
                DeployError::Internal(format!("flock {}: {errno}", path.display()))
            }
        })
    })
    .await
    .map_err(|e| DeployError::Internal(format!("lock task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn acquires_a_free_lock() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deploy.lock");
        let _guard = try_acquire(path.clone()).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn held_lock_fails_immediately() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deploy.lock");
        let _guard = try_acquire(path.clone()).await.unwrap();

        let err = try_acquire(path).await.unwrap_err();
        assert!(matches!(err, DeployError::Precondition(_)), "{err}");
    }

    #[tokio::test]
    async fn dropping_the_guard_releases_the_lock() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deploy.lock");
        {
            let _guard = try_acquire(path.clone()).await.unwrap();
        }
        let _reacquired = try_acquire(path).await.unwrap();
    }

    #[tokio::test]
    async fn creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/dir/deploy.lock");
        let _guard = try_acquire(path.clone()).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn unwritable_path_is_an_internal_error() {
        // /dev/null is a file, so the parent directory cannot be created;
        // fails even when running as root.
        let err = try_acquire(PathBuf::from("/dev/null/impossible/deploy.lock"))
            .await
            .unwrap_err();
        assert!(matches!(err, DeployError::Internal(_)), "{err}");
    }
}
