//! Filesystem layout derived from the destination directory.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Environment file name, at both the source and the destination root.
pub const ENV_FILE_NAME: &str = ".env";

/// Requirements manifest name at the destination root.
pub const REQUIREMENTS_NAME: &str = "requirements.txt";

/// FHS location for lock files (mode 1777, writable like /tmp).
const LOCK_DIR: &str = "/var/lock";

/// Well-known paths under one production tree.
#[derive(Debug, Clone)]
pub struct DeployPaths {
    dest: PathBuf,
}

impl DeployPaths {
    pub fn new(dest: PathBuf) -> Self {
        Self { dest }
    }

    pub fn env_file(&self) -> PathBuf {
        self.dest.join(ENV_FILE_NAME)
    }

    pub fn requirements(&self) -> PathBuf {
        self.dest.join(REQUIREMENTS_NAME)
    }

    /// Lock file keyed by the destination path, so sequencers aimed at the
    /// same tree exclude each other regardless of where they were started.
    pub fn deploy_lock(&self) -> PathBuf {
        let digest = Sha256::digest(self.dest.as_os_str().as_encoded_bytes());
        Path::new(LOCK_DIR).join(format!("ingest-deploy-{digest:x}.lock"))
    }
}
