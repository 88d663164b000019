//! Run configuration.
//!
//! Defaults deploy the stack at its standard locations; an optional YAML file
//! overrides individual fields. Recognized keys mirror the field names below
//! (`source_dir`, `dest_dir`, `wheels_dir`, `rsync_bin`, `pip_bin`,
//! `systemctl_bin`, `journalctl_bin`, `api_unit`, `worker_unit`,
//! `health_url`, `test_url`, `ingest_url`, `smoke_enabled`, `smoke`).
//! The config is built once in `main` and passed by shared reference for the
//! rest of the run.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::error::{DeployError, DeployResult};

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeployConfig {
    /// Working tree being released. Defaults to the current directory.
    pub source_dir: PathBuf,
    /// Production directory receiving the mirror.
    pub dest_dir: PathBuf,
    /// Wheel cache consulted before falling back to the package index.
    pub wheels_dir: PathBuf,

    /// rsync binary; a bare name resolves through PATH.
    pub rsync_bin: PathBuf,
    /// pip of the production virtualenv. Must be that venv's pip, not the
    /// system one, so packages land where the services import them.
    pub pip_bin: PathBuf,
    pub systemctl_bin: PathBuf,
    pub journalctl_bin: PathBuf,

    /// systemd unit names without the `.service` suffix.
    pub api_unit: String,
    pub worker_unit: String,

    pub health_url: String,
    /// Dry-run ingest endpoint: validates an envelope without persisting it.
    pub test_url: String,
    /// Real ingest endpoint, used only by the smoke step.
    pub ingest_url: String,

    /// When true, one synthetic record is written through the real ingest
    /// path after the dry run.
    pub smoke_enabled: bool,
    pub smoke: SmokeIdentity,
}

/// Identity of the synthetic record sent by the smoke step.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmokeIdentity {
    pub serial_number: String,
    pub location: String,
    pub protocol_type: String,
    pub token: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            source_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            dest_dir: PathBuf::from("/srv/ingest"),
            wheels_dir: PathBuf::from("/srv/ingest/wheels"),
            rsync_bin: PathBuf::from("rsync"),
            pip_bin: PathBuf::from("/srv/ingest/venv/bin/pip"),
            systemctl_bin: PathBuf::from("systemctl"),
            journalctl_bin: PathBuf::from("journalctl"),
            api_unit: "ingest-api".to_string(),
            worker_unit: "ingest-worker".to_string(),
            health_url: "https://127.0.0.1/health".to_string(),
            test_url: "https://127.0.0.1/v1/ingest/test".to_string(),
            ingest_url: "https://127.0.0.1/v1/ingest".to_string(),
            smoke_enabled: false,
            smoke: SmokeIdentity::default(),
        }
    }
}

impl Default for SmokeIdentity {
    fn default() -> Self {
        Self {
            serial_number: "DEPLOY-SMOKE-0001".to_string(),
            location: "deploy-smoke".to_string(),
            protocol_type: "rps".to_string(),
            token: "smoke-token".to_string(),
        }
    }
}

impl DeployConfig {
    fn validate(&self) -> DeployResult<()> {
        for (field, value) in [
            ("health_url", &self.health_url),
            ("test_url", &self.test_url),
            ("ingest_url", &self.ingest_url),
        ] {
            let url = Url::parse(value)
                .map_err(|e| DeployError::Config(format!("{field} '{value}': {e}")))?;
            if url.scheme() != "https" && url.scheme() != "http" {
                return Err(DeployError::Config(format!(
                    "{field} '{value}': scheme must be http or https"
                )));
            }
        }
        validate_unit("api_unit", &self.api_unit)?;
        validate_unit("worker_unit", &self.worker_unit)?;
        Ok(())
    }
}

fn validate_unit(field: &str, name: &str) -> DeployResult<()> {
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-' || b == b'_');
    if !valid {
        return Err(DeployError::Config(format!(
            "{field} '{name}': unit names may contain only alphanumerics, '.', '-', '_'"
        )));
    }
    // The `.service` suffix is appended where commands are built.
    if name.ends_with(".service") {
        return Err(DeployError::Config(format!(
            "{field} '{name}': give the unit name without the .service suffix"
        )));
    }
    Ok(())
}

/// Load the config: defaults, per-field YAML overrides, then validation.
/// `force_smoke` is the `--smoke` flag and wins over the file.
pub fn load(path: Option<&Path>, force_smoke: bool) -> DeployResult<DeployConfig> {
    let mut config = match path {
        Some(p) => {
            let content = std::fs::read_to_string(p)
                .map_err(|e| DeployError::Config(format!("read {}: {e}", p.display())))?;
            serde_yaml_ng::from_str(&content)
                .map_err(|e| DeployError::Config(format!("parse {}: {e}", p.display())))?
        }
        None => DeployConfig::default(),
    };
    if force_smoke {
        config.smoke_enabled = true;
    }
    config.validate()?;
    Ok(config)
}
