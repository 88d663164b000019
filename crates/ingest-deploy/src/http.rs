//! HTTP client for the deployment probes.
//!
//! The local API terminates TLS with a self-signed certificate, so the
//! client accepts any certificate. The ring crypto provider is installed
//! once before the first client is built.

use std::sync::Once;
use std::time::Duration;

use crate::constants::{HTTP_CONNECT_TIMEOUT_SECS, HTTP_TIMEOUT_SECS};
use crate::error::{DeployError, DeployResult};

static CRYPTO_INIT: Once = Once::new();

fn ensure_crypto_provider() {
    CRYPTO_INIT.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Build the probe client: certificate verification off, bounded timeouts.
pub fn probe_client() -> DeployResult<reqwest::Client> {
    ensure_crypto_provider();
    reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .map_err(|e| DeployError::Http(format!("build client: {e}")))
}
