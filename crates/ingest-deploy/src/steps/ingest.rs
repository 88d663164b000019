//! Steps: synthetic dry-run and optional smoke ingestion.

use ingest_proto::{DeviceRecord, Envelope};
use reqwest::Client;

use crate::config::DeployConfig;
use crate::constants::{PING_REQUEST_ID, SMOKE_REQUEST_ID};
use crate::epoch::DeployEpoch;
use crate::error::{DeployError, DeployResult};

async fn post_envelope(
    client: &Client,
    url: &str,
    envelope: &Envelope,
) -> DeployResult<String> {
    envelope
        .validate()
        .map_err(|e| DeployError::Config(format!("refusing to send invalid envelope: {e}")))?;

    let resp = client
        .post(url)
        .json(envelope)
        .send()
        .await
        .map_err(|e| DeployError::Http(format!("POST {url}: {e}")))?;
    let status = resp.status();
    if !status.is_success() {
        // Body is detail only here; the status already failed the step.
        let body = resp.text().await.unwrap_or_default();
        return Err(DeployError::Http(format!(
            "POST {url}: HTTP {status}: {}",
            body.trim()
        )));
    }
    resp.text()
        .await
        .map_err(|e| DeployError::Http(format!("POST {url}: reading body: {e}")))
}

/// Zero-item envelope against the dry-run endpoint. Exercises auth,
/// schema validation, and routing without persisting anything.
pub async fn dry_run(
    client: &Client,
    config: &DeployConfig,
    epoch: &DeployEpoch,
) -> DeployResult<String> {
    let envelope = Envelope::ping(epoch.instant(), PING_REQUEST_ID);
    post_envelope(client, &config.test_url, &envelope).await
}

/// One synthetic record through the real ingest path. `token_created_at`
/// reuses the epoch, so it matches `sent_at` textually.
pub async fn smoke(
    client: &Client,
    config: &DeployConfig,
    epoch: &DeployEpoch,
) -> DeployResult<String> {
    let record = DeviceRecord {
        serial_number: config.smoke.serial_number.clone(),
        location: Some(config.smoke.location.clone()),
        protocol_type: config.smoke.protocol_type.clone(),
        token: config.smoke.token.clone(),
        token_created_at: epoch.instant(),
    };
    let envelope = Envelope::single(epoch.instant(), SMOKE_REQUEST_ID, record);
    post_envelope(client, &config.ingest_url, &envelope).await
}
