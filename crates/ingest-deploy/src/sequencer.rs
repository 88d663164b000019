//! The deployment sequence: ordered steps, fail-fast, best-effort tail.

use std::future::Future;
use std::time::Duration;

use tracing::info;

use crate::config::DeployConfig;
use crate::constants::{HEALTH_POLL_ATTEMPTS, HEALTH_POLL_INTERVAL_MS};
use crate::epoch::DeployEpoch;
use crate::error::DeployResult;
use crate::http;
use crate::lock;
use crate::paths::DeployPaths;
use crate::steps;
use crate::steps::envfile::EnvBootstrap;

/// Running step counter for the progress narration.
struct Stepper {
    current: u32,
    total: u32,
}

impl Stepper {
    fn new(total: u32) -> Self {
        Self { current: 0, total }
    }

    fn begin(&mut self, label: &str) {
        self.current += 1;
        info!("▷ [{}/{}] {label}", self.current, self.total);
    }

    /// Announce the step, run it, and label any failure with the step's
    /// purpose so the fatal line names what was being attempted.
    async fn run<T>(
        &mut self,
        label: &str,
        step: impl Future<Output = DeployResult<T>>,
    ) -> DeployResult<T> {
        self.begin(label);
        step.await.map_err(|e| e.at_step(label))
    }
}

/// Run the whole sequence against `config`.
///
/// Every step up to and including the smoke request aborts the run on
/// failure; only the final journal tail is best-effort. The deploy lock is
/// held for the duration of the run.
pub async fn run(config: &DeployConfig) -> DeployResult<()> {
    let epoch = DeployEpoch::now();
    let paths = DeployPaths::new(config.dest_dir.clone());

    info!(
        "▶ deploying {} to {}",
        config.source_dir.display(),
        config.dest_dir.display()
    );
    info!("deployment epoch {}", epoch.iso8601());

    let _lock = lock::try_acquire(paths.deploy_lock()).await?;
    let client = http::probe_client()?;

    let total = if config.smoke_enabled { 9 } else { 8 };
    let mut step = Stepper::new(total);

    step.run("sync working tree", steps::sync::run(config))
        .await?;

    let outcome = step
        .run(
            "bootstrap environment file",
            steps::envfile::bootstrap(&config.source_dir, &paths),
        )
        .await?;
    match outcome {
        EnvBootstrap::Seeded => {
            info!("seeded {} from the working tree", paths.env_file().display());
        }
        EnvBootstrap::AlreadyPresent => info!("existing environment file left untouched"),
        EnvBootstrap::Missing => {}
    }

    step.run("check environment file", steps::envfile::require(&paths))
        .await?;

    step.run("install dependencies", steps::install::run(config, &paths))
        .await?;

    step.run("reload and restart services", steps::services::run(config))
        .await?;

    let body = step
        .run(
            "verify health endpoint",
            steps::health::run(
                &client,
                &config.health_url,
                HEALTH_POLL_ATTEMPTS,
                Duration::from_millis(HEALTH_POLL_INTERVAL_MS),
            ),
        )
        .await?;
    println!("{body}");

    let response = step
        .run(
            "dry-run ingest request",
            steps::ingest::dry_run(&client, config, &epoch),
        )
        .await?;
    info!("dry-run response: {}", response.trim());

    if config.smoke_enabled {
        let response = step
            .run(
                "smoke ingest request",
                steps::ingest::smoke(&client, config, &epoch),
            )
            .await?;
        info!("smoke response: {}", response.trim());
    }

    step.begin("tail service logs");
    steps::logs::run(config, &epoch).await;

    info!("✓ deployment complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeployError;

    #[test]
    fn stepper_counts_from_one() {
        let mut step = Stepper::new(8);
        step.begin("first");
        assert_eq!(step.current, 1);
        step.begin("second");
        assert_eq!(step.current, 2);
    }

    #[tokio::test]
    async fn stepper_labels_errors_with_the_step() {
        let mut step = Stepper::new(1);
        let err = step
            .run("doomed step", async {
                Err::<(), _>(DeployError::Http("boom".to_string()))
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "doomed step: http: boom");
    }

    #[tokio::test]
    async fn stepper_passes_successful_values_through() {
        let mut step = Stepper::new(1);
        let value = step.run("counting", async { Ok(41 + 1) }).await.unwrap();
        assert_eq!(value, 42);
    }
}
