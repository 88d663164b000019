//! Step: best-effort journal tail for both services.

use tracing::{info, warn};

use crate::config::DeployConfig;
use crate::constants::JOURNAL_TAIL_LINES;
use crate::epoch::DeployEpoch;
use crate::exec;

/// journalctl argv for one unit, windowed to the deployment epoch.
pub fn journalctl_args(unit: &str, since: &str, lines: u32) -> Vec<String> {
    vec![
        "--unit".to_string(),
        format!("{unit}.service"),
        "--since".to_string(),
        since.to_string(),
        "--lines".to_string(),
        lines.to_string(),
        "--no-pager".to_string(),
    ]
}

/// Print recent lines for each unit. Every failure here is logged and
/// swallowed: the deploy already succeeded or failed on the earlier steps,
/// and a broken journal must not change that outcome.
pub async fn run(config: &DeployConfig, epoch: &DeployEpoch) {
    let since = epoch.journal_since();
    for unit in [&config.api_unit, &config.worker_unit] {
        info!(unit = %unit, "service log since {since}");
        let args = journalctl_args(unit, &since, JOURNAL_TAIL_LINES);
        if let Err(e) = exec::run_streamed(&config.journalctl_bin, &args).await {
            warn!(unit = %unit, "could not read journal: {e}");
        }
    }
}
