//! Bounded polling.

use std::future::Future;
use std::time::Duration;

use tracing::trace;

/// Run `probe` up to `max_attempts` times, sleeping `interval` between
/// failed attempts. Returns true as soon as a probe succeeds and false once
/// the budget is exhausted. A success on the last attempt still counts; the
/// sleep only happens between attempts.
pub async fn poll_until<F, Fut>(max_attempts: u32, interval: Duration, mut probe: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for attempt in 1..=max_attempts {
        if probe().await {
            trace!(attempt, "probe succeeded");
            return true;
        }
        if attempt < max_attempts {
            tokio::time::sleep(interval).await;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn immediate_success_probes_once() {
        let calls = AtomicU32::new(0);
        let ok = poll_until(5, Duration::from_millis(100), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { true }
        })
        .await;
        assert!(ok);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_mid_budget() {
        let calls = AtomicU32::new(0);
        let ok = poll_until(5, Duration::from_millis(100), || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { n == 3 }
        })
        .await;
        assert!(ok);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_the_budget_and_reports_failure() {
        let calls = AtomicU32::new(0);
        let ok = poll_until(4, Duration::from_millis(100), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { false }
        })
        .await;
        assert!(!ok);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_never_probes() {
        let calls = AtomicU32::new(0);
        let ok = poll_until(0, Duration::from_millis(100), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { true }
        })
        .await;
        assert!(!ok);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn success_on_the_final_attempt_counts() {
        let calls = AtomicU32::new(0);
        let ok = poll_until(3, Duration::from_millis(100), || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { n == 3 }
        })
        .await;
        assert!(ok);
    }
}
