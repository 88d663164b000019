//! Step: verify the API answers over TLS.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use crate::error::{DeployError, DeployResult};
use crate::retry;

/// Poll the health endpoint until it answers 2xx, then perform the gating
/// fetch and return its body.
///
/// The poll result is advisory only: it gives freshly restarted services
/// time to come up, and an exhausted budget still falls through to the
/// fetch below, which is the actual pass/fail gate for the step. The gate
/// covers the full exchange: a 2xx whose body cannot be read still fails.
pub async fn run(
    client: &Client,
    health_url: &str,
    attempts: u32,
    interval: Duration,
) -> DeployResult<String> {
    let ready = retry::poll_until(attempts, interval, || {
        let client = client.clone();
        let url = health_url.to_string();
        async move {
            match client.get(&url).send().await {
                Ok(resp) => resp.status().is_success(),
                Err(_) => false,
            }
        }
    })
    .await;

    if ready {
        debug!("health endpoint answered during polling");
    } else {
        info!("health endpoint never answered during polling, trying a final fetch");
    }

    let resp = client
        .get(health_url)
        .send()
        .await
        .map_err(|e| DeployError::Http(format!("GET {health_url}: {e}")))?;
    let status = resp.status();
    if !status.is_success() {
        // Body is detail only here; the status already failed the step.
        let body = resp.text().await.unwrap_or_default();
        return Err(DeployError::Http(format!(
            "GET {health_url}: HTTP {status}: {}",
            body.trim()
        )));
    }
    resp.text()
        .await
        .map_err(|e| DeployError::Http(format!("GET {health_url}: reading body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::probe_client;
    use httpmock::prelude::*;
    use std::io::{Read, Write};

    const FAST: Duration = Duration::from_millis(10);

    #[tokio::test]
    async fn healthy_endpoint_polls_once_and_fetches_once() {
        let server = MockServer::start_async().await;
        let health = server
            .mock_async(|when, then| {
                when.method(GET).path("/health");
                then.status(200).body("{\"status\":\"ok\"}");
            })
            .await;

        let client = probe_client().unwrap();
        let body = run(&client, &server.url("/health"), 5, FAST).await.unwrap();

        assert_eq!(body, "{\"status\":\"ok\"}");
        // one poll attempt plus the gating fetch
        health.assert_calls_async(2).await;
    }

    #[tokio::test]
    async fn gating_fetch_runs_even_with_a_zero_poll_budget() {
        // The poll is advisory. Whatever it concluded, the fetch below it
        // is issued unconditionally and alone decides the step.
        let server = MockServer::start_async().await;
        let health = server
            .mock_async(|when, then| {
                when.method(GET).path("/health");
                then.status(200).body("{\"status\":\"ok\"}");
            })
            .await;

        let client = probe_client().unwrap();
        let body = run(&client, &server.url("/health"), 0, FAST).await.unwrap();

        assert_eq!(body, "{\"status\":\"ok\"}");
        health.assert_calls_async(1).await;
    }

    #[tokio::test]
    async fn recovers_when_the_endpoint_comes_up_mid_poll() {
        let server = MockServer::start_async().await;
        let failing = server
            .mock_async(|when, then| {
                when.method(GET).path("/health");
                then.status(503).body("warming up");
            })
            .await;

        let client = probe_client().unwrap();
        let url = server.url("/health");
        let handle = tokio::spawn({
            let client = client.clone();
            let url = url.clone();
            async move { run(&client, &url, 50, FAST).await }
        });

        // Let at least one attempt fail, then bring the endpoint up.
        tokio::time::sleep(Duration::from_millis(25)).await;
        failing.delete_async().await;
        let _healthy = server
            .mock_async(|when, then| {
                when.method(GET).path("/health");
                then.status(200).body("{\"status\":\"ok\"}");
            })
            .await;

        let body = handle.await.unwrap().unwrap();
        assert_eq!(body, "{\"status\":\"ok\"}");
    }

    #[tokio::test]
    async fn failing_final_fetch_is_fatal() {
        let server = MockServer::start_async().await;
        let health = server
            .mock_async(|when, then| {
                when.method(GET).path("/health");
                then.status(500).body("broken");
            })
            .await;

        let client = probe_client().unwrap();
        let err = run(&client, &server.url("/health"), 3, FAST)
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::Http(_)), "{err}");
        assert!(err.to_string().contains("500"), "{err}");
        // three poll attempts plus the gating fetch
        health.assert_calls_async(4).await;
    }

    #[tokio::test]
    async fn truncated_body_on_a_healthy_status_is_fatal() {
        // Raw stub: promises 1000 body bytes, delivers two, then closes.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let stub = std::thread::spawn(move || {
            let (mut socket, _) = listener.accept().unwrap();
            let mut req = Vec::new();
            let mut buf = [0u8; 1024];
            while !req.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => req.extend_from_slice(&buf[..n]),
                }
            }
            socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 1000\r\n\r\nok")
                .unwrap();
            socket.shutdown(std::net::Shutdown::Write).unwrap();
            // Drain until the client gives up on the short body.
            while matches!(socket.read(&mut buf), Ok(n) if n > 0) {}
        });

        let client = probe_client().unwrap();
        let err = run(&client, &format!("http://{addr}/health"), 0, FAST)
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::Http(_)), "{err}");
        assert!(err.to_string().contains("reading body"), "{err}");
        stub.join().unwrap();
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_fatal() {
        let client = probe_client().unwrap();
        let err = run(&client, "http://127.0.0.1:1/health", 1, FAST)
            .await
            .unwrap_err();
        assert!(matches!(err, DeployError::Http(_)), "{err}");
    }
}
