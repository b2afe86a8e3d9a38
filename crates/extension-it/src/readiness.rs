//! Waiting for the host to finish registering extension handlers.

use crate::client::RestClient;
use crate::error::{HarnessError, HarnessResult};
use crate::request::{Method, Request};
use log::{debug, info};
use std::time::Duration;
use tokio::time::{Instant, sleep};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// Poll `endpoint` every `interval` until it answers 2xx, giving up after `timeout`.
    Probe {
        endpoint: String,
        interval: Duration,
        timeout: Duration,
    },
    FixedDelay(Duration),
}

impl Readiness {
    pub async fn wait(&self, client: &RestClient) -> HarnessResult<()> {
        match self {
            Readiness::FixedDelay(delay) => {
                debug!("Waiting {}ms for extension handlers to settle", delay.as_millis());
                sleep(*delay).await;
                Ok(())
            }
            Readiness::Probe {
                endpoint,
                interval,
                timeout,
            } => poll_until_ready(client, endpoint, *interval, *timeout).await,
        }
    }
}

async fn poll_until_ready(
    client: &RestClient,
    endpoint: &str,
    interval: Duration,
    timeout: Duration,
) -> HarnessResult<()> {
    let started = Instant::now();
    let deadline = started + timeout;
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        let request = Request::new(Method::Get, endpoint);
        let remaining = deadline.saturating_duration_since(Instant::now());
        match tokio::time::timeout(remaining, client.perform_request(&request)).await {
            Ok(Ok(_)) => {
                info!(
                    "Extension ready on {endpoint} after {attempt} attempts ({}ms)",
                    started.elapsed().as_millis()
                );
                return Ok(());
            }
            // Both a non-2xx answer and an unreachable host mean "not yet".
            Ok(Err(e)) => debug!("Readiness probe attempt {attempt} on {endpoint} failed: {e}"),
            Err(_) => debug!(
                "Readiness probe attempt {attempt} on {endpoint} still pending at the deadline"
            ),
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(HarnessError::Timeout {
                context: format!("extension readiness on {endpoint}"),
                waited: now - started,
            });
        }
        sleep(interval.min(deadline - now)).await;
    }
}
