//! Backoff for idempotent platform reads and single-record writes.
//!
//! Only connection failures and timeouts are retried. Any other transport
//! error, and every response the server actually sent, goes straight back
//! to the caller. Creates never come through here: a create that timed out
//! after the server committed the row must not be replayed.

use std::future::Future;
use std::time::Duration;

use crate::error::ApiError;

/// How many times, and how patiently, a request is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Backoff {
    /// Extra attempts after the first request.
    pub retries: u32,
    /// Delay before the first retry; doubles for each one after it.
    pub base: Duration,
}

impl Backoff {
    /// 3 retries after 200ms, 400ms and 800ms.
    pub const PLATFORM: Self = Self {
        retries: 3,
        base: Duration::from_millis(200),
    };

    fn delay(&self, retry: u32) -> Duration {
        self.base.saturating_mul(2u32.saturating_pow(retry))
    }
}

fn is_transient(e: &reqwest::Error) -> bool {
    e.is_connect() || e.is_timeout()
}

/// Send the request built by `f`, retrying transient failures with the
/// platform backoff. A final transport error becomes [`ApiError::Http`]
/// tagged with `endpoint`.
pub(crate) async fn retry_send<F, Fut>(endpoint: &str, f: F) -> Result<reqwest::Response, ApiError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    send_with(Backoff::PLATFORM, endpoint, f).await
}

pub(crate) async fn send_with<F, Fut>(
    backoff: Backoff,
    endpoint: &str,
    f: F,
) -> Result<reqwest::Response, ApiError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let mut retry = 0;
    loop {
        match f().await {
            Ok(resp) => return Ok(resp),
            Err(e) if retry < backoff.retries && is_transient(&e) => {
                let delay = backoff.delay(retry);
                retry += 1;
                tracing::warn!(
                    endpoint,
                    retry,
                    of = backoff.retries,
                    "request failed, retrying in {delay:?}: {e}"
                );
                tokio::time::sleep(delay).await;
            }
            Err(source) => {
                return Err(ApiError::Http {
                    endpoint: endpoint.to_string(),
                    source,
                })
            }
        }
    }
}
