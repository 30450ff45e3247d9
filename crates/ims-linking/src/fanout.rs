//! Bounded settle-all gather.
//!
//! Runs one future per input with at most `limit` in flight, wraps each in
//! a timeout, and returns every outcome in input order. A failed or expired
//! call never cancels its siblings; the gather returns only after every
//! call has settled.

use std::future::Future;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use ims_client::ApiError;

use crate::error::CallFailure;

pub(crate) async fn settle_all<I, T, F, Fut>(
    items: I,
    limit: usize,
    call_timeout: Duration,
    mut f: F,
) -> Vec<Result<T, CallFailure>>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    stream::iter(items)
        .map(|item| {
            let call = f(item);
            async move {
                match tokio::time::timeout(call_timeout, call).await {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(e)) => Err(CallFailure::Api(e)),
                    Err(_) => Err(CallFailure::TimedOut(call_timeout)),
                }
            }
        })
        .buffered(limit.max(1))
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn rejected(msg: &str) -> ApiError {
        ApiError::Rejected {
            endpoint: "test".into(),
            status_code: 500,
            message: msg.into(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn outcomes_keep_input_order_and_failures_do_not_short_circuit() {
        let results = settle_all(1..=5u64, 2, Duration::from_secs(5), |i| async move {
            // Later items finish first.
            tokio::time::sleep(Duration::from_millis(100 / i)).await;
            if i == 2 {
                Err(rejected("boom"))
            } else {
                Ok(i * 10)
            }
        })
        .await;

        assert_eq!(results.len(), 5);
        assert_eq!(results[0].as_ref().ok(), Some(&10));
        assert!(results[1].is_err());
        assert_eq!(results[4].as_ref().ok(), Some(&50));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrency_never_exceeds_limit() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let results = settle_all(0..12, 3, Duration::from_secs(5), |_| {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, ApiError>(())
            }
        })
        .await;

        assert_eq!(results.len(), 12);
        assert!(results.iter().all(Result::is_ok));
        assert_eq!(peak.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_call_times_out_without_blocking_others() {
        let results = settle_all([1u64, 2, 3], 3, Duration::from_secs(1), |i| async move {
            if i == 2 {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            Ok::<_, ApiError>(i)
        })
        .await;

        assert!(matches!(results[1], Err(CallFailure::TimedOut(_))));
        assert_eq!(results[0].as_ref().ok(), Some(&1));
        assert_eq!(results[2].as_ref().ok(), Some(&3));
    }

    #[tokio::test]
    async fn empty_input_settles_immediately() {
        let results: Vec<Result<(), CallFailure>> =
            settle_all(Vec::<u8>::new(), 4, Duration::from_secs(1), |_| async {
                Ok::<_, ApiError>(())
            })
            .await;
        assert!(results.is_empty());
    }
}
