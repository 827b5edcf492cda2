//! Bounded retry with per-attempt timeout
//!
//! Wraps one asynchronous operation: every attempt gets its own timeout,
//! failed attempts are retried after a fixed delay up to the policy's bound,
//! and the whole thing stops as soon as the cancellation token fires.
//! Timing out or cancelling drops the attempt's future, which aborts any
//! request it had in flight.

use log::{debug, warn};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::config::RetryPolicy;

#[derive(Debug, Error)]
pub enum AttemptError<E> {
    #[error("attempt timed out after {0:?}")]
    TimedOut(Duration),

    #[error("{0}")]
    Failed(E),
}

#[derive(Debug, Error)]
pub enum RetryError<E> {
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: AttemptError<E> },

    #[error("cancelled")]
    Cancelled,
}

/// Runs `operation` until it succeeds, attempts run out, or `cancel` fires.
///
/// The operation receives the 1-based attempt number.
pub async fn retry_with_timeout<T, E, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 0;

    loop {
        attempt += 1;
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RetryError::Cancelled),
            outcome = tokio::time::timeout(policy.timeout(), operation(attempt)) => outcome,
        };

        let error = match outcome {
            Ok(Ok(value)) => {
                if attempt > 1 {
                    debug!("Succeeded on attempt {}/{}", attempt, max_attempts);
                }
                return Ok(value);
            }
            Ok(Err(error)) => AttemptError::Failed(error),
            Err(_) => AttemptError::TimedOut(policy.timeout()),
        };

        if attempt >= max_attempts {
            return Err(RetryError::Exhausted {
                attempts: attempt,
                last: error,
            });
        }

        warn!(
            "Attempt {}/{} failed: {}; retrying in {:?}",
            attempt,
            max_attempts,
            error,
            policy.delay()
        );
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RetryError::Cancelled),
            _ = tokio::time::sleep(policy.delay()) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_policy(retries: u32) -> RetryPolicy {
        RetryPolicy {
            timeout_ms: 20,
            retries,
            delay_ms: 1,
        }
    }

    #[tokio::test]
    async fn test_returns_first_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<u32, RetryError<String>> =
            retry_with_timeout(&fast_policy(3), &CancellationToken::new(), |attempt| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        Err(format!("attempt {attempt} failed"))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausts_after_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<(), RetryError<String>> =
            retry_with_timeout(&fast_policy(3), &CancellationToken::new(), |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err("boom".to_string()) }
            })
            .await;

        match result {
            Err(RetryError::Exhausted { attempts, last }) => {
                assert_eq!(attempts, 4);
                assert!(matches!(last, AttemptError::Failed(ref message) if message == "boom"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_times_out_each_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<(), RetryError<String>> =
            retry_with_timeout(&fast_policy(2), &CancellationToken::new(), |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok(())
                }
            })
            .await;

        assert!(matches!(
            result,
            Err(RetryError::Exhausted {
                attempts: 3,
                last: AttemptError::TimedOut(_)
            })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_cancelled_token_stops_before_first_attempt() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<(), RetryError<String>> = retry_with_timeout(&fast_policy(3), &cancel, |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        })
        .await;

        assert!(matches!(result, Err(RetryError::Cancelled)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancellation_interrupts_retry_delay() {
        let cancel = CancellationToken::new();
        let policy = RetryPolicy {
            timeout_ms: 1000,
            retries: 3,
            delay_ms: 60_000,
        };
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result: Result<(), RetryError<String>> =
            retry_with_timeout(&policy, &cancel, |_| async { Err("boom".to_string()) }).await;

        assert!(matches!(result, Err(RetryError::Cancelled)));
    }
}
