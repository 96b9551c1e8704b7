//! Retry wrapper for fallible async operations.
//!
//! # Responsibilities
//! - Run an operation up to `max_attempts` times
//! - Pause between attempts according to the policy's backoff
//! - Log each failure with a truncated message
//! - Report exhaustion as `RetryExhausted`, never as a zero-like value

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::config::RetryConfig;
use crate::observability::metrics;
use crate::resilience::backoff::Backoff;

/// Longest error excerpt written to the log per failed attempt.
const LOGGED_ERROR_CHARS: usize = 100;

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Fixed-delay policy.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Fixed(delay),
        }
    }

    /// Same pacing, different attempt budget.
    pub fn with_attempts(self, max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..self
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(3, Duration::from_secs(10))
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        let backoff = if config.exponential {
            Backoff::Exponential {
                base_ms: config.delay_ms,
                max_ms: config.max_delay_ms,
            }
        } else {
            Backoff::Fixed(Duration::from_millis(config.delay_ms))
        };
        Self {
            max_attempts: config.max_attempts,
            backoff,
        }
    }
}

/// Every attempt failed.
#[derive(Debug, Clone, Error)]
#[error("{label} failed after {attempts} attempts: {last_error}")]
pub struct RetryExhausted {
    /// Name of the operation, as passed to [`retry`].
    pub label: String,
    /// Attempts made.
    pub attempts: u32,
    /// Message of the final failure.
    pub last_error: String,
}

/// Run `op` until it succeeds or the policy's attempts are used up.
///
/// No pause follows the final attempt.
pub async fn retry<T, E, F, Fut>(
    label: &str,
    policy: &RetryPolicy,
    mut op: F,
) -> Result<T, RetryExhausted>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=max_attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                last_error = e.to_string();
                metrics::record_retry(label);
                tracing::error!(
                    operation = label,
                    attempt,
                    error = %truncate(&last_error, LOGGED_ERROR_CHARS),
                    "Operation failed"
                );

                let remaining = max_attempts - attempt;
                if remaining > 0 {
                    let delay = policy.backoff.delay(attempt);
                    tracing::info!(
                        operation = label,
                        attempts_left = remaining,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    Err(RetryExhausted {
        label: label.to_string(),
        attempts: max_attempts,
        last_error,
    })
}

fn truncate(message: &str, max_chars: usize) -> &str {
    match message.char_indices().nth(max_chars) {
        Some((idx, _)) => &message[..idx],
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn instant(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::fixed(max_attempts, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_always_failing_runs_exactly_n_times() {
        for n in 1..=5 {
            let calls = Arc::new(AtomicU32::new(0));
            let result: Result<u32, _> = retry("always fails", &instant(n), || {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<u32, _>("boom")
                }
            })
            .await;

            let err = result.unwrap_err();
            assert_eq!(calls.load(Ordering::SeqCst), n);
            assert_eq!(err.attempts, n);
            assert_eq!(err.last_error, "boom");
            assert_eq!(err.label, "always fails");
        }
    }

    #[tokio::test]
    async fn test_zero_result_is_not_failure() {
        let result = retry("zero", &instant(3), || async { Ok::<u32, String>(0) }).await;
        assert_eq!(result.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = retry("flaky", &instant(3), || {
            let calls = calls.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err("transient".to_string())
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_pause_between_attempts_only() {
        let start = tokio::time::Instant::now();
        let policy = RetryPolicy::fixed(3, Duration::from_secs(10));
        let _ = retry("paced", &policy, || async { Err::<(), _>("nope") }).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(20));
        assert!(elapsed < Duration::from_secs(30));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let long = "é".repeat(150);
        assert_eq!(truncate(&long, 100).chars().count(), 100);
        assert_eq!(truncate("short", 100), "short");
    }

    #[test]
    fn test_policy_from_config() {
        let config = RetryConfig::default();
        let policy = RetryPolicy::from(&config);
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff, Backoff::Fixed(Duration::from_secs(10)));
    }
}
