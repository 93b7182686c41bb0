//! Transport-level retry with exponential backoff.
//!
//! This sits below the term-variant fallback of the resolution layer: a
//! catalog call that times out is retried here with the *same* query before
//! the coordinator ever considers a singular/plural variant.

use std::future::Future;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::time::sleep;

/// Configuration for retry behavior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt; `0` disables retry.
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    #[serde(with = "crate::serde_millis")]
    pub base_delay: Duration,
    /// Upper bound for any single delay, in milliseconds.
    #[serde(with = "crate::serde_millis")]
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    /// Spread each delay by ±25%.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// A config that makes exactly one attempt.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.backoff_multiplier.is_finite() && self.backoff_multiplier >= 1.0) {
            return Err(format!(
                "backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }
        if self.base_delay > self.max_delay {
            return Err("base_delay must not exceed max_delay".into());
        }
        Ok(())
    }

    /// Delay before retry number `attempt` (1-based; `0` means no delay).
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let exponential = self.base_delay.as_millis() as f64 * self.backoff_multiplier.powi(exponent);
        let delay_ms = exponential.min(self.max_delay.as_millis() as f64) as u64;

        if self.jitter {
            let spread = delay_ms / 4;
            if spread > 0 {
                let offset = fastrand::u64(0..=spread * 2);
                return Duration::from_millis(delay_ms - spread + offset);
            }
        }

        Duration::from_millis(delay_ms)
    }
}

/// Result of a retried operation.
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    /// Final value or the last error observed.
    pub result: Result<T, E>,
    /// Attempts made; `1` means the first try settled it.
    pub attempts: u32,
    pub total_duration: Duration,
}

impl<T, E> RetryOutcome<T, E> {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }

    pub fn into_result(self) -> Result<T, E> {
        self.result
    }
}

/// Run `operation` until it succeeds, returns an error `should_retry`
/// rejects, or the retry budget is spent.
///
/// `operation` receives the 0-based attempt number.
pub async fn execute_with_retry_async<T, E, F, Fut, R>(
    config: &RetryConfig,
    should_retry: R,
    mut operation: F,
) -> RetryOutcome<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
{
    let start = Instant::now();
    let mut attempt = 0;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                return RetryOutcome {
                    result: Ok(value),
                    attempts: attempt + 1,
                    total_duration: start.elapsed(),
                };
            }
            Err(err) => {
                if attempt >= config.max_retries || !should_retry(&err) {
                    return RetryOutcome {
                        result: Err(err),
                        attempts: attempt + 1,
                        total_duration: start.elapsed(),
                    };
                }
                attempt += 1;
                let delay = config.calculate_delay(attempt);
                if !delay.is_zero() {
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryConfig {
        RetryConfig::default()
            .with_base_delay(Duration::from_millis(1))
            .with_max_delay(Duration::from_millis(2))
            .with_jitter(false)
    }

    #[test]
    fn exponential_delays_without_jitter() {
        let config = RetryConfig::default()
            .with_base_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_secs(5))
            .with_jitter(false);
        assert_eq!(config.calculate_delay(0), Duration::ZERO);
        assert_eq!(config.calculate_delay(1), Duration::from_millis(100));
        assert_eq!(config.calculate_delay(2), Duration::from_millis(200));
        assert_eq!(config.calculate_delay(3), Duration::from_millis(400));
    }

    #[test]
    fn delay_is_capped_and_jitter_stays_in_band() {
        let config = RetryConfig::default()
            .with_base_delay(Duration::from_millis(400))
            .with_max_delay(Duration::from_millis(400));
        for _ in 0..50 {
            let delay = config.calculate_delay(4);
            assert!(delay >= Duration::from_millis(300));
            assert!(delay <= Duration::from_millis(500));
        }
    }

    #[test]
    fn validate_rejects_shrinking_backoff() {
        assert!(RetryConfig::default().validate().is_ok());
        assert!(RetryConfig::default()
            .with_backoff_multiplier(0.5)
            .validate()
            .is_err());
        assert!(RetryConfig::default()
            .with_base_delay(Duration::from_secs(10))
            .validate()
            .is_err());
    }

    #[test]
    fn config_reads_millis() {
        let cfg: RetryConfig =
            serde_json::from_str(r#"{"max_retries": 1, "base_delay": 25}"#).unwrap();
        assert_eq!(cfg.max_retries, 1);
        assert_eq!(cfg.base_delay, Duration::from_millis(25));
        assert_eq!(cfg.max_delay, RetryConfig::default().max_delay);
    }

    #[tokio::test]
    async fn eventual_success_counts_attempts() {
        let calls = AtomicU32::new(0);
        let outcome = execute_with_retry_async(&fast(), |_: &String| true, |_| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err("flaky".to_string())
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert!(outcome.succeeded());
        assert_eq!(outcome.attempts, 3);
    }

    #[tokio::test]
    async fn exhaustion_returns_last_error() {
        let outcome: RetryOutcome<(), String> =
            execute_with_retry_async(&fast().with_max_retries(2), |_| true, |attempt| async move {
                Err(format!("attempt {attempt}"))
            })
            .await;
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.into_result(), Err("attempt 2".to_string()));
    }

    #[tokio::test]
    async fn non_retryable_error_stops_immediately() {
        let outcome: RetryOutcome<(), &str> =
            execute_with_retry_async(&fast(), |err| *err != "fatal", |_| async {
                Err("fatal")
            })
            .await;
        assert_eq!(outcome.attempts, 1);
    }

    #[tokio::test]
    async fn disabled_makes_one_attempt() {
        let outcome: RetryOutcome<(), &str> =
            execute_with_retry_async(&RetryConfig::disabled(), |_| true, |_| async {
                Err("down")
            })
            .await;
        assert_eq!(outcome.attempts, 1);
    }
}
