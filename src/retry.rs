// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Retry policy applied around GitHub lookups.
///
/// The classifier itself never retries; the GitHub client wraps each request
/// with [`retry_with_backoff`] and only reports an error once every attempt
/// has failed.
use std::{fmt::Display, time::Duration};

use tokio::time::sleep;
use tracing::{debug, warn};

/// Exponential backoff settings.
#[derive(Debug, Clone, PartialEq,)]
pub struct RetryConfig
{
    /// Total number of attempts, including the first one (default: 3).
    pub max_attempts:     u32,
    /// Delay before the second attempt in milliseconds (default: 1000).
    pub initial_delay_ms: u64,
    /// Multiplier applied to the delay after each failure (default: 2.0).
    pub backoff_factor:   f64,
    /// Upper bound for a single delay in milliseconds (default: 30000).
    pub max_delay_ms:     u64,
}

impl Default for RetryConfig
{
    fn default() -> Self
    {
        Self {
            max_attempts: 3, initial_delay_ms: 1000, backoff_factor: 2.0, max_delay_ms: 30_000,
        }
    }
}

impl RetryConfig
{
    /// Policy that performs a single attempt.
    pub fn no_retry() -> Self
    {
        Self {
            max_attempts: 1, ..Self::default()
        }
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32,) -> Duration
    {
        let exponent = attempt.saturating_sub(1,) as i32;
        let scaled = self.initial_delay_ms as f64 * self.backoff_factor.powi(exponent,);
        let capped = scaled.min(self.max_delay_ms as f64,).max(0.0,);
        Duration::from_millis(capped as u64,)
    }
}

/// Runs `f` until it succeeds or `config.max_attempts` attempts failed.
///
/// # Arguments
///
/// * `config` - Retry configuration
/// * `operation_name` - Name of the operation for logging
/// * `f` - Produces a fresh future for every attempt
///
/// # Errors
///
/// Returns the error of the last attempt.
///
/// # Example
///
/// ```no_run
/// use hacktoberboard::retry::{RetryConfig, retry_with_backoff};
///
/// # async fn example() -> Result<(), hacktoberboard::Error> {
/// let config = RetryConfig::default();
/// let topics = retry_with_backoff(&config, "topics for octo/repo", || async {
///     Ok::<_, hacktoberboard::Error,>(vec!["hacktoberfest".to_string()],)
/// },)
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn retry_with_backoff<F, Fut, T, E,>(
    config: &RetryConfig,
    operation_name: &str,
    mut f: F,
) -> Result<T, E,>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E,>,>,
    E: Display,
{
    let max_attempts = config.max_attempts.max(1,);
    let mut attempt = 1;

    loop {
        match f().await {
            Ok(result,) => {
                if attempt > 1 {
                    debug!("{} succeeded on attempt {}", operation_name, attempt);
                }
                return Ok(result,);
            }
            Err(error,) => {
                if attempt >= max_attempts {
                    warn!("{} failed after {} attempts: {}", operation_name, max_attempts, error);
                    return Err(error,);
                }

                let delay = config.delay_after(attempt,);
                warn!(
                    "{} failed on attempt {}/{}: {}. Retrying in {}ms...",
                    operation_name,
                    attempt,
                    max_attempts,
                    error,
                    delay.as_millis()
                );

                sleep(delay,).await;
                attempt += 1;
            }
        }
    }
}
