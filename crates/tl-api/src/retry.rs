//! Backoff policy for transient chat-completion failures.

use rand::Rng;
use tl_types::ApiError;

/// How often, and how patiently, a failed request is re-sent.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Re-sends after the first attempt; 0 sends once.
    pub max_retries: u32,
    /// Wait before the first re-send, in ms.
    pub initial_delay_ms: u64,
    /// Upper bound for any wait, `Retry-After` included, in ms.
    pub max_delay_ms: u64,
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay_ms: 1000,
            max_delay_ms: 60_000,
            backoff_factor: 2.0,
        }
    }
}

impl RetryConfig {
    /// A configuration that sends each request exactly once.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay in milliseconds before retrying after `attempt` (0-based).
    ///
    /// A server-provided `Retry-After` wins (clamped to `max_delay_ms`);
    /// otherwise `initial_delay_ms * backoff_factor^attempt` with ±25% jitter.
    pub fn delay_ms(&self, attempt: u32, retry_after_ms: Option<u64>) -> u64 {
        if let Some(server_delay) = retry_after_ms {
            return server_delay.min(self.max_delay_ms);
        }

        let base = self.initial_delay_ms as f64 * self.backoff_factor.powi(attempt as i32);
        let clamped = base.min(self.max_delay_ms as f64);
        let jitter = rand::rng().random_range(0.75..=1.25);

        ((clamped * jitter) as u64).min(self.max_delay_ms)
    }
}

/// Rate limits, 5xx, connection failures and timeouts may succeed on a re-send.
pub fn is_retryable(error: &ApiError) -> bool {
    matches!(
        error,
        ApiError::RateLimited { .. }
            | ApiError::Server { .. }
            | ApiError::Network(_)
            | ApiError::Timeout
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allows_two_retries() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.initial_delay_ms, 1000);
    }

    #[test]
    fn disabled_keeps_delays() {
        let config = RetryConfig::disabled();
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.max_delay_ms, 60_000);
    }

    #[test]
    fn transient_errors_are_retryable() {
        assert!(is_retryable(&ApiError::RateLimited {
            retry_after_ms: None
        }));
        assert!(is_retryable(&ApiError::Server {
            status: 502,
            message: "bad gateway".into(),
        }));
        assert!(is_retryable(&ApiError::Network("reset".into())));
        assert!(is_retryable(&ApiError::Timeout));
    }

    #[test]
    fn client_errors_are_not_retryable() {
        assert!(!is_retryable(&ApiError::Auth {
            message: "bad key".into()
        }));
        assert!(!is_retryable(&ApiError::BadRequest {
            message: "bad".into()
        }));
        assert!(!is_retryable(&ApiError::NotFound {
            message: "no such model".into()
        }));
        assert!(!is_retryable(&ApiError::Decode("eof".into())));
        assert!(!is_retryable(&ApiError::StreamParse("bad json".into())));
    }

    #[test]
    fn delay_grows_exponentially_with_jitter() {
        let config = RetryConfig {
            max_retries: 5,
            ..RetryConfig::default()
        };
        let d0 = config.delay_ms(0, None);
        assert!((750..=1250).contains(&d0), "d0={d0}");
        let d2 = config.delay_ms(2, None);
        assert!((3000..=5000).contains(&d2), "d2={d2}");
    }

    #[test]
    fn delay_prefers_retry_after_but_clamps() {
        let config = RetryConfig {
            max_delay_ms: 10_000,
            ..RetryConfig::default()
        };
        assert_eq!(config.delay_ms(0, Some(4000)), 4000);
        assert_eq!(config.delay_ms(3, Some(30_000)), 10_000);
    }

    #[test]
    fn delay_never_exceeds_max() {
        let config = RetryConfig {
            max_retries: 10,
            initial_delay_ms: 1000,
            max_delay_ms: 5000,
            backoff_factor: 10.0,
        };
        assert!(config.delay_ms(6, None) <= 5000);
    }
}
