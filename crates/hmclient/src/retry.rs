//! Resend policy for rate-limited requests.

use hmconf::RetryConfig;
use std::time::Duration;

/// How `TOO_MANY_REQUESTS` answers are retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the first resend
    pub delay: Duration,
    /// Cap on the delay when `exponential` is set
    pub max_delay: Duration,
    /// Resends before giving up, `None` for no limit
    pub max_retries: Option<u32>,
    /// Double the delay on every attempt
    pub exponential: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_retries: Some(10),
            exponential: false,
        }
    }
}

impl RetryPolicy {
    /// Resend forever with a fixed delay, the way the hub's first clients did.
    pub fn unbounded() -> Self {
        Self {
            max_retries: None,
            ..Default::default()
        }
    }

    /// Never resend.
    pub fn none() -> Self {
        Self {
            max_retries: Some(0),
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn with_exponential(mut self, max_delay: Duration) -> Self {
        self.exponential = true;
        self.max_delay = max_delay;
        self
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            delay: Duration::from_millis(config.delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            max_retries: (!config.retry_forever).then_some(config.max_retries),
            exponential: config.exponential,
        }
    }

    /// Whether resend number `attempt` (1-based) may go out.
    pub fn allows(&self, attempt: u32) -> bool {
        match self.max_retries {
            Some(max) => attempt <= max,
            None => true,
        }
    }

    /// Delay before resend number `attempt`.
    ///
    /// Fixed: `delay` every time.
    /// Exponential: attempt n waits min(delay * 2^(n-1), max_delay).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        if !self.exponential {
            return self.delay;
        }
        let multiplier = 2u32.saturating_pow(attempt.saturating_sub(1));
        let delay = self.delay.saturating_mul(multiplier);
        std::cmp::min(delay, self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fixed_one_second_ten_times() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(7), Duration::from_secs(1));
        assert!(policy.allows(10));
        assert!(!policy.allows(11));
    }

    #[test]
    fn exponential_is_capped() {
        let policy = RetryPolicy::default()
            .with_delay(Duration::from_millis(100))
            .with_exponential(Duration::from_millis(500));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(400));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(500));
        assert_eq!(policy.delay_for_attempt(40), Duration::from_millis(500));
    }

    #[test]
    fn unbounded_always_allows() {
        let policy = RetryPolicy::unbounded();
        assert!(policy.allows(u32::MAX));
        assert!(!RetryPolicy::none().allows(1));
    }

    #[test]
    fn from_config() {
        let mut config = RetryConfig {
            delay_ms: 250,
            max_retries: 3,
            ..Default::default()
        };
        let policy = RetryPolicy::from_config(&config);
        assert_eq!(policy.delay, Duration::from_millis(250));
        assert_eq!(policy.max_retries, Some(3));

        config.retry_forever = true;
        assert_eq!(RetryPolicy::from_config(&config).max_retries, None);
    }
}
