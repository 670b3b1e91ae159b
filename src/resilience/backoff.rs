//! Inter-attempt delay: fixed or exponential, with optional jitter.

use std::time::Duration;
use rand::Rng;

use crate::config::{BackoffConfig, BackoffStrategy};

/// Computes the wait after each failed attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct DelaySchedule {
    base_ms: u64,
    max_ms: u64,
    strategy: BackoffStrategy,
    jitter: bool,
}

impl DelaySchedule {
    pub fn new(base: Duration, backoff: &BackoffConfig) -> Self {
        Self {
            base_ms: u64::try_from(base.as_millis()).unwrap_or(u64::MAX),
            max_ms: backoff.max_delay_ms,
            strategy: backoff.strategy,
            jitter: backoff.jitter,
        }
    }

    /// A schedule that always waits exactly `delay`.
    pub fn fixed(delay: Duration) -> Self {
        Self::new(delay, &BackoffConfig::default())
    }

    /// Wait after the `failed_attempts`-th consecutive failure (1-based).
    ///
    /// Never shorter than the configured base delay.
    pub fn delay_after(&self, failed_attempts: u32) -> Duration {
        let delay_ms = match self.strategy {
            BackoffStrategy::Fixed => self.base_ms,
            BackoffStrategy::Exponential => {
                exponential_ms(failed_attempts, self.base_ms, self.max_ms.max(self.base_ms))
            }
        };

        if self.jitter {
            Duration::from_millis(delay_ms.saturating_add(jitter_ms(delay_ms)))
        } else {
            Duration::from_millis(delay_ms)
        }
    }
}

fn exponential_ms(attempt: u32, base_ms: u64, max_ms: u64) -> u64 {
    if attempt == 0 {
        return base_ms;
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    base_ms.saturating_mul(exponential_base).min(max_ms)
}

// 0 to 10% of the delay
fn jitter_ms(delay_ms: u64) -> u64 {
    let jitter_range = delay_ms / 10;
    if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exponential(base_ms: u64, max_ms: u64, jitter: bool) -> DelaySchedule {
        DelaySchedule::new(
            Duration::from_millis(base_ms),
            &BackoffConfig {
                strategy: BackoffStrategy::Exponential,
                max_delay_ms: max_ms,
                jitter,
            },
        )
    }

    #[test]
    fn test_fixed_delay_is_constant() {
        let schedule = DelaySchedule::fixed(Duration::from_secs(2));
        assert_eq!(schedule.delay_after(1), Duration::from_secs(2));
        assert_eq!(schedule.delay_after(29), Duration::from_secs(2));
    }

    #[test]
    fn test_exponential_growth_and_cap() {
        let schedule = exponential(100, 1000, false);
        assert_eq!(schedule.delay_after(1), Duration::from_millis(100));
        assert_eq!(schedule.delay_after(2), Duration::from_millis(200));
        assert_eq!(schedule.delay_after(3), Duration::from_millis(400));
        assert_eq!(schedule.delay_after(5), Duration::from_millis(1000));
        assert_eq!(schedule.delay_after(64), Duration::from_millis(1000));
    }

    #[test]
    fn test_jitter_stays_within_ten_percent() {
        let schedule = exponential(1000, 1000, true);
        for attempt in 1..50 {
            let delay = schedule.delay_after(attempt).as_millis();
            assert!((1000..1100).contains(&delay), "delay {} out of range", delay);
        }
    }

    #[test]
    fn test_jitter_on_huge_delay_saturates() {
        let schedule = DelaySchedule::new(
            Duration::from_millis(u64::MAX),
            &BackoffConfig {
                strategy: BackoffStrategy::Fixed,
                max_delay_ms: 30_000,
                jitter: true,
            },
        );
        assert_eq!(schedule.delay_after(1), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_exponential_with_huge_cap_and_jitter() {
        let schedule = exponential(u64::MAX / 2, u64::MAX, true);
        assert!(schedule.delay_after(40) >= Duration::from_millis(u64::MAX / 2));
    }

    #[test]
    fn test_zero_delay() {
        let schedule = DelaySchedule::fixed(Duration::ZERO);
        assert_eq!(schedule.delay_after(1), Duration::ZERO);
    }
}
