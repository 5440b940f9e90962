//! Exponential backoff arithmetic.
//!
//! All delays are whole milliseconds; sub-millisecond parts are truncated,
//! including those of the initial delay.

use std::time::Duration;

/// Drop the sub-millisecond part of `delay`.
pub fn whole_millis(delay: Duration) -> Duration {
    Duration::from_millis(delay.as_millis() as u64)
}

/// Delay that follows `current`: `current * factor`, truncated to whole
/// milliseconds and capped at `max`.
///
/// Degenerate factors stay well-defined: a non-positive or NaN product gives
/// no delay, an infinite one gives `max`.
pub fn next_delay(current: Duration, factor: f64, max: Duration) -> Duration {
    let next_ms = current.as_millis() as f64 * factor;
    if next_ms.is_nan() || next_ms <= 0.0 {
        return Duration::ZERO;
    }
    if next_ms >= max.as_millis() as f64 {
        return whole_millis(max);
    }
    Duration::from_millis(next_ms as u64)
}

/// The sequence of delays slept between attempts.
///
/// Starts at the initial delay (truncated to whole milliseconds); every
/// following value is [`next_delay`] of the previous one. Never ends.
#[derive(Debug, Clone)]
pub struct Backoff {
    current: Duration,
    factor: f64,
    max: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, factor: f64, max: Duration) -> Self {
        Self {
            current: whole_millis(initial),
            factor,
            max,
        }
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let delay = self.current;
        self.current = next_delay(self.current, self.factor, self.max);
        Some(delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let delays: Vec<_> = Backoff::new(ms(100), 2.0, ms(1000)).take(6).collect();
        assert_eq!(delays, vec![ms(100), ms(200), ms(400), ms(800), ms(1000), ms(1000)]);
    }

    #[test]
    fn test_fractional_factor_truncates() {
        let delays: Vec<_> = Backoff::new(ms(100), 1.5, ms(10_000)).take(4).collect();
        assert_eq!(delays, vec![ms(100), ms(150), ms(225), ms(337)]);
    }

    #[test]
    fn test_sub_millisecond_parts_are_truncated_consistently() {
        let delays: Vec<_> = Backoff::new(Duration::from_micros(1500), 2.0, Duration::from_micros(5500))
            .take(5)
            .collect();
        assert_eq!(delays, vec![ms(1), ms(2), ms(4), ms(5), ms(5)]);

        let delays: Vec<_> = Backoff::new(Duration::from_micros(500), 2.0, ms(10)).take(3).collect();
        assert_eq!(delays, vec![Duration::ZERO; 3]);
    }

    #[test]
    fn test_degenerate_factors() {
        assert_eq!(next_delay(ms(100), 0.0, ms(1000)), Duration::ZERO);
        assert_eq!(next_delay(ms(100), -2.0, ms(1000)), Duration::ZERO);
        assert_eq!(next_delay(ms(100), f64::NAN, ms(1000)), Duration::ZERO);
        assert_eq!(next_delay(ms(100), f64::INFINITY, ms(1000)), ms(1000));
    }

    #[test]
    fn test_shrinking_factor_decays() {
        let delays: Vec<_> = Backoff::new(ms(100), 0.5, ms(1000)).take(4).collect();
        assert_eq!(delays, vec![ms(100), ms(50), ms(25), ms(12)]);
    }
}
