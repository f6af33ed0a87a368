//! Exponential backoff.

use std::time::Duration;

/// Delay to wait after the given 1-based attempt: `base * 2^(attempt - 1)`.
///
/// Attempt 0 yields no delay. Saturates instead of overflowing.
pub fn calculate_backoff(attempt: u32, base: Duration) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let factor = 2u32.saturating_pow(attempt - 1);
    base.saturating_mul(factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_calculation() {
        let base = Duration::from_millis(2000);
        assert_eq!(calculate_backoff(0, base), Duration::ZERO);
        assert_eq!(calculate_backoff(1, base), Duration::from_millis(2000));
        assert_eq!(calculate_backoff(2, base), Duration::from_millis(4000));
        assert_eq!(calculate_backoff(3, base), Duration::from_millis(8000));
    }

    #[test]
    fn test_backoff_saturates() {
        let delay = calculate_backoff(64, Duration::from_secs(u64::MAX / 2));
        assert_eq!(delay, Duration::MAX);
    }
}
