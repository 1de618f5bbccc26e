//! Reconnection policy (§4.5 "Reconnection"): exponential backoff with base
//! 1 s, factor 2, cap 30 s, reset after the first successful reconnect.
//! Authentication failures are never retried automatically. A bounded ±10%
//! jitter is layered on top of the computed delay to avoid a thundering
//! herd of simultaneous reconnects, the same adjustment the teacher's Kafka
//! consumer backoff applies on top of its own base/factor/cap.

use std::time::Duration;

/// Backoff base delay.
pub const BASE_DELAY: Duration = Duration::from_secs(1);
/// Backoff growth factor per attempt.
pub const FACTOR: u32 = 2;
/// Maximum backoff delay.
pub const CAP: Duration = Duration::from_secs(30);
/// Maximum fraction of the computed delay that jitter may add or remove.
pub const JITTER_FRACTION: f64 = 0.1;

/// Why a reconnection attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectFailure {
    /// The server rejected the credentials; do not retry automatically.
    Authentication,
    /// A transient failure (network, timeout, server error); retry.
    Transient,
}

/// Exponential backoff state for one session's reconnection attempts.
#[derive(Debug)]
pub struct Backoff {
    attempt: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}

impl Backoff {
    /// A fresh backoff with no attempts made yet.
    pub fn new() -> Self {
        Self { attempt: 0 }
    }

    /// The unjittered delay for the current attempt, capped at [`CAP`].
    fn base_delay(&self) -> Duration {
        let exp = FACTOR.saturating_pow(self.attempt);
        BASE_DELAY.saturating_mul(exp).min(CAP)
    }

    /// The delay to wait before the next reconnection attempt, then advances
    /// the attempt counter. Includes up to ±[`JITTER_FRACTION`] of random
    /// jitter on top of the exponential base, clamped back to [`CAP`].
    pub fn next_delay(&mut self) -> Duration {
        let base = self.base_delay();
        self.attempt = self.attempt.saturating_add(1);
        jitter(base).min(CAP)
    }

    /// The delay for the current attempt with no jitter applied, then
    /// advances the attempt counter. Used where deterministic timing
    /// matters more than spreading reconnect load.
    pub fn next_delay_unjittered(&mut self) -> Duration {
        let base = self.base_delay();
        self.attempt = self.attempt.saturating_add(1);
        base
    }

    /// Whether a failure of this kind should be retried automatically.
    /// Authentication failures surface to the caller instead (§4.5).
    pub fn should_retry(failure: ReconnectFailure) -> bool {
        failure != ReconnectFailure::Authentication
    }

    /// Reset the backoff after a successful reconnect, so a later failure
    /// starts again from [`BASE_DELAY`] (§4.5 "capped at the first
    /// successful reconnect").
    pub fn on_reconnect_success(&mut self) {
        self.attempt = 0;
    }
}

/// Apply up to ±[`JITTER_FRACTION`] of random jitter to `delay`.
fn jitter(delay: Duration) -> Duration {
    let factor = 1.0 + JITTER_FRACTION * (2.0 * rand::random::<f64>() - 1.0);
    Duration::from_secs_f64((delay.as_secs_f64() * factor).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_double_up_to_the_cap() {
        let mut backoff = Backoff::new();
        assert_eq!(backoff.next_delay_unjittered(), Duration::from_secs(1));
        assert_eq!(backoff.next_delay_unjittered(), Duration::from_secs(2));
        assert_eq!(backoff.next_delay_unjittered(), Duration::from_secs(4));
        assert_eq!(backoff.next_delay_unjittered(), Duration::from_secs(8));
        assert_eq!(backoff.next_delay_unjittered(), Duration::from_secs(16));
        assert_eq!(backoff.next_delay_unjittered(), Duration::from_secs(30));
        assert_eq!(backoff.next_delay_unjittered(), Duration::from_secs(30));
    }

    #[test]
    fn resets_after_successful_reconnect() {
        let mut backoff = Backoff::new();
        backoff.next_delay_unjittered();
        backoff.next_delay_unjittered();
        backoff.on_reconnect_success();
        assert_eq!(backoff.next_delay_unjittered(), Duration::from_secs(1));
    }

    #[test]
    fn authentication_failures_are_not_retried() {
        assert!(!Backoff::should_retry(ReconnectFailure::Authentication));
        assert!(Backoff::should_retry(ReconnectFailure::Transient));
    }

    #[test]
    fn jittered_delay_stays_within_bounds_of_the_base() {
        let mut backoff = Backoff::new();
        for _ in 0..50 {
            let delay = backoff.next_delay();
            assert!(delay <= CAP);
            backoff.attempt = 0;
            let base = backoff.base_delay();
            let lower = base.mul_f64(1.0 - JITTER_FRACTION);
            let upper = base.mul_f64(1.0 + JITTER_FRACTION).min(CAP);
            assert!(delay + Duration::from_millis(1) >= lower);
            assert!(delay <= upper + Duration::from_millis(1));
        }
    }
}
