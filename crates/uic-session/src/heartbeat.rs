//! Heartbeat liveness tracking (§4.5 "Heartbeat and timeout"): ping every
//! 30 s, treat the session as dead if no pong arrives within 60 s of the
//! last ping.

use std::time::{Duration, Instant};

/// Interval at which a `ping` is sent.
pub const PING_INTERVAL: Duration = Duration::from_secs(30);

/// Maximum time to wait for a `pong` after the last `ping` before declaring
/// the session dead.
pub const PONG_TIMEOUT: Duration = Duration::from_secs(60);

/// Tracks ping/pong timestamps for one side of a session.
#[derive(Debug)]
pub struct Heartbeat {
    last_ping_sent: Option<Instant>,
    last_pong_received: Option<Instant>,
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self::new()
    }
}

impl Heartbeat {
    /// A heartbeat tracker with no pings sent yet.
    pub fn new() -> Self {
        Self {
            last_ping_sent: None,
            last_pong_received: None,
        }
    }

    /// Record that a `ping` was just sent at `at`.
    pub fn record_ping_sent(&mut self, at: Instant) {
        self.last_ping_sent = Some(at);
    }

    /// Record that a `pong` was just received at `at`.
    pub fn record_pong_received(&mut self, at: Instant) {
        self.last_pong_received = Some(at);
    }

    /// Whether the session should be considered dead at `now`: a ping has
    /// been sent and more than [`PONG_TIMEOUT`] has elapsed since it without
    /// a subsequent pong.
    pub fn is_dead(&self, now: Instant) -> bool {
        let Some(ping_at) = self.last_ping_sent else {
            return false;
        };
        let pong_is_fresh = self
            .last_pong_received
            .is_some_and(|pong_at| pong_at >= ping_at);
        if pong_is_fresh {
            return false;
        }
        now.saturating_duration_since(ping_at) > PONG_TIMEOUT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_ping_sent_is_never_dead() {
        let hb = Heartbeat::new();
        assert!(!hb.is_dead(Instant::now()));
    }

    #[test]
    fn fresh_pong_keeps_it_alive() {
        let mut hb = Heartbeat::new();
        let t0 = Instant::now();
        hb.record_ping_sent(t0);
        hb.record_pong_received(t0 + Duration::from_millis(10));
        assert!(!hb.is_dead(t0 + PONG_TIMEOUT + Duration::from_secs(1)));
    }

    #[test]
    fn missing_pong_past_timeout_is_dead() {
        let mut hb = Heartbeat::new();
        let t0 = Instant::now();
        hb.record_ping_sent(t0);
        assert!(hb.is_dead(t0 + PONG_TIMEOUT + Duration::from_millis(1)));
        assert!(!hb.is_dead(t0 + PONG_TIMEOUT - Duration::from_millis(1)));
    }

    #[test]
    fn stale_pong_from_before_the_last_ping_does_not_count() {
        let mut hb = Heartbeat::new();
        let t0 = Instant::now();
        hb.record_pong_received(t0);
        hb.record_ping_sent(t0 + Duration::from_secs(1));
        assert!(hb.is_dead(t0 + Duration::from_secs(1) + PONG_TIMEOUT + Duration::from_millis(1)));
    }
}
