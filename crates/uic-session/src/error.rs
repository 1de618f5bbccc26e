//! Error type for the session/transport layer (§4.5, §7).

use thiserror::Error;

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors raised while driving a live-update session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// A frame's envelope could not be parsed as a known message.
    #[error("malformed frame: {0}")]
    MalformedFrame(#[from] serde_json::Error),

    /// A sequence number arrived out of order.
    #[error("out-of-sequence update: expected {expected}, got {got}")]
    OutOfSequence {
        /// The sequence the session was waiting for.
        expected: u64,
        /// The sequence actually received.
        got: u64,
    },

    /// The session received a fatal `error` message and must terminate.
    #[error("session terminated: {0}")]
    Fatal(String),

    /// Reconnection was attempted after an authentication failure, which the
    /// client must not retry automatically (§4.5 "Reconnection").
    #[error("authentication failed; reconnection requires a fresh token")]
    AuthenticationRequired,

    /// Delta computation or application failed.
    #[error(transparent)]
    Delta(#[from] uic_delta::DeltaError),
}
