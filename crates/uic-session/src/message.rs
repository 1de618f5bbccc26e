//! Wire message types for the live-update transport (§4.5 "Transport",
//! §6 "Live-update wire format").
//!
//! Each [`Message`] variant serializes to a single JSON object carrying its
//! own `type` discriminant plus whatever fields that message type needs —
//! matching the frame envelope the spec describes (`{"type":"update",...}`).

use serde::{Deserialize, Serialize};
use uic_delta::SchemaDelta;
use uic_ir::Ir;

/// Severity of an `error` message (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Surfaced to the user but the session continues.
    Warning,
    /// An operational error; the session may continue.
    Error,
    /// The session cannot continue and must terminate.
    Fatal,
}

/// The body of an `update` message: either a full IR or an incremental
/// delta (§4.5 "A delta is preferred ... otherwise a full IR is sent").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpdatePayload {
    /// A complete replacement IR.
    Full {
        /// The new IR in full.
        ir: Box<Ir>,
    },
    /// An incremental change relative to the previously applied IR.
    Incremental {
        /// The computed delta.
        delta: SchemaDelta,
    },
}

/// A single frame on the live-update channel (§4.5, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// Client → server: open a session.
    Connect {
        /// Opaque auth token.
        token: String,
        /// Stable per-install device identifier.
        device_id: String,
        /// Target platform tag (e.g. "ios", "android", "web").
        platform: String,
        /// Client library/app version.
        client_version: String,
    },
    /// Server → client: session accepted.
    Connected {
        /// Server-assigned connection id.
        connection_id: String,
        /// Capabilities the server supports for this connection.
        capabilities: Vec<String>,
        /// Initial IR, if the server has one ready immediately.
        #[serde(skip_serializing_if = "Option::is_none")]
        initial_ir: Option<Box<Ir>>,
        /// First sequence number the client should expect.
        sequence_base: u64,
    },
    /// Server → client: an update to apply.
    Update {
        /// Session this update belongs to.
        session_id: String,
        /// Server-side send time, Unix epoch milliseconds.
        timestamp: i64,
        /// Monotonically increasing per-session sequence number.
        sequence: u64,
        /// The full IR or incremental delta to apply.
        payload: UpdatePayload,
        /// Whether the renderer should preserve existing node-local state.
        preserve_state: bool,
    },
    /// Client → server: acknowledge an update.
    Ack {
        /// Session this ack belongs to.
        session_id: String,
        /// The sequence number being acknowledged.
        sequence: u64,
        /// Whether the client applied the update successfully.
        success: bool,
        /// Error detail when `success` is false.
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
        /// Time taken to apply the update, in milliseconds.
        apply_duration_ms: u64,
    },
    /// Either side → the other, every 30 s: liveness probe.
    Ping {
        /// Session this probe belongs to.
        session_id: String,
        /// Sender-side time, Unix epoch milliseconds.
        timestamp: i64,
    },
    /// Reply to `ping`.
    Pong {
        /// Session this reply belongs to.
        session_id: String,
        /// Echoes the `ping`'s timestamp.
        timestamp: i64,
    },
    /// Server → client: an operational or fatal error.
    Error {
        /// Session this error belongs to, if one was established.
        #[serde(skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
        /// Machine-readable error code.
        code: String,
        /// Human-readable message.
        message: String,
        /// How serious the error is.
        severity: Severity,
        /// Whether the session can continue after this error.
        recoverable: bool,
    },
}

impl Message {
    /// Parse a `Message` from a single frame's JSON body. Unknown fields are
    /// ignored by serde by default; unknown `type` values are reported as a
    /// [`crate::error::SessionError::MalformedFrame`] rather than the
    /// warning-level `error` message the spec describes, since producing
    /// that message is the caller's responsibility (it needs a session id
    /// this free function doesn't have).
    pub fn from_json(bytes: &[u8]) -> crate::error::Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Serialize this message to its wire JSON representation.
    pub fn to_json(&self) -> crate::error::Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_round_trips() {
        let msg = Message::Connect {
            token: "tok".to_string(),
            device_id: "dev-1".to_string(),
            platform: "ios".to_string(),
            client_version: "1.2.3".to_string(),
        };
        let bytes = msg.to_json().unwrap();
        let parsed = Message::from_json(&bytes).unwrap();
        match parsed {
            Message::Connect { token, .. } => assert_eq!(token, "tok"),
            other => panic!("expected Connect, got {other:?}"),
        }
    }

    #[test]
    fn unknown_type_is_malformed_frame() {
        let bytes = br#"{"type":"not_a_real_type"}"#;
        assert!(Message::from_json(bytes).is_err());
    }

    #[test]
    fn ping_pong_carry_session_and_timestamp() {
        let msg = Message::Ping {
            session_id: "s1".to_string(),
            timestamp: 12345,
        };
        let bytes = msg.to_json().unwrap();
        let parsed = Message::from_json(&bytes).unwrap();
        match parsed {
            Message::Ping {
                session_id,
                timestamp,
            } => {
                assert_eq!(session_id, "s1");
                assert_eq!(timestamp, 12345);
            }
            other => panic!("expected Ping, got {other:?}"),
        }
    }

    #[test]
    fn error_severity_serializes_snake_case() {
        let msg = Message::Error {
            session_id: None,
            code: "E1".to_string(),
            message: "boom".to_string(),
            severity: Severity::Fatal,
            recoverable: false,
        };
        let bytes = msg.to_json().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"severity\":\"fatal\""));
    }
}
