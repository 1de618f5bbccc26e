//! Per-session state machine tying together sequencing, batching,
//! heartbeat, and state preservation (§4.5).

use std::time::Instant;

use uic_ir::Ir;

use crate::batch::{Batcher, PendingEdit};
use crate::error::{Result, SessionError};
use crate::heartbeat::Heartbeat;
use crate::message::{Message, Severity, UpdatePayload};
use crate::sequencer::SequenceAssigner;
use crate::state::RendererState;

/// Generate a fresh connection id for a handshake reply.
pub fn new_connection_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// The current wall-clock time in milliseconds, for stamping `update` and
/// `ping`/`pong` messages.
pub fn now_timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Server-side state for one live-update session.
///
/// Owned exclusively by that session's tasks once registered (§5 "Session
/// registry"); the registry itself lives in `uic-cache`.
#[derive(Debug)]
pub struct Session {
    id: String,
    connection_id: String,
    sequencer: SequenceAssigner,
    batcher: Batcher,
    heartbeat: Heartbeat,
    state: RendererState,
    current_ir: Option<Box<Ir>>,
    resend_full_next: bool,
}

impl Session {
    /// Start a new session, assigning sequence numbers from `sequence_base`.
    pub fn new(id: impl Into<String>, connection_id: impl Into<String>, sequence_base: u64) -> Self {
        Self {
            id: id.into(),
            connection_id: connection_id.into(),
            sequencer: SequenceAssigner::new(sequence_base),
            batcher: Batcher::new(),
            heartbeat: Heartbeat::new(),
            state: RendererState::new(),
            current_ir: None,
            resend_full_next: false,
        }
    }

    /// This session's id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The connection id the server assigned on handshake.
    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    /// Build the `connected` handshake reply for this session.
    pub fn connected_message(&self, capabilities: Vec<String>, initial_ir: Option<Box<Ir>>) -> Message {
        Message::Connected {
            connection_id: self.connection_id.clone(),
            capabilities,
            sequence_base: self.sequencer.peek_next(),
            initial_ir,
        }
    }

    /// Queue an edit to be carried by the next batched update
    /// (§4.5 "Batching").
    pub fn queue_edit(&mut self, edit: PendingEdit) {
        if let PendingEdit::Full(ir) = &edit {
            self.current_ir = Some(ir.clone());
        }
        self.batcher.push(edit);
    }

    /// Whether there is a batched edit waiting to be flushed.
    pub fn has_pending(&self) -> bool {
        self.resend_full_next || !self.batcher.is_empty()
    }

    /// Flush the current batch (or a forced full resend) into an `update`
    /// message, assigning it the next sequence number. Returns `None` if
    /// there is nothing to send.
    pub fn flush(&mut self, timestamp_ms: i64, preserve_state: bool) -> Option<Message> {
        let payload = if self.resend_full_next {
            self.resend_full_next = false;
            self.batcher.take();
            match &self.current_ir {
                Some(ir) => UpdatePayload::Full { ir: ir.clone() },
                None => return None,
            }
        } else {
            self.batcher.take()?
        };

        match &payload {
            UpdatePayload::Full { ir } => self.state.reset_from_full_ir(ir),
            UpdatePayload::Incremental { delta } => self.state.apply_delta(delta),
        }

        let sequence = self.sequencer.next();
        Some(Message::Update {
            session_id: self.id.clone(),
            timestamp: timestamp_ms,
            sequence,
            payload,
            preserve_state,
        })
    }

    /// Handle an `ack` message. A negative ack is logged and schedules a
    /// full resend on the next flush (§4.5 "Failure semantics").
    pub fn handle_ack(&mut self, sequence: u64, success: bool, error: Option<&str>) {
        if !success {
            tracing::warn!(
                session_id = %self.id,
                sequence = sequence,
                error = error.unwrap_or("<no detail>"),
                "client reported failed update application"
            );
            self.resend_full_next = true;
        }
    }

    /// Handle an `error` message received from the peer. A fatal severity
    /// terminates the session; anything else is surfaced without teardown
    /// (§4.5 "Failure semantics").
    pub fn handle_error(&self, severity: Severity, message: &str) -> Result<()> {
        match severity {
            Severity::Fatal => Err(SessionError::Fatal(message.to_string())),
            Severity::Warning | Severity::Error => {
                tracing::warn!(session_id = %self.id, severity = ?severity, "{}", message);
                Ok(())
            }
        }
    }

    /// Record that a `ping` was just sent.
    pub fn record_ping_sent(&mut self, at: Instant) {
        self.heartbeat.record_ping_sent(at);
    }

    /// Record that a `pong` was just received.
    pub fn record_pong_received(&mut self, at: Instant) {
        self.heartbeat.record_pong_received(at);
    }

    /// Whether this session should be considered dead at `now`
    /// (§4.5 "Heartbeat and timeout").
    pub fn is_dead(&self, now: Instant) -> bool {
        self.heartbeat.is_dead(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uic_delta::SchemaDelta;
    use uic_ir::{Node, NodeId, NodeKind};

    #[test]
    fn flush_with_nothing_pending_returns_none() {
        let mut session = Session::new("s1", "c1", 0);
        assert!(session.flush(0, true).is_none());
    }

    #[test]
    fn flush_assigns_increasing_sequence_numbers() {
        let mut session = Session::new("s1", "c1", 10);
        session.queue_edit(PendingEdit::Incremental(SchemaDelta {
            added: vec![Node::new("a", NodeKind::View)],
            modified: vec![],
            removed: vec![],
        }));
        let msg = session.flush(0, true).unwrap();
        match msg {
            Message::Update { sequence, .. } => assert_eq!(sequence, 10),
            other => panic!("expected Update, got {other:?}"),
        }

        session.queue_edit(PendingEdit::Incremental(SchemaDelta {
            added: vec![],
            modified: vec![],
            removed: vec![NodeId::new("a")],
        }));
        let msg2 = session.flush(0, true).unwrap();
        match msg2 {
            Message::Update { sequence, .. } => assert_eq!(sequence, 11),
            other => panic!("expected Update, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn a_flushed_update_round_trips_through_an_in_memory_transport() {
        let mut session = Session::new("s1", "c1", 0);
        session.queue_edit(PendingEdit::Incremental(SchemaDelta {
            added: vec![Node::new("a", NodeKind::View)],
            modified: vec![],
            removed: vec![],
        }));
        let message = session.flush(0, true).unwrap();

        let (mut client, mut server) = uic_test_utils::duplex_pair(4);
        assert!(server.send(message.clone()).await);
        let received = client.recv().await.unwrap();
        match received {
            Message::Update { sequence, .. } => assert_eq!(sequence, 0),
            other => panic!("expected Update, got {other:?}"),
        }
    }

    #[test]
    fn negative_ack_forces_full_resend() {
        let mut session = Session::new("s1", "c1", 0);
        let ir = uic_ir::Ir::new(
            semver::Version::new(1, 0, 0),
            uic_ir::IrMetadata::new(uic_ir::SourceLanguage::JsxTs, "x.tsx", "2026-01-01T00:00:00Z"),
        );
        session.queue_edit(PendingEdit::Full(Box::new(ir)));
        let first = session.flush(0, true).unwrap();
        let sequence = match first {
            Message::Update { sequence, .. } => sequence,
            _ => unreachable!(),
        };

        session.handle_ack(sequence, false, Some("renderer exploded"));
        assert!(session.has_pending());
        let resend = session.flush(0, true).unwrap();
        assert!(matches!(
            resend,
            Message::Update {
                payload: UpdatePayload::Full { .. },
                ..
            }
        ));
    }

    #[test]
    fn fatal_error_terminates_session() {
        let session = Session::new("s1", "c1", 0);
        assert!(session.handle_error(Severity::Fatal, "boom").is_err());
        assert!(session.handle_error(Severity::Warning, "meh").is_ok());
    }
}
