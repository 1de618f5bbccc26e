//! Update batching (§4.5 "Batching"): accumulate edits within a 50 ms
//! window and emit one update carrying the net delta, unless an explicit
//! "immediate" push bypasses the window.

use std::time::Duration;

use uic_delta::SchemaDelta;
use uic_ir::Ir;

use crate::message::UpdatePayload;
use crate::sequencer::coalesce;

/// Default batching window (§4.5).
pub const DEFAULT_BATCH_WINDOW: Duration = Duration::from_millis(50);

/// An edit queued for the next batch.
#[derive(Debug, Clone)]
pub enum PendingEdit {
    /// Replaces any pending edits with a full IR.
    Full(Box<Ir>),
    /// An incremental delta, merged with any other pending deltas.
    Incremental(SchemaDelta),
}

/// Accumulates edits within the batching window.
///
/// This is the pure, synchronous half of batching: it decides what to do
/// with each incoming edit and what the net payload looks like so far. The
/// timer that decides *when* to flush lives in [`crate::session::Session`],
/// which is the async half driving this accumulator against a
/// `tokio::time::sleep`.
#[derive(Debug, Default)]
pub struct Batcher {
    pending_full: Option<Box<Ir>>,
    pending_deltas: Vec<SchemaDelta>,
}

impl Batcher {
    /// A fresh, empty batcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether there is nothing queued to flush.
    pub fn is_empty(&self) -> bool {
        self.pending_full.is_none() && self.pending_deltas.is_empty()
    }

    /// Queue an edit. A full IR supersedes any deltas accumulated so far,
    /// since it already carries their net effect.
    pub fn push(&mut self, edit: PendingEdit) {
        match edit {
            PendingEdit::Full(ir) => {
                self.pending_full = Some(ir);
                self.pending_deltas.clear();
            }
            PendingEdit::Incremental(delta) => {
                if self.pending_full.is_none() {
                    self.pending_deltas.push(delta);
                }
                // If a full IR is already pending, later deltas are already
                // reflected once that IR is (re)computed by the caller, so
                // there is nothing to merge here.
            }
        }
    }

    /// Drain the accumulated edits into a single [`UpdatePayload`], clearing
    /// the batcher. Returns `None` if nothing was queued.
    pub fn take(&mut self) -> Option<UpdatePayload> {
        if let Some(ir) = self.pending_full.take() {
            self.pending_deltas.clear();
            return Some(UpdatePayload::Full { ir });
        }
        if self.pending_deltas.is_empty() {
            return None;
        }
        let merged = coalesce(&std::mem::take(&mut self.pending_deltas));
        Some(UpdatePayload::Incremental { delta: merged })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uic_ir::{IrMetadata, Node, NodeId, NodeKind, SourceLanguage};

    fn sample_ir() -> Ir {
        Ir::new(
            semver::Version::new(1, 0, 0),
            IrMetadata::new(SourceLanguage::JsxTs, "x.tsx", "2026-01-01T00:00:00Z"),
        )
    }

    #[test]
    fn empty_batcher_yields_nothing() {
        let mut batcher = Batcher::new();
        assert!(batcher.is_empty());
        assert!(batcher.take().is_none());
    }

    #[test]
    fn deltas_coalesce_into_one_incremental_payload() {
        let mut batcher = Batcher::new();
        batcher.push(PendingEdit::Incremental(SchemaDelta {
            added: vec![Node::new("a", NodeKind::View)],
            modified: vec![],
            removed: vec![],
        }));
        batcher.push(PendingEdit::Incremental(SchemaDelta {
            added: vec![],
            modified: vec![],
            removed: vec![NodeId::new("b")],
        }));

        let payload = batcher.take().unwrap();
        match payload {
            UpdatePayload::Incremental { delta } => {
                assert_eq!(delta.added.len(), 1);
                assert_eq!(delta.removed.len(), 1);
            }
            other => panic!("expected Incremental, got {other:?}"),
        }
        assert!(batcher.is_empty());
    }

    #[test]
    fn full_ir_supersedes_pending_deltas() {
        let mut batcher = Batcher::new();
        batcher.push(PendingEdit::Incremental(SchemaDelta {
            added: vec![Node::new("a", NodeKind::View)],
            modified: vec![],
            removed: vec![],
        }));
        batcher.push(PendingEdit::Full(Box::new(sample_ir())));

        let payload = batcher.take().unwrap();
        assert!(matches!(payload, UpdatePayload::Full { .. }));
    }
}
