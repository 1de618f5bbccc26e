//! Sequence number assignment and client-side in-order application
//! (§4.5 "Sequencing").

use indexmap::{IndexMap, IndexSet};
use uic_delta::SchemaDelta;
use uic_ir::{Node, NodeId};

/// Server-side monotonic sequence counter for a single session.
#[derive(Debug)]
pub struct SequenceAssigner {
    next: u64,
}

impl SequenceAssigner {
    /// Start a new assigner, the next call to [`Self::next`] returns `base`.
    pub fn new(base: u64) -> Self {
        Self { next: base }
    }

    /// Assign and return the next sequence number.
    pub fn next(&mut self) -> u64 {
        let seq = self.next;
        self.next += 1;
        seq
    }

    /// The sequence number that would be assigned next, without consuming
    /// it.
    pub fn peek_next(&self) -> u64 {
        self.next
    }
}

/// Client-side gate enforcing in-order application of updates.
///
/// The client must apply updates in sequence; this only tracks the
/// expectation, it does not hold the updates themselves (see [`coalesce`]
/// for combining a run of pending incremental updates).
#[derive(Debug)]
pub struct SequenceGate {
    expected: u64,
}

impl SequenceGate {
    /// Construct a gate expecting `base` as the first sequence number.
    pub fn new(base: u64) -> Self {
        Self { expected: base }
    }

    /// The sequence number this gate is currently expecting.
    pub fn expected(&self) -> u64 {
        self.expected
    }

    /// Accept `sequence` if it is the one currently expected, advancing the
    /// gate. Returns `false` (without advancing) if `sequence` is out of
    /// order.
    pub fn accept(&mut self, sequence: u64) -> bool {
        if sequence == self.expected {
            self.expected += 1;
            true
        } else {
            false
        }
    }
}

/// Whether an incremental update at `sequence` directly follows `previous`,
/// the condition under which contiguous pending updates may be coalesced
/// (§4.5 "it may coalesce contiguous pending updates only if each is an
/// incremental delta referencing the directly preceding sequence").
pub fn is_contiguous(previous: u64, sequence: u64) -> bool {
    sequence == previous.saturating_add(1)
}

/// Merge a run of contiguous incremental deltas into a single equivalent
/// delta, as if they had been applied one after another.
///
/// A node that was `added` by an earlier delta in the run and then touched
/// again by a later `modified` in the same run stays classified as `added`,
/// since from the perspective of the state before the whole run it is still
/// a newly introduced node. A node removed earlier in the run and then
/// reintroduced later is classified as `added` (its pre-run identity was
/// already discarded).
pub fn coalesce(deltas: &[SchemaDelta]) -> SchemaDelta {
    let mut added: IndexMap<NodeId, Node> = IndexMap::new();
    let mut modified: IndexMap<NodeId, Node> = IndexMap::new();
    let mut removed: IndexSet<NodeId> = IndexSet::new();

    for delta in deltas {
        for node in &delta.added {
            removed.shift_remove(&node.id);
            added.insert(node.id.clone(), node.clone());
            modified.shift_remove(&node.id);
        }
        for node in &delta.modified {
            removed.shift_remove(&node.id);
            if added.contains_key(&node.id) {
                added.insert(node.id.clone(), node.clone());
            } else {
                modified.insert(node.id.clone(), node.clone());
            }
        }
        for id in &delta.removed {
            added.shift_remove(id);
            modified.shift_remove(id);
            removed.insert(id.clone());
        }
    }

    SchemaDelta {
        added: added.into_values().collect(),
        modified: modified.into_values().collect(),
        removed: removed.into_iter().collect(),
    }
}
