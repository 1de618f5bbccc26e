//! Process-wide session registry (§5 "Session registry").
//!
//! The registry itself is only a directory: a mutex-guarded map from
//! session id to a lightweight handle used to route inbound frames to the
//! task that owns the session. The [`uic_session::Session`] state machine
//! is never stored here, so no lock is ever held across the suspension
//! points (frame read/write, timers) that owning task goes through.

use std::collections::HashMap;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use uic_session::Message;

/// A routable handle to a running session's owning task.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    /// The connection id assigned at handshake.
    pub connection_id: String,
    /// Channel into the session's single reader task.
    pub inbound: mpsc::Sender<Message>,
}

/// Process-wide directory of live sessions, keyed by session id.
#[derive(Default)]
pub struct SessionRegistry {
    handles: Mutex<HashMap<String, SessionHandle>>,
}

impl SessionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session's handle, replacing and returning any prior
    /// handle registered under the same id.
    pub fn insert(&self, session_id: impl Into<String>, handle: SessionHandle) -> Option<SessionHandle> {
        self.handles.lock().insert(session_id.into(), handle)
    }

    /// Remove a session from the registry, returning its handle if present.
    pub fn remove(&self, session_id: &str) -> Option<SessionHandle> {
        self.handles.lock().remove(session_id)
    }

    /// Fetch a clone of a session's handle, if it is currently registered.
    pub fn get(&self, session_id: &str) -> Option<SessionHandle> {
        self.handles.lock().get(session_id).cloned()
    }

    /// Number of sessions currently registered.
    pub fn len(&self) -> usize {
        self.handles.lock().len()
    }

    /// Whether no sessions are currently registered.
    pub fn is_empty(&self) -> bool {
        self.handles.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(connection_id: &str) -> SessionHandle {
        let (tx, _rx) = mpsc::channel(1);
        SessionHandle {
            connection_id: connection_id.to_string(),
            inbound: tx,
        }
    }

    #[test]
    fn insert_then_get_roundtrips() {
        let registry = SessionRegistry::new();
        registry.insert("s1", handle("c1"));
        assert_eq!(registry.get("s1").unwrap().connection_id, "c1");
    }

    #[test]
    fn remove_drops_the_entry() {
        let registry = SessionRegistry::new();
        registry.insert("s1", handle("c1"));
        assert!(registry.remove("s1").is_some());
        assert!(registry.get("s1").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn reinserting_returns_the_prior_handle() {
        let registry = SessionRegistry::new();
        registry.insert("s1", handle("c1"));
        let prior = registry.insert("s1", handle("c2"));
        assert_eq!(prior.unwrap().connection_id, "c1");
        assert_eq!(registry.get("s1").unwrap().connection_id, "c2");
    }
}
