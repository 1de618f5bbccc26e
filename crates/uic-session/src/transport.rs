//! Async driver for the batching window (§4.5 "Batching", §5 "Suspension
//! points": "Transport tasks suspend on: ... batching timer").

use std::time::Duration;

use tokio::sync::mpsc;

use crate::batch::{Batcher, PendingEdit, DEFAULT_BATCH_WINDOW};
use crate::message::UpdatePayload;

/// Drives a [`Batcher`] against a timer: edits arriving on `edits` are
/// accumulated until either the batching window elapses or an edit is
/// marked `immediate`, at which point the merged payload is sent on `emit`.
pub struct BatchDriver {
    window: Duration,
}

impl Default for BatchDriver {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_WINDOW)
    }
}

impl BatchDriver {
    /// Build a driver using a custom batching window.
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    /// Run until `edits` is closed, then flush any remainder and return.
    pub async fn run(
        &self,
        mut edits: mpsc::Receiver<(PendingEdit, bool)>,
        emit: mpsc::Sender<UpdatePayload>,
    ) {
        let mut batcher = Batcher::new();
        loop {
            let deadline = tokio::time::sleep(self.window);
            tokio::pin!(deadline);

            tokio::select! {
                received = edits.recv() => {
                    match received {
                        Some((edit, immediate)) => {
                            batcher.push(edit);
                            if immediate {
                                if let Some(payload) = batcher.take() {
                                    if emit.send(payload).await.is_err() {
                                        return;
                                    }
                                }
                            }
                        }
                        None => break,
                    }
                }
                () = &mut deadline, if !batcher.is_empty() => {
                    if let Some(payload) = batcher.take() {
                        if emit.send(payload).await.is_err() {
                            return;
                        }
                    }
                }
            }
        }

        if let Some(payload) = batcher.take() {
            let _ = emit.send(payload).await;
        }
    }
}
