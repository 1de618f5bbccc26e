//! Live-update transport: session handshake, message framing, sequencing,
//! batching, heartbeat and reconnection (§4.5, §6).

pub mod batch;
pub mod error;
pub mod heartbeat;
pub mod message;
pub mod reconnect;
pub mod sequencer;
pub mod session;
pub mod state;
pub mod transport;

pub use batch::{Batcher, PendingEdit, DEFAULT_BATCH_WINDOW};
pub use error::{Result, SessionError};
pub use heartbeat::{Heartbeat, PING_INTERVAL, PONG_TIMEOUT};
pub use message::{Message, Severity, UpdatePayload};
pub use reconnect::{Backoff, ReconnectFailure, BASE_DELAY, CAP, FACTOR};
pub use sequencer::{coalesce, is_contiguous, SequenceAssigner, SequenceGate};
pub use session::{new_connection_id, now_timestamp_ms, Session};
pub use state::{NodeState, RendererState};
pub use transport::BatchDriver;
