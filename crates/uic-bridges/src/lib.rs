//! Semantic bridges translating the IR's cross-cutting schemas — state,
//! navigation, animation, network, and platform — into each dialect's
//! idiom (§4.3).

pub mod animation;
pub mod error;
pub mod navigation;
pub mod network;
pub mod platform;
pub mod state;

pub use error::{BridgeError, Result};
