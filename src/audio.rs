//! Playback: the transport state machine and its audio backend.
//!
//! `PlaybackEngine` owns at most one `OutputHandle` at a time and talks to
//! the device only through the `AudioBackend` trait. `RodioBackend` is the
//! production implementation.

mod backend;
mod engine;
mod sink;
mod types;

pub use backend::{AudioBackend, CompletionCallback, OutputHandle};
pub use engine::PlaybackEngine;
pub use sink::RodioBackend;
pub use types::{PlaybackEvent, SubscriptionId, TransportState};
