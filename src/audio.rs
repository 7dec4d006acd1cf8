//! Playback engine boundary.
//!
//! The player drives any [`PlaybackEngine`]; [`RodioEngine`] is the one used
//! by the binary. End-of-track reaches the player through the
//! [`FinishedNotifier`] each engine is constructed with.

mod engine;
mod rodio_engine;
mod types;

pub use engine::PlaybackEngine;
pub use rodio_engine::RodioEngine;
pub use types::{EngineError, FinishedNotifier, FinishedSignal};

#[cfg(test)]
pub(crate) mod testing;
