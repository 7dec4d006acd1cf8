//! Audio-related small types and handles.
//!
//! This module defines the end-of-track signal shared between the engine and
//! the player, and the errors an engine can report.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("audio output unavailable: {0}")]
    Output(String),

    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("failed to seek {} to {offset_ms} ms: {reason}", .path.display())]
    Seek {
        path: PathBuf,
        offset_ms: u64,
        reason: String,
    },
}

/// Edge-triggered "track finished" flag owned by the player.
///
/// The engine gets a [`FinishedNotifier`] at construction time and raises it
/// from whatever thread notices end-of-stream. The player consumes it with a
/// single atomic test-and-clear.
#[derive(Debug, Default)]
pub struct FinishedSignal {
    flag: Arc<AtomicBool>,
}

impl FinishedSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifier(&self) -> FinishedNotifier {
        FinishedNotifier {
            flag: self.flag.clone(),
        }
    }

    /// Returns whether the flag was set, clearing it in the same operation.
    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::AcqRel)
    }

    pub fn clear(&self) {
        self.flag.store(false, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Completion-notification target handed to an engine.
#[derive(Debug, Clone)]
pub struct FinishedNotifier {
    flag: Arc<AtomicBool>,
}

impl FinishedNotifier {
    pub fn raise(&self) {
        self.flag.store(true, Ordering::Release);
    }
}
