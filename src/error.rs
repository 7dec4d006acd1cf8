//! Startup errors that stop the appliance from serving any control surface.

use thiserror::Error;

use crate::audio::EngineError;
use crate::library::ScanError;

#[derive(Debug, Error)]
pub enum Error {
    /// The storage volume could not be scanned.
    #[error("playlist scan failed: {0}")]
    Scan(#[from] ScanError),

    /// The audio output did not come up.
    #[error("audio engine init failed: {0}")]
    Engine(#[from] EngineError),
}

pub type Result<T> = std::result::Result<T, Error>;
