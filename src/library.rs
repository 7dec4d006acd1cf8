//! Playlist store: scans a storage volume for playable files.
//!
//! The scan only descends into allow-listed directories and keeps discovery
//! order, so a playlist index always points at the same file until the next
//! scan.

mod display;
mod model;
mod scan;

pub use display::title_from_path;
pub use model::{Playlist, Track};
pub use scan::{ScanError, scan};
