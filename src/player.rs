//! Player module: the playback state machine and its status projection.
//!
//! `Player` lives in `player::model` and holds the playlist, the engine and
//! the current position; `player::status` renders it for the web layer.

mod model;
mod status;

pub use model::*;
pub use status::StateSnapshot;
