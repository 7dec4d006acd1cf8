//! Playlist and playback coordination for a small SD-card audio appliance.
//!
//! The storage scan produces a [`library::Playlist`], the [`player::Player`]
//! state machine drives a [`audio::PlaybackEngine`], and the
//! [`runtime`] polling loop ties them to the [`control`] surface.

pub mod audio;
pub mod config;
pub mod control;
pub mod error;
pub mod library;
pub mod player;
pub mod runtime;
