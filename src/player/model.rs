//! Player state machine: `Player` and `PlaybackState`.
//!
//! The player owns the playlist, the engine and the current position in the
//! playlist. Every operation runs to completion on the caller's thread; the
//! only state shared with other threads is the engine's finished flag.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::audio::{EngineError, FinishedSignal, PlaybackEngine};
use crate::config::{AudioSettings, LoadFailurePolicy, PlaybackSettings};
use crate::library::Playlist;

/// The playback state of the player as seen from the control surface.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// The playlist is empty; every playback operation is a no-op.
    #[default]
    Idle,
    Stopped,
    Playing,
    /// Stopped with a resumable offset.
    Paused,
}

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("track {index} ({}) failed to load: {source}", .path.display())]
    Load {
        index: usize,
        path: PathBuf,
        #[source]
        source: EngineError,
    },

    #[error("no track could be started after {attempts} attempts")]
    NoPlayableTrack { attempts: usize },
}

pub struct Player<E: PlaybackEngine> {
    playlist: Playlist,
    engine: E,
    finished: FinishedSignal,

    current_index: usize,
    paused_offset: Option<u64>,
    volume_percent: u8,
    last_error: Option<String>,

    engine_volume_max: u8,
    load_failure: LoadFailurePolicy,
}

impl<E: PlaybackEngine> Player<E> {
    /// Create a player over `playlist` and put the engine at the initial
    /// volume. `finished` must be the signal whose notifier was handed to
    /// `engine`.
    pub fn new(
        playlist: Playlist,
        mut engine: E,
        finished: FinishedSignal,
        audio: &AudioSettings,
        playback: &PlaybackSettings,
    ) -> Self {
        let volume_percent = audio.initial_volume.min(100);
        engine.set_output_level(engine_level(volume_percent, audio.engine_volume_max));

        Self {
            playlist,
            engine,
            finished,
            current_index: 0,
            paused_offset: None,
            volume_percent,
            last_error: None,
            engine_volume_max: audio.engine_volume_max,
            load_failure: playback.load_failure,
        }
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn track_count(&self) -> usize {
        self.playlist.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn paused_offset(&self) -> Option<u64> {
        self.paused_offset
    }

    pub fn volume(&self) -> u8 {
        self.volume_percent
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.engine.is_active()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn titles(&self) -> Vec<String> {
        self.playlist.titles()
    }

    pub fn state(&self) -> PlaybackState {
        if self.playlist.is_empty() {
            PlaybackState::Idle
        } else if self.paused_offset.is_some() {
            PlaybackState::Paused
        } else if self.engine.is_active() {
            PlaybackState::Playing
        } else {
            PlaybackState::Stopped
        }
    }

    /// Resume from the paused offset, start the current track, or un-hold
    /// an engine that is already active.
    pub fn play(&mut self) -> Result<(), PlayerError> {
        if self.playlist.is_empty() {
            return Ok(());
        }

        if let Some(offset) = self.paused_offset {
            debug!(index = self.current_index, offset, "resuming from pause");
            self.load(self.current_index, offset)
        } else if !self.engine.is_active() {
            self.load(self.current_index, 0)
        } else {
            self.engine.resume();
            Ok(())
        }
    }

    /// Stop output and remember where it stopped. No-op when nothing plays.
    pub fn pause(&mut self) {
        if !self.engine.is_active() {
            return;
        }

        let offset = self.engine.current_offset();
        self.engine.stop();
        // Stopping a stream can look like end-of-stream to the engine.
        self.finished.clear();
        self.paused_offset = Some(offset);
        debug!(index = self.current_index, offset, "paused");
    }

    pub fn play_next(&mut self) -> Result<(), PlayerError> {
        let n = self.playlist.len();
        if n == 0 {
            return Ok(());
        }
        self.load((self.current_index + 1) % n, 0)
    }

    pub fn play_previous(&mut self) -> Result<(), PlayerError> {
        let n = self.playlist.len();
        if n == 0 {
            return Ok(());
        }
        self.load((self.current_index + n - 1) % n, 0)
    }

    /// Play the track at `index`, wrapping out-of-range and negative indices.
    pub fn select_track(&mut self, index: i64) -> Result<(), PlayerError> {
        let n = self.playlist.len();
        if n == 0 {
            return Ok(());
        }
        self.load(normalize_index(index, n), 0)
    }

    /// Clamp `percent` to 0..=100 and forward it on the engine's scale.
    pub fn set_volume(&mut self, percent: i32) {
        let clamped = percent.clamp(0, 100) as u8;
        let level = engine_level(clamped, self.engine_volume_max);
        self.engine.set_output_level(level);
        self.volume_percent = clamped;
        info!(
            volume = clamped,
            level,
            max = self.engine_volume_max,
            "volume set"
        );
    }

    /// One polling-loop iteration: pump the engine, then advance once if it
    /// reported end-of-track. Returns whether an advance happened.
    pub fn tick(&mut self) -> Result<bool, PlayerError> {
        self.engine.pump();

        if !self.finished.take() {
            return Ok(false);
        }
        if self.playlist.is_empty() {
            return Ok(false);
        }

        info!(index = self.current_index, "track finished, advancing");
        self.play_next()?;
        Ok(true)
    }

    fn load(&mut self, index: usize, offset: u64) -> Result<(), PlayerError> {
        match self.start_at(index, offset) {
            Ok(()) => Ok(()),
            Err(err) => self.on_load_failure(index, err),
        }
    }

    fn start_at(&mut self, index: usize, offset: u64) -> Result<(), EngineError> {
        self.current_index = index;
        if self.engine.is_active() {
            self.engine.stop();
        }
        self.finished.clear();
        self.paused_offset = None;

        let Some(track) = self.playlist.track(index) else {
            return Ok(());
        };
        let path = track.path.clone();
        self.engine.start(&path, offset)?;

        self.last_error = None;
        info!(index, path = %path.display(), offset, "playing");
        Ok(())
    }

    fn on_load_failure(&mut self, index: usize, err: EngineError) -> Result<(), PlayerError> {
        error!(index, error = %err, "track failed to load");
        self.last_error = Some(err.to_string());

        match self.load_failure {
            LoadFailurePolicy::Stall => Ok(()),
            LoadFailurePolicy::Halt => Err(PlayerError::Load {
                index,
                path: self.track_path(index),
                source: err,
            }),
            LoadFailurePolicy::Skip => {
                let n = self.playlist.len();
                for step in 1..n {
                    let candidate = (index + step) % n;
                    match self.start_at(candidate, 0) {
                        Ok(()) => return Ok(()),
                        Err(e) => {
                            warn!(index = candidate, error = %e, "skipping unplayable track");
                            self.last_error = Some(e.to_string());
                        }
                    }
                }
                self.current_index = index;
                Err(PlayerError::NoPlayableTrack { attempts: n })
            }
        }
    }

    fn track_path(&self, index: usize) -> PathBuf {
        self.playlist
            .track(index)
            .map(|t| t.path.clone())
            .unwrap_or_default()
    }
}

/// `((index % n) + n) % n` for any signed index. `n` must be non-zero.
pub fn normalize_index(index: i64, n: usize) -> usize {
    index.rem_euclid(n as i64) as usize
}

/// Linear percent -> engine scale mapping with integer truncation.
pub fn engine_level(percent: u8, engine_max: u8) -> u8 {
    (u32::from(percent.min(100)) * u32::from(engine_max) / 100) as u8
}
