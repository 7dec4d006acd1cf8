use std::path::PathBuf;

use serde::Deserialize;

/// Top-level appliance settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/jukebox/config.toml` or `~/.config/jukebox/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `JUKEBOX__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub audio: AudioSettings,
    pub playback: PlaybackSettings,
    pub runtime: RuntimeSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Volume root that the scan starts from.
    pub root: PathBuf,
    /// Directory names the scan is allowed to descend into (exact match).
    ///
    /// Every other directory below `root` is skipped without being read.
    pub music_dirs: Vec<String>,
    /// File extensions to treat as audio (case-insensitive, with or without dot).
    pub extensions: Vec<String>,
    /// Playlist capacity. Files found after the playlist is full are ignored.
    pub max_tracks: usize,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            music_dirs: vec!["Music".into()],
            extensions: vec!["mp3".into(), "wav".into()],
            max_tracks: 100,
            follow_links: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Upper bound of the engine's native volume scale.
    ///
    /// Requested percentages are mapped linearly onto `0..=engine_volume_max`.
    pub engine_volume_max: u8,
    /// Volume (percent) applied once at startup.
    pub initial_volume: u8,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            engine_volume_max: 21,
            initial_volume: 40,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Start the first track as soon as the playlist is ready.
    pub autoplay: bool,
    /// What to do when the engine cannot start a track.
    pub load_failure: LoadFailurePolicy,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            autoplay: true,
            load_failure: LoadFailurePolicy::Skip,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadFailurePolicy {
    /// Log the failure and leave playback stopped.
    #[serde(alias = "ignore")]
    Stall,
    /// Move on to the following track until one starts or every track failed.
    #[serde(alias = "skip-next", alias = "skip_next", alias = "next")]
    Skip,
    /// Report the failure to the caller and stay on the failing track.
    #[serde(alias = "stop", alias = "fail")]
    Halt,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    /// Sleep between polling loop iterations (milliseconds). 0 = never sleep.
    pub tick_interval_ms: u64,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 5,
        }
    }
}
