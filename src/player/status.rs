use serde::Serialize;

use crate::audio::PlaybackEngine;

use super::model::Player;

/// Player state as pushed to browsers with the `audio_state` event.
///
/// `is_playing` mirrors the engine, so Paused and Stopped both read `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub track_index: usize,
    pub is_playing: bool,
    pub volume: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StateSnapshot {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl<E: PlaybackEngine> Player<E> {
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            track_index: self.current_index(),
            is_playing: self.is_playing(),
            volume: self.volume(),
            error: self.last_error().map(str::to_string),
        }
    }
}
