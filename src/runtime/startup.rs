use tracing::{error, info};

use crate::audio::PlaybackEngine;
use crate::config;
use crate::control::{AUDIO_STATE_EVENT, PLAYLIST_EVENT, StatusSink};
use crate::player::Player;

/// Apply boot-time defaults and announce the initial state.
pub fn apply_playback_defaults<E: PlaybackEngine, S: StatusSink>(
    player: &mut Player<E>,
    settings: &config::Settings,
    sink: &mut S,
) {
    let playlist = player.playlist();
    if playlist.is_empty() {
        info!("no tracks found, idling");
    } else {
        info!("playlist ({} tracks):\n{}", playlist.len(), playlist.describe());
    }

    if settings.playback.autoplay {
        if let Err(e) = player.play() {
            error!(error = %e, "autoplay failed");
        }
    }

    sink.publish(PLAYLIST_EVENT, &player.playlist().to_json());
    sink.publish(AUDIO_STATE_EVENT, &player.snapshot().to_json());
}
