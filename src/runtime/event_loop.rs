use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::audio::PlaybackEngine;
use crate::config::RuntimeSettings;
use crate::control::{AUDIO_STATE_EVENT, ControlCmd, PLAYLIST_EVENT, StatusSink};
use crate::player::{Player, PlayerError};

/// Counters kept across loop iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    pub ticks: u64,
    pub commands: u64,
    pub advances: u64,
}

/// Main polling loop: applies queued control commands, pumps the engine and
/// auto-advances finished tracks. Returns when `ControlCmd::Quit` arrives or
/// every command sender is gone.
pub fn run<E: PlaybackEngine, S: StatusSink>(
    player: &mut Player<E>,
    control_rx: &Receiver<ControlCmd>,
    sink: &mut S,
    settings: &RuntimeSettings,
    state: &mut EventLoopState,
) {
    let interval = Duration::from_millis(settings.tick_interval_ms);

    loop {
        loop {
            match control_rx.try_recv() {
                Ok(cmd) => {
                    state.commands += 1;
                    if handle_control_cmd(cmd, player, sink) {
                        info!("quit requested");
                        return;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    info!("control channel closed");
                    return;
                }
            }
        }

        if step(player, sink) {
            state.advances += 1;
        }
        state.ticks += 1;

        if !interval.is_zero() {
            thread::sleep(interval);
        }
    }
}

/// One tick of the player; publishes state when the track changed or failed.
/// Returns whether the tick advanced to another track.
pub fn step<E: PlaybackEngine, S: StatusSink>(player: &mut Player<E>, sink: &mut S) -> bool {
    match player.tick() {
        Ok(false) => false,
        Ok(true) => {
            publish_state(player, sink);
            true
        }
        Err(e) => {
            error!(error = %e, "auto-advance failed");
            publish_state(player, sink);
            false
        }
    }
}

fn publish_state<E: PlaybackEngine, S: StatusSink>(player: &Player<E>, sink: &mut S) {
    sink.publish(AUDIO_STATE_EVENT, &player.snapshot().to_json());
}

fn report(result: Result<(), PlayerError>, action: &str) {
    if let Err(e) = result {
        error!(action, error = %e, "control action failed");
    }
}

/// Apply one command. Returns `true` when the loop should stop.
pub fn handle_control_cmd<E: PlaybackEngine, S: StatusSink>(
    cmd: ControlCmd,
    player: &mut Player<E>,
    sink: &mut S,
) -> bool {
    debug!(?cmd, "control command");

    match cmd {
        ControlCmd::Quit => {
            player.pause();
            return true;
        }
        ControlCmd::Play => report(player.play(), "play"),
        ControlCmd::Pause => player.pause(),
        ControlCmd::Next => report(player.play_next(), "next"),
        ControlCmd::Previous => report(player.play_previous(), "previous"),
        ControlCmd::Select(index) => report(player.select_track(index), "select"),
        ControlCmd::Volume(percent) => player.set_volume(percent),
        ControlCmd::Status => {}
        ControlCmd::Playlist => {
            sink.publish(PLAYLIST_EVENT, &player.playlist().to_json());
            return false;
        }
    }

    publish_state(player, sink);
    false
}
