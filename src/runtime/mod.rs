use std::env;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc;

use tracing::info;

use crate::audio::{FinishedSignal, RodioEngine};
use crate::control::{self, ControlCmd, SseSink};
use crate::error::Result;
use crate::library::scan;
use crate::player::Player;

mod event_loop;
mod settings;
mod startup;


pub fn run() -> Result<()> {
    let settings = settings::load_settings();

    let root = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.library.root.clone());

    let playlist = scan(&root, &settings.library)?;

    let finished = FinishedSignal::new();
    let engine = RodioEngine::open(finished.notifier(), &settings.audio)?;
    let mut player = Player::new(
        playlist,
        engine,
        finished,
        &settings.audio,
        &settings.playback,
    );

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let _reader = control::spawn_stdin_reader(control_tx.clone());

    let mut sink = SseSink::new(io::stdout());
    startup::apply_playback_defaults(&mut player, &settings, &mut sink);

    let mut state = event_loop::EventLoopState::default();
    event_loop::run(
        &mut player,
        &control_rx,
        &mut sink,
        &settings.runtime,
        &mut state,
    );
    drop(control_tx);

    info!(
        ticks = state.ticks,
        commands = state.commands,
        advances = state.advances,
        "stopped"
    );
    Ok(())
}
