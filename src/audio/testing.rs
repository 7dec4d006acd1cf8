//! Recording engine for player and event-loop tests.

use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::engine::PlaybackEngine;
use super::types::{EngineError, FinishedNotifier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Start(PathBuf, u64),
    Stop,
    Resume,
    Level(u8),
}

#[derive(Default)]
pub(crate) struct FakeState {
    pub calls: Vec<Call>,
    pub active: bool,
    pub offset: u64,
    /// Paths whose `start` fails with `EngineError::Open`.
    pub failing: Vec<PathBuf>,
    /// Report end-of-stream on the next `pump` of an active stream.
    pub finish_on_pump: bool,
    /// Report end-of-stream from inside a successful `start`.
    pub finish_on_start: bool,
    /// Report end-of-stream when stopped.
    pub finish_on_stop: bool,
}

impl FakeState {
    pub fn starts(&self) -> Vec<(PathBuf, u64)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Start(p, o) => Some((p.clone(), *o)),
                _ => None,
            })
            .collect()
    }
}

pub(crate) struct FakeEngine {
    state: Rc<RefCell<FakeState>>,
    notifier: FinishedNotifier,
}

impl FakeEngine {
    pub fn new(notifier: FinishedNotifier) -> (Self, Rc<RefCell<FakeState>>) {
        let state = Rc::new(RefCell::new(FakeState::default()));
        (
            Self {
                state: state.clone(),
                notifier,
            },
            state,
        )
    }
}

impl PlaybackEngine for FakeEngine {
    fn start(&mut self, path: &Path, offset: u64) -> Result<(), EngineError> {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::Start(path.to_path_buf(), offset));
        if s.failing.iter().any(|p| p == path) {
            s.active = false;
            return Err(EngineError::Open {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "missing"),
            });
        }
        s.active = true;
        s.offset = offset;
        if s.finish_on_start {
            self.notifier.raise();
        }
        Ok(())
    }

    fn stop(&mut self) {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::Stop);
        s.active = false;
        if s.finish_on_stop {
            self.notifier.raise();
        }
    }

    fn is_active(&self) -> bool {
        self.state.borrow().active
    }

    fn current_offset(&self) -> u64 {
        let s = self.state.borrow();
        if s.active { s.offset } else { 0 }
    }

    fn resume(&mut self) {
        self.state.borrow_mut().calls.push(Call::Resume);
    }

    fn set_output_level(&mut self, level: u8) {
        self.state.borrow_mut().calls.push(Call::Level(level));
    }

    fn pump(&mut self) {
        let mut s = self.state.borrow_mut();
        if s.active && s.finish_on_pump {
            s.active = false;
            self.notifier.raise();
        }
    }
}
