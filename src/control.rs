//! Control surface: the command vocabulary shared by every front end and the
//! sinks that carry status updates back out.
//!
//! Front ends (the stdin reader here, a web layer elsewhere) turn requests
//! into [`ControlCmd`]s and send them to the polling loop over a channel.
//! After each command the loop publishes an `audio_state` event through a
//! [`StatusSink`].

use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::{debug, warn};

/// Event name browsers subscribe to for player state.
pub const AUDIO_STATE_EVENT: &str = "audio_state";
/// Event carrying `{"playlist": [...]}`.
pub const PLAYLIST_EVENT: &str = "playlist";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Play,
    Pause,
    Next,
    Previous,
    /// Jump to a playlist index; any integer is accepted and wrapped.
    Select(i64),
    /// Volume in percent; clamped by the player.
    Volume(i32),
    /// Re-publish the current state without changing anything.
    Status,
    /// Publish the playlist titles.
    Playlist,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("missing {param} parameter for {action}")]
    MissingArgument {
        action: &'static str,
        param: &'static str,
    },

    #[error("invalid {param} value {value:?} for {action}")]
    InvalidArgument {
        action: &'static str,
        param: &'static str,
        value: String,
    },
}

fn parse_arg<T: FromStr>(
    arg: Option<&str>,
    action: &'static str,
    param: &'static str,
) -> Result<T, ParseCommandError> {
    let raw = arg.ok_or(ParseCommandError::MissingArgument { action, param })?;
    raw.parse::<T>()
        .map_err(|_| ParseCommandError::InvalidArgument {
            action,
            param,
            value: raw.to_string(),
        })
}

impl FromStr for ControlCmd {
    type Err = ParseCommandError;

    /// Parse `"<action> [arg]"`, e.g. `"next"`, `"select 3"`, `"volume 80"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let action = parts.next().ok_or(ParseCommandError::Empty)?;
        let arg = parts.next();

        match action.to_ascii_lowercase().as_str() {
            "play" => Ok(Self::Play),
            "pause" => Ok(Self::Pause),
            "next" => Ok(Self::Next),
            "previous" | "prev" => Ok(Self::Previous),
            "select" | "selecttrack" | "track" => {
                parse_arg(arg, "select", "index").map(Self::Select)
            }
            "volume" | "vol" => parse_arg(arg, "volume", "volume").map(Self::Volume),
            "status" | "state" => Ok(Self::Status),
            "playlist" | "list" => Ok(Self::Playlist),
            "quit" | "exit" => Ok(Self::Quit),
            _ => Err(ParseCommandError::UnknownAction(action.to_string())),
        }
    }
}

/// Destination for status events (SSE stream, websocket, stdout...).
pub trait StatusSink {
    fn publish(&mut self, event: &str, payload: &str);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusEvent {
    pub event: String,
    pub data: String,
}

/// Hands events to another thread, e.g. a web server's SSE broadcaster.
pub struct ChannelSink {
    tx: Sender<StatusEvent>,
}

impl ChannelSink {
    pub fn new(tx: Sender<StatusEvent>) -> Self {
        Self { tx }
    }
}

impl StatusSink for ChannelSink {
    fn publish(&mut self, event: &str, payload: &str) {
        let sent = self.tx.send(StatusEvent {
            event: event.to_string(),
            data: payload.to_string(),
        });
        if sent.is_err() {
            debug!(event, "status subscriber gone");
        }
    }
}

/// Writes events in server-sent-events framing.
pub struct SseSink<W: Write> {
    out: W,
}

impl<W: Write> SseSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StatusSink for SseSink<W> {
    fn publish(&mut self, event: &str, payload: &str) {
        let written = write!(self.out, "event: {event}\ndata: {payload}\n\n")
            .and_then(|_| self.out.flush());
        if let Err(e) = written {
            warn!(event, error = %e, "failed to write status event");
        }
    }
}

/// Read one command per line from `input` and forward it to the polling loop.
///
/// Unparseable lines are logged and dropped. The thread ends at end of input
/// or when the loop stops listening; neither stops playback.
pub fn spawn_line_reader<R>(input: R, tx: Sender<ControlCmd>) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in input.lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    warn!(error = %e, "control input closed");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<ControlCmd>() {
                Ok(cmd) => {
                    if tx.send(cmd).is_err() {
                        break;
                    }
                }
                Err(e) => warn!(input = %line.trim(), error = %e, "ignoring control line"),
            }
        }
    })
}

pub fn spawn_stdin_reader(tx: Sender<ControlCmd>) -> JoinHandle<()> {
    spawn_line_reader(io::BufReader::new(io::stdin()), tx)
}
