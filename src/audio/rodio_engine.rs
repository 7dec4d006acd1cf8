//! `PlaybackEngine` over the host's default audio output via `rodio`.
//!
//! Decoding and mixing run on rodio's own thread; `pump` only polls for
//! end-of-stream, so it never blocks the polling loop. Offsets are
//! milliseconds of decoded audio from the start of the track.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::{debug, info};

use crate::config::AudioSettings;

use super::engine::PlaybackEngine;
use super::types::{EngineError, FinishedNotifier};

pub(super) type FileDecoder = Decoder<BufReader<File>>;

/// Decode `path` from its header, then move `offset_ms` into the stream.
pub(super) fn decode_at(path: &Path, offset_ms: u64) -> Result<FileDecoder, EngineError> {
    let open_err = |source: io::Error| EngineError::Open {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(open_err)?;
    let len = file.metadata().map_err(open_err)?.len();

    let mut builder = Decoder::builder()
        .with_data(BufReader::new(file))
        .with_byte_len(len)
        .with_seekable(true);
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        builder = builder.with_hint(&ext.to_ascii_lowercase());
    }

    let mut decoder = builder.build().map_err(|e| EngineError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if offset_ms > 0 {
        decoder
            .try_seek(Duration::from_millis(offset_ms))
            .map_err(|e| EngineError::Seek {
                path: path.to_path_buf(),
                offset_ms,
                reason: e.to_string(),
            })?;
    }
    Ok(decoder)
}

pub struct RodioEngine {
    stream: OutputStream,
    sink: Option<Sink>,
    /// Where the current sink started, in milliseconds into the track.
    start_ms: u64,
    notifier: FinishedNotifier,
    level_max: u8,
    level: u8,
}

impl RodioEngine {
    /// Open the default output device. Failure here is the appliance's
    /// "codec did not come up" condition.
    pub fn open(notifier: FinishedNotifier, settings: &AudioSettings) -> Result<Self, EngineError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| EngineError::Output(e.to_string()))?;
        // rodio logs to stderr when the stream is dropped; the status stream
        // shares the terminal.
        stream.log_on_drop(false);

        info!("audio output ready");
        Ok(Self {
            stream,
            sink: None,
            start_ms: 0,
            notifier,
            level_max: settings.engine_volume_max.max(1),
            level: 0,
        })
    }

    fn volume(&self) -> f32 {
        f32::from(self.level) / f32::from(self.level_max)
    }
}

impl PlaybackEngine for RodioEngine {
    fn start(&mut self, path: &Path, offset: u64) -> Result<(), EngineError> {
        self.stop();

        let source = decode_at(path, offset)?;
        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(self.volume());
        sink.append(source);
        self.start_ms = offset;
        self.sink = Some(sink);

        debug!(path = %path.display(), offset_ms = offset, "engine started");
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn is_active(&self) -> bool {
        self.sink.is_some()
    }

    fn current_offset(&self) -> u64 {
        self.sink.as_ref().map_or(0, |sink| {
            let played = u64::try_from(sink.get_pos().as_millis()).unwrap_or(u64::MAX);
            self.start_ms.saturating_add(played)
        })
    }

    fn resume(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.play();
        }
    }

    fn set_output_level(&mut self, level: u8) {
        self.level = level.min(self.level_max);
        if let Some(sink) = self.sink.as_ref() {
            sink.set_volume(self.volume());
        }
    }

    fn pump(&mut self) {
        let drained = self
            .sink
            .as_ref()
            .is_some_and(|s| !s.is_paused() && s.empty());
        if drained {
            self.sink = None;
            debug!("end of stream");
            self.notifier.raise();
        }
    }
}
