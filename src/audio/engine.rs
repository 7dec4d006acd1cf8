use std::path::Path;

use super::types::EngineError;

/// Boundary to the decode/output engine.
///
/// Offsets are positions inside the current track in the engine's own unit
/// (`RodioEngine` uses milliseconds of decoded audio); the player only stores
/// them and hands them back to `start`. An engine reports
/// end-of-stream through the `FinishedNotifier` it was constructed with;
/// `pump` must return within a bounded time since the whole control surface
/// waits on it.
pub trait PlaybackEngine {
    /// Open `path` and start output from `offset`.
    fn start(&mut self, path: &Path, offset: u64) -> Result<(), EngineError>;

    /// Stop output and release the current stream. No-op when idle.
    fn stop(&mut self);

    fn is_active(&self) -> bool;

    /// Position reached in the current stream, 0 when idle.
    fn current_offset(&self) -> u64;

    /// Resume a stream that is loaded but held by the engine itself.
    fn resume(&mut self);

    /// Output level on the engine's native scale.
    fn set_output_level(&mut self, level: u8);

    /// Do one slice of engine work and detect end-of-stream.
    fn pump(&mut self);
}
