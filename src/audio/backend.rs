//! The narrow interface the engine uses to reach decode and output.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::error::PlaybackError;

/// Invoked by the backend, on a thread it owns, when a started stream runs
/// out of samples.
pub type CompletionCallback = Arc<dyn Fn() + Send + Sync>;

/// Owns the output device and opens one decode/output handle per file.
pub trait AudioBackend {
    /// Open `path` for playback. The returned handle starts out halted at
    /// position zero and calls `on_complete` at most once per `start`.
    fn open(
        &mut self,
        path: &Path,
        on_complete: CompletionCallback,
    ) -> Result<Box<dyn OutputHandle>, PlaybackError>;
}

/// One decoded file bound to the output device. Dropping it releases both.
pub trait OutputHandle: Send {
    fn duration(&self) -> Duration;
    fn start(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    /// Halt output and rewind to zero, keeping the file bound.
    fn stop(&mut self);
    fn set_volume(&mut self, volume: f32);
    fn seek(&mut self, position: Duration) -> Result<(), PlaybackError>;
    fn position(&self) -> Duration;
}
