//! Small types shared by the playback engine and its callers.

use std::path::PathBuf;
use std::time::Duration;

/// Transport state of a `PlaybackEngine`.
///
/// There is no separate stopped state: a stopped engine is `Loaded` with its
/// position back at zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TransportState {
    /// No file bound.
    #[default]
    Idle,
    /// A file is bound and output is halted.
    Loaded,
    Playing,
    Paused,
}

impl TransportState {
    /// `true` while output is running or suspended mid-stream.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }
}

/// Notifications published to every subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Current position after a seek, or on each `tick` while playing.
    PositionChanged(Duration),
    /// Output halted, either by `stop` or by reaching the end of the file.
    PlaybackStopped,
    /// A new file was bound by `load`.
    FileStarted(PathBuf),
}

/// Handle returned by `PlaybackEngine::subscribe`, used to unsubscribe.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);
