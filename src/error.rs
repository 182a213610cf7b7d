//! Error types shared by the library and playback components.
//!
//! Components never surface these to their public callers directly: the
//! reader maps them to `None` and the engine maps them to `false`. The
//! `try_*` variants expose them for callers that want the detail.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading tags from a single audio file.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// The path does not exist or is not a regular file.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file extension is outside the supported set.
    #[error("unsupported file type: {}", .0.display())]
    Unsupported(PathBuf),

    /// The tag backend could not parse the file.
    #[error("failed to read tags from {}: {source}", path.display())]
    Tag {
        path: PathBuf,
        #[source]
        source: lofty::error::LoftyError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures from the playback engine or its audio backend.
#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The decoder rejected the stream.
    #[error("decode error: {0}")]
    Decode(String),

    /// The output device could not be opened.
    #[error("audio device error: {0}")]
    Device(String),

    #[error("seek error: {0}")]
    Seek(String),

    /// The engine has already been torn down.
    #[error("playback engine has been disposed")]
    Disposed,
}
