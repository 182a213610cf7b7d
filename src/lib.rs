//! Core of a desktop audio-file player.
//!
//! - [`library`]: read tags from audio files and group tracks into albums.
//! - [`audio`]: the playback transport state machine over a pluggable backend.
//! - [`config`]: layered settings (defaults, TOML file, environment).

pub mod audio;
pub mod config;
pub mod error;
pub mod library;

pub use audio::{PlaybackEngine, PlaybackEvent, TransportState};
pub use error::{MetadataError, PlaybackError};
pub use library::{Album, MetadataReader, Track, format_mm_ss, group_into_albums};
