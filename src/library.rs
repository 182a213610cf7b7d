//! Track metadata extraction and album grouping.
//!
//! `MetadataReader` turns audio files into `Track` records through a
//! `TagReader` backend, and `group_into_albums` folds those records into
//! `Album`s for browsing.

mod album;
mod group;
mod model;
mod reader;
mod tags;

pub use album::Album;
pub use group::group_into_albums;
pub use model::{Track, format_mm_ss};
pub use reader::{MetadataReader, SUPPORTED_EXTENSIONS, is_supported};
pub use tags::{LoftyTagReader, RawTags, TagReader};
