//! Tag backend seam.
//!
//! `MetadataReader` never talks to a tag library directly. It asks a
//! `TagReader` for the raw fields of one file and applies its own
//! normalisation on top.

use std::path::Path;
use std::time::Duration;

use lofty::prelude::{Accessor, AudioFile, ItemKey, TaggedFileExt};
use lofty::tag::Tag;

use crate::error::MetadataError;

/// Raw fields as the backend found them. Nothing is trimmed or defaulted yet.
#[derive(Debug, Clone, Default)]
pub struct RawTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub genre: Option<String>,
    pub year: Option<u32>,
    pub track_number: Option<u32>,
    pub duration: Duration,
    pub bitrate: Option<u32>,
    pub sample_rate: Option<u32>,
    pub channels: Option<u8>,
    /// Embedded pictures in the order the container stores them.
    pub pictures: Vec<Vec<u8>>,
}

pub trait TagReader: Send + Sync {
    /// Parse tags and audio properties of the file at `path`.
    fn read_tags(&self, path: &Path) -> Result<RawTags, MetadataError>;

    /// Return embedded pictures only, skipping the rest of the tag.
    fn read_pictures(&self, path: &Path) -> Result<Vec<Vec<u8>>, MetadataError> {
        self.read_tags(path).map(|t| t.pictures)
    }
}

/// `TagReader` backed by `lofty`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTagReader;

impl LoftyTagReader {
    fn open(path: &Path) -> Result<lofty::file::TaggedFile, MetadataError> {
        lofty::read_from_path(path).map_err(|source| MetadataError::Tag {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl TagReader for LoftyTagReader {
    fn read_tags(&self, path: &Path) -> Result<RawTags, MetadataError> {
        let tagged = Self::open(path)?;
        let props = tagged.properties();

        let mut raw = RawTags {
            duration: props.duration(),
            bitrate: props.audio_bitrate(),
            sample_rate: props.sample_rate(),
            channels: props.channels(),
            ..RawTags::default()
        };

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            raw.title = tag.title().map(|v| v.to_string());
            raw.artist = tag.artist().map(|v| v.to_string());
            raw.album = tag.album().map(|v| v.to_string());
            raw.album_artist = tag.get_string(&ItemKey::AlbumArtist).map(str::to_string);
            raw.genre = tag.genre().map(|v| v.to_string());
            raw.track_number = tag.track();
            raw.year = year_of(tag);
            raw.pictures = tag.pictures().iter().map(|p| p.data().to_vec()).collect();
        }

        Ok(raw)
    }

    fn read_pictures(&self, path: &Path) -> Result<Vec<Vec<u8>>, MetadataError> {
        let tagged = Self::open(path)?;
        Ok(tagged
            .primary_tag()
            .or_else(|| tagged.first_tag())
            .map(|tag| tag.pictures().iter().map(|p| p.data().to_vec()).collect())
            .unwrap_or_default())
    }
}

/// Vorbis `YEAR` and APE `Year` land under `ItemKey::Year`; ID3v2.4 `TDRC`
/// and Vorbis `DATE` under `RecordingDate`.
fn year_of(tag: &Tag) -> Option<u32> {
    tag.get_string(&ItemKey::Year)
        .and_then(parse_year)
        .or_else(|| tag.get_string(&ItemKey::RecordingDate).and_then(parse_year))
}

/// Leading four-digit year of a date string such as `"1997"` or `"1997-05-21"`.
pub(crate) fn parse_year(s: &str) -> Option<u32> {
    let digits: String = s.trim().chars().take(4).collect();
    if digits.len() == 4 && digits.chars().all(|c| c.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}
