use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::MetadataError;

use super::model::Track;
use super::tags::{LoftyTagReader, RawTags, TagReader};

/// File extensions (lowercase, with dot) the reader accepts.
pub const SUPPORTED_EXTENSIONS: [&str; 6] = [".mp3", ".flac", ".wav", ".aac", ".m4a", ".ogg"];

/// `true` if `path` carries one of `SUPPORTED_EXTENSIONS`, compared case-insensitively.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = format!(".{}", ext.to_ascii_lowercase());
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn clean(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Extracts `Track` records from audio files.
///
/// Single-file failures are reported as `None` and never abort a batch.
pub struct MetadataReader<T = LoftyTagReader> {
    tags: T,
    settings: LibrarySettings,
}

impl MetadataReader<LoftyTagReader> {
    pub fn new(settings: LibrarySettings) -> Self {
        Self::with_tag_reader(LoftyTagReader, settings)
    }
}

impl Default for MetadataReader<LoftyTagReader> {
    fn default() -> Self {
        Self::new(LibrarySettings::default())
    }
}

impl<T: TagReader> MetadataReader<T> {
    pub fn with_tag_reader(tags: T, settings: LibrarySettings) -> Self {
        Self { tags, settings }
    }

    pub fn supported_extensions(&self) -> &'static [&'static str] {
        &SUPPORTED_EXTENSIONS
    }

    pub fn is_supported(&self, path: &Path) -> bool {
        is_supported(path)
    }

    /// Read one file, or `None` if it is missing, unsupported or unparsable.
    pub fn read_one(&self, path: &Path) -> Option<Track> {
        match self.try_read_one(path) {
            Ok(track) => Some(track),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "skipping file");
                None
            }
        }
    }

    /// Same as `read_one` but keeps the failure reason.
    pub fn try_read_one(&self, path: &Path) -> Result<Track, MetadataError> {
        check_readable(path)?;
        let raw = self.tags.read_tags(path)?;
        Ok(track_from_raw(path, raw))
    }

    /// Read every path in order, dropping the ones that fail.
    pub fn read_many<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<Track> {
        paths
            .iter()
            .filter_map(|p| self.read_one(p.as_ref()))
            .collect()
    }

    /// Read every supported file under `root`.
    ///
    /// A missing root yields an empty list. With `recursive == false` only the
    /// immediate children of `root` are considered.
    pub fn scan_directory(&self, root: &Path, recursive: bool) -> Vec<Track> {
        if !root.is_dir() {
            debug!(root = %root.display(), "scan root is not a directory");
            return Vec::new();
        }

        let mut walker = WalkDir::new(root)
            .follow_links(self.settings.follow_links)
            .sort_by_file_name();

        // Non-recursive = only the root directory.
        let depth_cap = if recursive {
            self.settings.max_depth
        } else {
            Some(1)
        };
        if let Some(d) = depth_cap {
            walker = walker.max_depth(d);
        }

        let include_hidden = self.settings.include_hidden;
        let paths: Vec<_> = walker
            .into_iter()
            .filter_entry(|e| include_hidden || e.depth() == 0 || !is_hidden(e.path()))
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file() || e.path().is_file())
            .map(|e| e.into_path())
            .filter(|p| is_supported(p))
            .collect();

        debug!(root = %root.display(), candidates = paths.len(), "scanned directory");
        self.read_many(&paths)
    }

    /// First embedded picture of the file, if any.
    pub fn extract_artwork(&self, path: &Path) -> Option<Vec<u8>> {
        if check_readable(path).is_err() {
            return None;
        }
        match self.tags.read_pictures(path) {
            Ok(pictures) => first_picture(pictures),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no artwork");
                None
            }
        }
    }
}

fn check_readable(path: &Path) -> Result<(), MetadataError> {
    if !path.is_file() {
        return Err(MetadataError::NotFound(path.to_path_buf()));
    }
    if !is_supported(path) {
        return Err(MetadataError::Unsupported(path.to_path_buf()));
    }
    Ok(())
}

fn first_picture(pictures: Vec<Vec<u8>>) -> Option<Vec<u8>> {
    pictures.into_iter().next().filter(|p| !p.is_empty())
}

fn track_from_raw(path: &Path, raw: RawTags) -> Track {
    Track {
        path: path.to_path_buf(),
        title: clean(raw.title),
        artist: clean(raw.artist),
        album: clean(raw.album),
        album_artist: clean(raw.album_artist),
        genre: clean(raw.genre),
        year: raw.year.unwrap_or(0),
        track_number: raw.track_number.unwrap_or(0),
        duration: raw.duration,
        bitrate: raw.bitrate.unwrap_or(0),
        sample_rate: raw.sample_rate.unwrap_or(0),
        channels: raw.channels.unwrap_or(0),
        artwork: first_picture(raw.pictures),
    }
}
