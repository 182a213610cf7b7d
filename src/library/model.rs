use std::path::{Path, PathBuf};
use std::time::Duration;

/// Metadata and technical properties extracted from one audio file.
///
/// String fields are never absent: a missing tag is an empty string, a
/// missing number is `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub album_artist: String,
    pub genre: String,
    pub year: u32,
    pub track_number: u32,
    pub duration: Duration,
    /// Audio bitrate in kbps.
    pub bitrate: u32,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    pub channels: u8,
    pub artwork: Option<Vec<u8>>,
}

impl Track {
    /// A track with only its path set.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// `true` if any of title, artist or album carries a value.
    pub fn has_metadata(&self) -> bool {
        !self.title.is_empty() || !self.artist.is_empty() || !self.album.is_empty()
    }

    pub fn has_artwork(&self) -> bool {
        self.artwork.as_ref().is_some_and(|a| !a.is_empty())
    }

    /// The final path component, or an empty string for a bare root.
    pub fn file_name(&self) -> String {
        file_name_of(&self.path)
    }

    /// `"Title - Artist"`, falling back to the title alone and then to the file name.
    pub fn display_name(&self) -> String {
        match (self.title.is_empty(), self.artist.is_empty()) {
            (false, false) => format!("{} - {}", self.title, self.artist),
            (false, true) => self.title.clone(),
            _ => self.file_name(),
        }
    }

    /// Duration as `mm:ss`.
    pub fn formatted_duration(&self) -> String {
        format_mm_ss(self.duration)
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `mm:ss`, minutes not wrapped at the hour.
pub fn format_mm_ss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
