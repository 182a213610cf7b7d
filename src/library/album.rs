use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::time::Duration;

use super::model::Track;

/// A named group of tracks by one artist.
///
/// Tracks are kept in ascending track-number order at all times; equal
/// numbers keep their insertion order.
#[derive(Debug, Clone, Default)]
pub struct Album {
    pub name: String,
    pub artist: String,
    pub year: u32,
    pub genre: String,
    tracks: Vec<Track>,
    cover_art: Option<Vec<u8>>,
}

impl Album {
    pub fn new(name: impl Into<String>, artist: impl Into<String>, year: u32) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
            year,
            ..Self::default()
        }
    }

    /// `"Artist - Name"`; albums compare equal when their ids match ignoring case.
    pub fn id(&self) -> String {
        format!("{} - {}", self.artist, self.name)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn total_duration(&self) -> Duration {
        self.tracks.iter().map(|t| t.duration).sum()
    }

    /// Add `track`, filling its empty album fields from this album.
    pub fn add_track(&mut self, mut track: Track) {
        if track.album.is_empty() {
            track.album = self.name.clone();
        }
        if track.album_artist.is_empty() {
            track.album_artist = self.artist.clone();
        }
        let at = self
            .tracks
            .partition_point(|t| t.track_number <= track.track_number);
        self.tracks.insert(at, track);
    }

    /// Remove the track stored under `path`. Returns `false` if none matched.
    pub fn remove_track(&mut self, path: &Path) -> bool {
        match self.position_of(path) {
            Some(i) => {
                self.tracks.remove(i);
                true
            }
            None => false,
        }
    }

    /// Re-sort by track number. Stable, so ties keep their current order.
    pub fn sort_by_track_number(&mut self) {
        self.tracks.sort_by_key(|t| t.track_number);
    }

    /// The track numbered `n`, if `n` lies within `1..=track_count()`.
    pub fn track_by_number(&self, n: u32) -> Option<&Track> {
        if n < 1 || n as usize > self.tracks.len() {
            return None;
        }
        self.tracks.iter().find(|t| t.track_number == n)
    }

    pub fn first_track(&self) -> Option<&Track> {
        self.tracks.first()
    }

    /// The track after `path`, or `None` at the end or for an unknown path.
    pub fn next_track(&self, path: &Path) -> Option<&Track> {
        self.position_of(path).and_then(|i| self.tracks.get(i + 1))
    }

    /// The track before `path`, or `None` at the start or for an unknown path.
    pub fn previous_track(&self, path: &Path) -> Option<&Track> {
        self.position_of(path)
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.tracks.get(i))
    }

    pub fn cover_art(&self) -> Option<&[u8]> {
        self.cover_art.as_deref()
    }

    pub fn has_cover_art(&self) -> bool {
        self.cover_art.as_ref().is_some_and(|a| !a.is_empty())
    }

    pub fn set_cover_art(&mut self, data: Vec<u8>) {
        self.cover_art = Some(data);
    }

    pub fn clear_cover_art(&mut self) {
        self.cover_art = None;
    }

    fn position_of(&self, path: &Path) -> Option<usize> {
        self.tracks.iter().position(|t| t.path == path)
    }
}

impl PartialEq for Album {
    fn eq(&self, other: &Self) -> bool {
        self.id().to_lowercase() == other.id().to_lowercase()
    }
}

impl Eq for Album {}

impl Hash for Album {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().to_lowercase().hash(state);
    }
}

impl fmt::Display for Album {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.year > 0 {
            write!(f, "{} - {} ({})", self.artist, self.name, self.year)
        } else {
            write!(f, "{} - {}", self.artist, self.name)
        }
    }
}
