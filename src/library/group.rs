use std::collections::HashMap;

use super::album::Album;
use super::model::Track;

/// Album-artist when present, otherwise the track artist.
fn effective_artist(track: &Track) -> &str {
    if track.album_artist.is_empty() {
        &track.artist
    } else {
        &track.album_artist
    }
}

/// Group `tracks` into albums keyed by (album name, effective artist).
///
/// Tracks without an album or without an artist are left out. Year and genre
/// come from the first track seen for each album, and the cover art from the
/// first one (in input order) that carries artwork. Albums are returned in
/// the order their first track appears.
pub fn group_into_albums(tracks: &[Track]) -> Vec<Album> {
    let mut albums: Vec<Album> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for track in tracks
        .iter()
        .filter(|t| !t.album.is_empty() && !t.artist.is_empty())
    {
        let artist = effective_artist(track);
        let key = (track.album.to_lowercase(), artist.to_lowercase());

        let i = *index.entry(key).or_insert_with(|| {
            let mut album = Album::new(track.album.clone(), artist, track.year);
            album.genre = track.genre.clone();
            albums.push(album);
            albums.len() - 1
        });

        let album = &mut albums[i];
        if !album.has_cover_art() {
            if let Some(art) = track.artwork.as_ref().filter(|a| !a.is_empty()) {
                album.set_cover_art(art.clone());
            }
        }
        album.add_track(track.clone());
    }

    albums
}
