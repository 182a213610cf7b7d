use std::env;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use sonata::{
    MetadataReader, PlaybackEngine, PlaybackEvent, Track, format_mm_ss, group_into_albums,
};

mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    let target = env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("Music"));

    let reader = MetadataReader::new(settings.library.clone());
    let tracks = if target.is_dir() {
        reader.scan_directory(&target, settings.library.recursive)
    } else {
        reader.read_one(&target).into_iter().collect()
    };
    info!(target = %target.display(), tracks = tracks.len(), "library read");

    let Some(first) = print_library(&tracks) else {
        warn!("no playable tracks found");
        return Ok(());
    };

    let mut engine = PlaybackEngine::with_default_output(&settings.audio)?;
    let (_, events) = engine.subscribe();
    if !engine.load(&first) {
        return Err(format!("could not load {}", first.display()).into());
    }
    engine.play();

    let tick = Duration::from_millis(settings.playback.tick_interval_ms);
    loop {
        thread::sleep(tick);
        engine.tick();
        for event in events.try_iter() {
            match event {
                PlaybackEvent::FileStarted(path) => println!("Now playing: {}", path.display()),
                PlaybackEvent::PositionChanged(pos) => {
                    println!("  {} / {}", format_mm_ss(pos), format_mm_ss(engine.duration()));
                }
                PlaybackEvent::PlaybackStopped => {
                    engine.dispose();
                    return Ok(());
                }
            }
        }
    }
}

/// Print albums, then ungrouped tracks. Returns the path to play first.
fn print_library(tracks: &[Track]) -> Option<PathBuf> {
    let albums = group_into_albums(tracks);
    for album in &albums {
        println!("{album} [{} tracks, {}]", album.track_count(), format_mm_ss(album.total_duration()));
        for t in album.tracks() {
            println!("  {:>2}. {} ({})", t.track_number, t.display_name(), t.formatted_duration());
        }
    }

    let grouped = |t: &Track| {
        albums
            .iter()
            .any(|a| a.tracks().iter().any(|at| at.path == t.path))
    };
    for t in tracks.iter().filter(|t| !grouped(t)) {
        println!("{} ({})", t.display_name(), t.formatted_duration());
    }

    albums
        .first()
        .and_then(|a| a.first_track())
        .or_else(|| tracks.first())
        .map(|t| t.path.clone())
}
