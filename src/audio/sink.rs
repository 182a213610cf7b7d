//! `rodio` implementation of the audio backend.
//!
//! Each opened file gets its own paused `Sink` on the shared output stream,
//! plus a small watcher thread that reports when a started sink drains.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::debug;

use crate::config::AudioSettings;
use crate::error::PlaybackError;
use crate::library::{LoftyTagReader, TagReader};

use super::backend::{AudioBackend, CompletionCallback, OutputHandle};

/// Backend bound to the default output device.
pub struct RodioBackend {
    stream: OutputStream,
    poll: Duration,
}

impl RodioBackend {
    /// Open the default output device.
    pub fn open_default(settings: &AudioSettings) -> Result<Self, PlaybackError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlaybackError::Device(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped.
        stream.log_on_drop(false);
        Ok(Self {
            stream,
            poll: Duration::from_millis(settings.completion_poll_ms.max(1)),
        })
    }
}

impl AudioBackend for RodioBackend {
    fn open(
        &mut self,
        path: &Path,
        on_complete: CompletionCallback,
    ) -> Result<Box<dyn OutputHandle>, PlaybackError> {
        let sink = Sink::connect_new(self.stream.mixer());
        let handle = RodioHandle::open(sink, path, self.poll, on_complete)?;
        Ok(Box::new(handle))
    }
}

/// `TryFrom<File>` hands the decoder the byte length, which symphonia needs
/// before it will seek.
fn decode(path: &Path) -> Result<Decoder<BufReader<File>>, PlaybackError> {
    let file = File::open(path)?;
    Decoder::try_from(file).map_err(|e| PlaybackError::Decode(e.to_string()))
}

#[derive(Default)]
struct Watcher {
    /// Set by `start`, cleared once the completion callback has fired.
    armed: AtomicBool,
    closed: AtomicBool,
}

fn spawn_watcher(
    sink: Arc<Sink>,
    watcher: Arc<Watcher>,
    poll: Duration,
    on_complete: CompletionCallback,
) -> Result<(), PlaybackError> {
    thread::Builder::new()
        .name("sonata-eos".to_string())
        .spawn(move || {
            while !watcher.closed.load(Ordering::Acquire) {
                thread::sleep(poll);
                if watcher.armed.load(Ordering::Acquire)
                    && !sink.is_paused()
                    && sink.empty()
                    && watcher.armed.swap(false, Ordering::AcqRel)
                {
                    on_complete();
                }
            }
        })?;
    Ok(())
}

pub(super) struct RodioHandle {
    path: PathBuf,
    sink: Arc<Sink>,
    duration: Duration,
    /// Where playback resumes if the sink has drained and must be refilled.
    offset: Duration,
    /// Set by `start`. Cleared by `pause`, `stop` and a seek on a drained sink.
    playing: bool,
    watcher: Arc<Watcher>,
}

impl RodioHandle {
    /// Decode `path` into `sink` and leave it paused at the start.
    pub(super) fn open(
        sink: Sink,
        path: &Path,
        poll: Duration,
        on_complete: CompletionCallback,
    ) -> Result<Self, PlaybackError> {
        let source = decode(path)?;
        let duration = source
            .total_duration()
            .or_else(|| LoftyTagReader.read_tags(path).ok().map(|t| t.duration))
            .unwrap_or_default();

        let sink = Arc::new(sink);
        sink.pause();
        sink.append(source);

        let watcher = Arc::new(Watcher::default());
        spawn_watcher(sink.clone(), watcher.clone(), poll, on_complete)?;

        debug!(path = %path.display(), ?duration, "opened output sink");
        Ok(Self {
            path: path.to_path_buf(),
            sink,
            duration,
            offset: Duration::ZERO,
            playing: false,
            watcher,
        })
    }
}

impl OutputHandle for RodioHandle {
    fn duration(&self) -> Duration {
        self.duration
    }

    fn start(&mut self) -> Result<(), PlaybackError> {
        if self.sink.empty() {
            // Refill paused so the seek lands before anything is heard.
            self.sink.pause();
            self.sink.append(decode(&self.path)?);
            if !self.offset.is_zero() {
                self.sink
                    .try_seek(self.offset)
                    .map_err(|e| PlaybackError::Seek(e.to_string()))?;
            }
        }
        self.watcher.armed.store(true, Ordering::Release);
        self.sink.play();
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.offset = self.position();
        self.playing = false;
        self.sink.pause();
    }

    fn stop(&mut self) {
        self.watcher.armed.store(false, Ordering::Release);
        self.playing = false;
        self.sink.pause();
        self.offset = Duration::ZERO;
        if !self.sink.empty() {
            // A failed rewind leaves the source in place; the next start resumes from it.
            if let Err(e) = self.sink.try_seek(Duration::ZERO) {
                debug!(error = %e, "rewind on stop failed");
            }
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn seek(&mut self, position: Duration) -> Result<(), PlaybackError> {
        self.offset = position;
        if self.sink.empty() {
            self.playing = false;
            return Ok(());
        }
        self.sink
            .try_seek(position)
            .map_err(|e| PlaybackError::Seek(e.to_string()))
    }

    fn position(&self) -> Duration {
        if !self.sink.empty() {
            self.sink.get_pos()
        } else if self.playing {
            // Drained while playing: the end, even before the watcher reports it.
            self.duration.max(self.sink.get_pos())
        } else {
            self.offset
        }
    }
}

impl Drop for RodioHandle {
    fn drop(&mut self) {
        self.watcher.closed.store(true, Ordering::Release);
        self.watcher.armed.store(false, Ordering::Release);
        self.sink.stop();
    }
}
