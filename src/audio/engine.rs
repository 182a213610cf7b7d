use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::AudioSettings;
use crate::error::PlaybackError;

use super::backend::{AudioBackend, CompletionCallback, OutputHandle};
use super::sink::RodioBackend;
use super::types::{PlaybackEvent, SubscriptionId, TransportState};

/// Everything the completion callback may touch, behind one lock.
struct Session {
    state: TransportState,
    path: Option<PathBuf>,
    handle: Option<Box<dyn OutputHandle>>,
    /// Position while not playing. While playing the handle is authoritative.
    position: Duration,
    duration: Duration,
    volume: f32,
    /// Bumped on every release so callbacks from an older handle are ignored.
    generation: u64,
}

impl Session {
    /// Stop and drop the bound handle, if any. Returns whether output was active.
    fn release(&mut self) -> bool {
        let was_active = self.state.is_active();
        if let Some(mut handle) = self.handle.take() {
            handle.stop();
        }
        self.generation = self.generation.wrapping_add(1);
        self.state = TransportState::Idle;
        self.path = None;
        self.position = Duration::ZERO;
        self.duration = Duration::ZERO;
        was_active
    }

    fn current_position(&self) -> Duration {
        match (&self.handle, self.state) {
            (Some(h), TransportState::Playing) => {
                let position = h.position();
                if self.duration.is_zero() {
                    position
                } else {
                    position.min(self.duration)
                }
            }
            _ => self.position,
        }
    }
}

struct Subscriber {
    id: SubscriptionId,
    tx: Sender<PlaybackEvent>,
}

struct Shared {
    session: Mutex<Session>,
    subscribers: Mutex<Vec<Subscriber>>,
    next_id: AtomicU64,
}

impl Shared {
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn subscribers(&self) -> MutexGuard<'_, Vec<Subscriber>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver `event` to every live subscriber, pruning closed receivers.
    fn publish(&self, event: PlaybackEvent) {
        self.subscribers()
            .retain(|s| s.tx.send(event.clone()).is_ok());
    }

    /// Natural end of stream for the handle opened at `generation`.
    fn finish(&self, generation: u64) {
        {
            let mut s = self.session();
            if s.generation != generation || s.state != TransportState::Playing {
                return;
            }
            if let Some(h) = s.handle.as_mut() {
                h.stop();
            }
            s.state = TransportState::Loaded;
            s.position = Duration::ZERO;
        }
        debug!("end of stream");
        self.publish(PlaybackEvent::PlaybackStopped);
    }
}

fn completion_callback(shared: Weak<Shared>, generation: u64) -> CompletionCallback {
    Arc::new(move || {
        if let Some(shared) = shared.upgrade() {
            shared.finish(generation);
        }
    })
}

/// Transport state machine over one `AudioBackend`.
///
/// Transport calls are expected from a single control thread (hence `&mut
/// self`). The backend's completion callback may run concurrently on its own
/// thread; both sides go through the same session lock.
pub struct PlaybackEngine {
    backend: Option<Box<dyn AudioBackend>>,
    shared: Arc<Shared>,
}

impl PlaybackEngine {
    pub fn new(backend: impl AudioBackend + 'static, settings: &AudioSettings) -> Self {
        let volume = if settings.initial_volume.is_finite() {
            settings.initial_volume.clamp(0.0, 1.0)
        } else {
            AudioSettings::default().initial_volume
        };
        Self {
            backend: Some(Box::new(backend)),
            shared: Arc::new(Shared {
                session: Mutex::new(Session {
                    state: TransportState::Idle,
                    path: None,
                    handle: None,
                    position: Duration::ZERO,
                    duration: Duration::ZERO,
                    volume,
                    generation: 0,
                }),
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Engine driving the default output device through `rodio`.
    pub fn with_default_output(settings: &AudioSettings) -> Result<Self, PlaybackError> {
        Ok(Self::new(RodioBackend::open_default(settings)?, settings))
    }

    /// Register for notifications. Dropping the receiver also unsubscribes.
    pub fn subscribe(&self) -> (SubscriptionId, Receiver<PlaybackEvent>) {
        let (tx, rx) = mpsc::channel();
        let id = SubscriptionId(self.shared.next_id.fetch_add(1, Ordering::Relaxed));
        self.shared.subscribers().push(Subscriber { id, tx });
        (id, rx)
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.shared.subscribers();
        let before = subs.len();
        subs.retain(|s| s.id != id);
        subs.len() != before
    }

    /// Bind `path` for playback. Returns `false` on any failure.
    pub fn load(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match self.try_load(path) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "load failed");
                false
            }
        }
    }

    /// Same as `load` but keeps the failure reason.
    ///
    /// A missing file is rejected before anything changes. Once the file is
    /// known to exist the previous handle is released first, so a backend
    /// failure leaves the engine `Idle`.
    pub fn try_load(&mut self, path: impl AsRef<Path>) -> Result<(), PlaybackError> {
        let path = path.as_ref();
        let Some(backend) = self.backend.as_mut() else {
            return Err(PlaybackError::Disposed);
        };
        if !path.is_file() {
            return Err(PlaybackError::NotFound(path.to_path_buf()));
        }

        let (was_active, generation, volume) = {
            let mut s = self.shared.session();
            let was_active = s.release();
            (was_active, s.generation, s.volume)
        };
        if was_active {
            self.shared.publish(PlaybackEvent::PlaybackStopped);
        }

        let on_complete = completion_callback(Arc::downgrade(&self.shared), generation);
        let mut handle = backend.open(path, on_complete)?;
        handle.set_volume(volume);
        let duration = handle.duration();

        {
            let mut s = self.shared.session();
            s.handle = Some(handle);
            s.path = Some(path.to_path_buf());
            s.state = TransportState::Loaded;
            s.position = Duration::ZERO;
            s.duration = duration;
        }

        info!(path = %path.display(), ?duration, "loaded");
        self.shared
            .publish(PlaybackEvent::FileStarted(path.to_path_buf()));
        Ok(())
    }

    /// Start or resume output. No-op without a loaded file.
    pub fn play(&mut self) {
        let mut s = self.shared.session();
        if s.state == TransportState::Playing {
            return;
        }
        let Some(handle) = s.handle.as_mut() else {
            return;
        };
        match handle.start() {
            Ok(()) => s.state = TransportState::Playing,
            Err(e) => warn!(error = %e, "failed to start output"),
        }
    }

    /// Freeze output at the current position. No-op unless playing.
    pub fn pause(&mut self) {
        let mut s = self.shared.session();
        if s.state != TransportState::Playing {
            return;
        }
        let position = s.current_position();
        if let Some(handle) = s.handle.as_mut() {
            handle.pause();
        }
        s.position = position;
        s.state = TransportState::Paused;
    }

    /// Halt output and rewind to zero. The file stays loaded.
    pub fn stop(&mut self) {
        let was_active = {
            let mut s = self.shared.session();
            let Some(handle) = s.handle.as_mut() else {
                return;
            };
            handle.stop();
            let was_active = s.state.is_active();
            s.state = TransportState::Loaded;
            s.position = Duration::ZERO;
            was_active
        };
        if was_active {
            self.shared.publish(PlaybackEvent::PlaybackStopped);
        }
    }

    /// Move to `target`, clamped to the loaded duration.
    pub fn seek(&mut self, target: Duration) {
        let position = {
            let mut s = self.shared.session();
            let position = target.min(s.duration);
            let Some(handle) = s.handle.as_mut() else {
                return;
            };
            if let Err(e) = handle.seek(position) {
                warn!(error = %e, ?position, "seek failed");
                return;
            }
            s.position = position;
            position
        };
        self.shared
            .publish(PlaybackEvent::PositionChanged(position));
    }

    /// Set the sticky volume, clamped to `0.0..=1.0`. NaN is ignored.
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            return;
        }
        let mut s = self.shared.session();
        s.volume = volume.clamp(0.0, 1.0);
        let volume = s.volume;
        if let Some(handle) = s.handle.as_mut() {
            handle.set_volume(volume);
        }
    }

    /// Publish the current position if playing. Meant to be polled by the caller.
    pub fn tick(&self) {
        let position = {
            let s = self.shared.session();
            if s.state != TransportState::Playing {
                return;
            }
            s.current_position()
        };
        self.shared
            .publish(PlaybackEvent::PositionChanged(position));
    }

    /// Release the bound file and the output device. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        let Some(backend) = self.backend.take() else {
            return;
        };
        let was_active = self.shared.session().release();
        if was_active {
            self.shared.publish(PlaybackEvent::PlaybackStopped);
        }
        drop(backend);
        debug!("playback engine disposed");
    }

    pub fn state(&self) -> TransportState {
        self.shared.session().state
    }

    pub fn position(&self) -> Duration {
        self.shared.session().current_position()
    }

    pub fn duration(&self) -> Duration {
        self.shared.session().duration
    }

    pub fn volume(&self) -> f32 {
        self.shared.session().volume
    }

    pub fn is_playing(&self) -> bool {
        self.state() == TransportState::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.state() == TransportState::Paused
    }

    pub fn current_file(&self) -> Option<PathBuf> {
        self.shared.session().path.clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.backend.is_none()
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        self.dispose();
    }
}
