//! The live playback session and its generation-guarded store

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::audio::TransportStatus;
use crate::error::{ErrorKind, LoadError};

use super::payload::RelatedAndLyrics;
use super::types::{PLACEHOLDER_ARTWORK_URL, TrackMetadata, TrackRef, UNKNOWN_ARTIST, UNKNOWN_TITLE};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// Read-only view of the single live session handed to the UI
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackSession {
    pub track: Option<TrackRef>,
    pub metadata: Option<TrackMetadata>,
    pub status: LoadStatus,
    pub error: Option<LoadError>,
    pub position_ms: u64,
    pub duration_ms: u64,
    pub is_playing: bool,
    pub lyrics: String,
    pub related: Vec<TrackRef>,
    pub generation: u64,
}

impl TrackSession {
    fn loading(track: TrackRef, generation: u64) -> Self {
        Self {
            track: Some(track),
            status: LoadStatus::Loading,
            generation,
            ..Self::default()
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(LoadError::kind)
    }

    pub fn track_id(&self) -> Option<&str> {
        self.track.as_ref().map(|track| track.id.as_str())
    }

    pub fn title(&self) -> &str {
        self.track
            .as_ref()
            .and_then(|track| track.title.as_deref())
            .or_else(|| self.metadata.as_ref().and_then(|meta| meta.title.as_deref()))
            .unwrap_or(UNKNOWN_TITLE)
    }

    pub fn artist(&self) -> &str {
        self.metadata
            .as_ref()
            .and_then(|meta| meta.artist.as_deref())
            .or_else(|| self.track.as_ref().and_then(|track| track.artist.as_deref()))
            .unwrap_or(UNKNOWN_ARTIST)
    }

    pub fn artwork_url(&self) -> &str {
        let meta = self.metadata.as_ref();
        meta.and_then(|meta| meta.poster_large_url.as_deref())
            .or_else(|| meta.and_then(|meta| meta.poster_url.as_deref()))
            .or_else(|| self.track.as_ref().and_then(|track| track.poster_url.as_deref()))
            .unwrap_or(PLACEHOLDER_ARTWORK_URL)
    }

    /// Position as a fraction of duration, 0 while duration is unknown.
    pub fn progress_ratio(&self) -> f64 {
        if self.duration_ms == 0 {
            0.0
        } else {
            (self.position_ms as f64 / self.duration_ms as f64).clamp(0.0, 1.0)
        }
    }
}

/// What a successful load contributes to the session
#[derive(Clone, Debug)]
pub struct ReadyTrack {
    pub metadata: TrackMetadata,
    pub extras: RelatedAndLyrics,
}

/// Result of offering one poller sample to the store
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleOutcome {
    Applied,
    /// Sample reported end of stream; the poller has been retired
    Finished,
    /// Poller is no longer the active one
    Ignored,
}

struct StoreInner {
    session: TrackSession,
    active_poller: Option<u64>,
    next_poller_id: u64,
}

/// Owner of the live [`TrackSession`].
///
/// The generation counter is the session's own `generation` field: it is bumped
/// and the session replaced under one lock, so any writer holding an older
/// generation is rejected. The lock is never held across an await.
pub struct SessionStore {
    inner: Mutex<StoreInner>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                session: TrackSession::default(),
                active_poller: None,
                next_poller_id: 1,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> TrackSession {
        self.lock().session.clone()
    }

    pub fn generation(&self) -> u64 {
        self.lock().session.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.lock().session.generation == generation
    }

    /// `generation` is the live session and it finished loading.
    pub fn is_ready(&self, generation: u64) -> bool {
        let inner = self.lock();
        inner.session.generation == generation && inner.session.status == LoadStatus::Ready
    }

    pub fn current_track_id(&self) -> Option<String> {
        self.lock().session.track_id().map(str::to_string)
    }

    pub fn is_playing(&self) -> bool {
        self.lock().session.is_playing
    }

    /// Replace the session with a fresh `Loading` one for `track` and return
    /// its generation. Any active poller stops being able to write.
    pub fn begin_load(&self, track: TrackRef) -> u64 {
        let mut inner = self.lock();
        let generation = inner.session.generation + 1;
        inner.session = TrackSession::loading(track, generation);
        inner.active_poller = None;
        generation
    }

    /// Drop the session back to `Idle`, invalidating in-flight loads.
    pub fn reset(&self) -> u64 {
        let mut inner = self.lock();
        let generation = inner.session.generation + 1;
        inner.session = TrackSession {
            generation,
            ..TrackSession::default()
        };
        inner.active_poller = None;
        generation
    }

    pub fn mark_ready(&self, generation: u64, ready: ReadyTrack) -> bool {
        self.update(generation, |session| {
            session.status = LoadStatus::Ready;
            session.error = None;
            session.position_ms = 0;
            session.duration_ms = ready.metadata.duration_ms.unwrap_or(0);
            session.is_playing = true;
            session.lyrics = ready.extras.lyrics;
            session.related = ready.extras.related;
            session.metadata = Some(ready.metadata);
        })
    }

    pub fn mark_failed(&self, generation: u64, error: LoadError) -> bool {
        self.update(generation, |session| {
            session.status = LoadStatus::Error;
            session.error = Some(error);
            session.is_playing = false;
        })
    }

    /// Apply `f` only if `generation` is still the live one.
    pub fn update(&self, generation: u64, f: impl FnOnce(&mut TrackSession)) -> bool {
        let mut inner = self.lock();
        if inner.session.generation != generation {
            return false;
        }
        f(&mut inner.session);
        true
    }

    /// Register a new poller for a `Ready` session of `generation`.
    pub fn activate_poller(&self, generation: u64) -> Option<u64> {
        let mut inner = self.lock();
        if inner.session.generation != generation || inner.session.status != LoadStatus::Ready {
            return None;
        }
        let id = inner.next_poller_id;
        inner.next_poller_id += 1;
        inner.active_poller = Some(id);
        Some(id)
    }

    pub fn retire_poller(&self, poller_id: u64) -> bool {
        let mut inner = self.lock();
        if inner.active_poller == Some(poller_id) {
            inner.active_poller = None;
            true
        } else {
            false
        }
    }

    pub fn active_poller(&self) -> Option<u64> {
        self.lock().active_poller
    }

    pub fn apply_sample(&self, poller_id: u64, status: &TransportStatus) -> SampleOutcome {
        let mut inner = self.lock();
        if inner.active_poller != Some(poller_id) {
            return SampleOutcome::Ignored;
        }

        let session = &mut inner.session;
        if status.duration_ms > 0 {
            session.duration_ms = status.duration_ms;
        }

        if status.finished {
            session.position_ms = session.duration_ms;
            session.is_playing = false;
            inner.active_poller = None;
            return SampleOutcome::Finished;
        }

        session.position_ms = status.position_ms;
        session.is_playing = status.is_playing;
        SampleOutcome::Applied
    }
}
