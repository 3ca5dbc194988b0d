//! Controller module - Session ownership and user intents
//!
//! This module contains the now-playing controller: the only code that
//! mutates the session, owns the audio handle, and drives the expansion
//! machine. It is organized into submodules by responsibility:
//!
//! - `loader`: `load_track` / `select_related` with generation supersession
//! - `playback`: Transport controls and dismissal
//! - `poller`: Position polling for the active handle
//! - `input`: Key and mouse event handling for the terminal front-end

mod input;
mod loader;
mod playback;
mod poller;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::audio::{AudioEngine, AudioHandle};
use crate::config::PlayerConfig;
use crate::expansion::{
    ExpansionSnapshot, ExpansionStateMachine, GestureEvent, Rest, VisualParams,
};
use crate::model::{FormatProvider, MetadataProvider, SessionStore, TrackSession};

pub use input::{DragTracker, PointerAction};
pub use poller::PositionPoller;

/// The one open audio handle and the poller sampling it
pub(crate) struct ActiveEngine {
    generation: u64,
    handle: Arc<dyn AudioHandle>,
    poller: PositionPoller,
}

impl ActiveEngine {
    /// Stop polling, then unload.
    async fn release(mut self) {
        self.poller.stop();
        if let Err(e) = self.handle.unload().await {
            tracing::warn!(generation = self.generation, error = %e, "Failed to unload audio handle");
        } else {
            tracing::debug!(generation = self.generation, "Audio handle released");
        }
    }
}

#[derive(Clone)]
pub struct NowPlayingController {
    pub(crate) store: Arc<SessionStore>,
    /// Never held across an `.await`
    engine_slot: Arc<Mutex<Option<ActiveEngine>>>,
    /// Serializes handle creation across racing loads
    creation: Arc<tokio::sync::Mutex<()>>,
    expansion: Arc<Mutex<ExpansionStateMachine>>,
    metadata: Arc<dyn MetadataProvider>,
    formats: Arc<dyn FormatProvider>,
    engine: Arc<dyn AudioEngine>,
    config: Arc<PlayerConfig>,
}

impl NowPlayingController {
    pub fn new(
        config: PlayerConfig,
        metadata: Arc<dyn MetadataProvider>,
        formats: Arc<dyn FormatProvider>,
        engine: Arc<dyn AudioEngine>,
    ) -> Self {
        let expansion = ExpansionStateMachine::new(&config.layout, config.spring);
        Self {
            store: Arc::new(SessionStore::new()),
            engine_slot: Arc::new(Mutex::new(None)),
            creation: Arc::new(tokio::sync::Mutex::new(())),
            expansion: Arc::new(Mutex::new(expansion)),
            metadata,
            formats,
            engine,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Snapshot of the live session.
    pub fn session(&self) -> TrackSession {
        self.store.snapshot()
    }

    /// A poller is actively sampling the current handle.
    pub fn is_polling(&self) -> bool {
        self.slot()
            .as_ref()
            .is_some_and(|active| active.poller.is_running())
    }

    pub fn has_audio_handle(&self) -> bool {
        self.slot().is_some()
    }

    fn slot(&self) -> MutexGuard<'_, Option<ActiveEngine>> {
        self.engine_slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The handle transport controls may drive: it must belong to the live
    /// session, and that session must be `Ready`.
    fn transport_target(&self) -> Option<(u64, Arc<dyn AudioHandle>)> {
        let generation = self.store.generation();
        let slot = self.slot();
        let active = slot.as_ref().filter(|active| active.generation == generation)?;
        if !self.store.is_ready(generation) {
            return None;
        }
        Some((generation, active.handle.clone()))
    }

    fn expansion(&self) -> MutexGuard<'_, ExpansionStateMachine> {
        self.expansion.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn expand(&self) {
        self.expansion().expand();
    }

    pub fn collapse(&self) {
        self.expansion().collapse();
    }

    pub fn handle_gesture(&self, event: GestureEvent) {
        self.expansion().handle_gesture(event);
    }

    /// Advance the settle animation; call once per rendered frame.
    pub fn tick(&self, dt: Duration) -> Option<Rest> {
        self.expansion().tick(dt)
    }

    pub fn expansion_snapshot(&self) -> ExpansionSnapshot {
        self.expansion().snapshot()
    }

    pub fn visual_params(&self) -> VisualParams {
        self.expansion().visual_params(&self.config.layout)
    }
}
