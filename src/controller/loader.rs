//! Track loading with generation supersession

use anyhow::Result;
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::config::FormatPolicy;
use crate::error::LoadError;
use crate::model::{
    select_format, AudioFormatCandidate, ReadyTrack, RelatedAndLyrics, TrackMetadata, TrackRef,
};

use super::{ActiveEngine, NowPlayingController, PositionPoller};

/// Everything fetched for one load, validated and ready to hand to the engine
struct PreparedLoad {
    ready: ReadyTrack,
    url: String,
}

impl PreparedLoad {
    fn from_fetches(
        metadata: Result<TrackMetadata>,
        extras: Result<Value>,
        formats: Result<Vec<AudioFormatCandidate>>,
        policy: &FormatPolicy,
    ) -> Result<Self, LoadError> {
        let metadata = metadata.map_err(|e| LoadError::network(&e))?;
        let extras = extras.map_err(|e| LoadError::network(&e))?;
        let formats = formats.map_err(|e| LoadError::network(&e))?;

        let chosen = select_format(&formats, policy)?;
        let url = chosen.url.clone().ok_or(LoadError::NoAudioFormatFound)?;
        tracing::debug!(
            bitrate_bps = chosen.bitrate_bps,
            codec = %chosen.codec,
            candidates = formats.len(),
            "Audio format selected"
        );

        Ok(Self {
            ready: ReadyTrack {
                metadata,
                extras: RelatedAndLyrics::from_payload(&extras),
            },
            url,
        })
    }
}

impl NowPlayingController {
    /// Start loading `track`, superseding any load still in flight.
    ///
    /// The session flips to `Loading` before this returns. The returned task
    /// may be ignored; awaiting it waits for this attempt to settle.
    pub fn load_track(&self, track: TrackRef) -> JoinHandle<()> {
        let generation = self.store.begin_load(track.clone());
        tracing::info!(generation, track_id = %track.id, "Loading track");

        let controller = self.clone();
        tokio::spawn(async move { controller.run_load(generation, track).await })
    }

    /// Play a track picked from the related list. Picking the track that is
    /// already loaded does nothing. Expansion state is left as it is.
    pub fn select_related(&self, track: TrackRef) -> Option<JoinHandle<()>> {
        if self.store.current_track_id().as_deref() == Some(track.id.as_str()) {
            tracing::debug!(track_id = %track.id, "Related track already loaded");
            return None;
        }
        Some(self.load_track(track))
    }

    /// Load the current track again after an error.
    pub fn retry(&self) -> Option<JoinHandle<()>> {
        let track = self.store.snapshot().track?;
        Some(self.load_track(track))
    }

    async fn run_load(&self, generation: u64, track: TrackRef) {
        let id = track.id.as_str();
        let (metadata, extras, formats) = tokio::join!(
            self.metadata.fetch_track(id),
            self.metadata.fetch_related_and_lyrics(id),
            self.formats.fetch_formats(id),
        );

        if !self.store.is_current(generation) {
            tracing::debug!(generation, track_id = id, "Discarding superseded fetch results");
            return;
        }

        let prepared =
            PreparedLoad::from_fetches(metadata, extras, formats, &self.config.format_policy);

        // One load at a time past this point, so at most one handle is open.
        let _creating = self.creation.lock().await;
        // A newer load may have installed its handle while we waited.
        if !self.store.is_current(generation) {
            tracing::debug!(generation, track_id = id, "Load superseded before engine setup");
            return;
        }

        let previous = self.slot().take();
        if let Some(previous) = previous {
            previous.release().await;
        }

        let prepared = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                self.fail(generation, id, e);
                return;
            }
        };

        let handle = match self.engine.create(&prepared.url, true).await {
            Ok(handle) => handle,
            Err(e) => {
                self.fail(generation, id, LoadError::decode(&e));
                return;
            }
        };

        if !self.store.mark_ready(generation, prepared.ready) {
            tracing::debug!(generation, track_id = id, "Load superseded during engine setup, releasing handle");
            if let Err(e) = handle.unload().await {
                tracing::warn!(error = %e, "Failed to unload superseded handle");
            }
            return;
        }

        let mut poller = PositionPoller::new(self.store.clone(), self.config.poll_interval);
        let started = poller.start(handle.clone(), generation);
        let active = ActiveEngine {
            generation,
            handle,
            poller,
        };

        // Install only while still current; `dismiss` resets the session
        // before it empties the slot, so it either sees this engine or we see
        // the new generation.
        let stale = {
            let mut slot = self.slot();
            if started && self.store.is_current(generation) {
                *slot = Some(active);
                None
            } else {
                Some(active)
            }
        };
        if let Some(stale) = stale {
            tracing::debug!(generation, track_id = id, "Superseded between ready and install");
            stale.release().await;
            return;
        }

        tracing::info!(generation, track_id = id, url = %prepared.url, "Track ready");
    }

    fn fail(&self, generation: u64, track_id: &str, error: LoadError) {
        tracing::warn!(generation, track_id, error = %error, "Track load failed");
        self.store.mark_failed(generation, error);
    }
}
