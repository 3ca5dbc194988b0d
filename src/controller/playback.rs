//! Playback control methods
//!
//! Transport calls only drive the handle of the live `Ready` session. While a
//! newer load is in flight they are no-ops, and they never wait on handle
//! creation.

use super::NowPlayingController;

impl NowPlayingController {
    /// Pause when playing, resume otherwise. No-op without a ready handle.
    pub async fn toggle_playback(&self) {
        let Some((generation, handle)) = self.transport_target() else {
            tracing::debug!("Toggle ignored, no ready audio handle");
            return;
        };

        let is_playing = self.store.is_playing();
        tracing::debug!(generation, is_playing, "Toggling playback");

        let result = if is_playing {
            handle.pause().await
        } else {
            handle.play().await
        };

        if let Err(e) = result {
            tracing::error!(error = %e, "Toggle playback failed");
            return;
        }

        if !self.store.update(generation, |session| session.is_playing = !is_playing) {
            tracing::debug!(generation, "Session superseded during toggle");
            return;
        }

        // The poller stops itself at end of stream; resuming needs a new one.
        if !is_playing {
            let mut slot = self.slot();
            if let Some(active) = slot.as_mut().filter(|active| active.generation == generation) {
                if !active.poller.is_running() {
                    active.poller.start(active.handle.clone(), generation);
                }
            }
        }

        tracing::info!(action = if is_playing { "paused" } else { "resumed" }, "Playback toggled");
    }

    /// Seek the active handle. No-op without a ready handle.
    pub async fn seek_to(&self, position_ms: u64) {
        let Some((generation, handle)) = self.transport_target() else {
            tracing::debug!(position_ms, "Seek ignored, no ready audio handle");
            return;
        };

        let duration_ms = self.store.snapshot().duration_ms;
        let target = if duration_ms > 0 {
            position_ms.min(duration_ms)
        } else {
            position_ms
        };

        match handle.seek(target).await {
            Ok(()) => {
                if self.store.update(generation, |session| session.position_ms = target) {
                    tracing::debug!(position_ms = target, "Seeked");
                } else {
                    tracing::debug!(generation, "Session superseded during seek");
                }
            }
            Err(e) => tracing::error!(position_ms = target, error = %e, "Seek failed"),
        }
    }

    /// Seek relative to the current position, clamped at zero.
    pub async fn seek_by(&self, delta_ms: i64) {
        let position_ms = self.store.snapshot().position_ms;
        self.seek_to(position_ms.saturating_add_signed(delta_ms)).await;
    }

    /// Tear the session down: in-flight loads become stale, the poller stops
    /// and the handle is unloaded.
    pub async fn dismiss(&self) {
        let generation = self.store.reset();
        tracing::info!(generation, "Player dismissed");

        let active = self.slot().take();
        if let Some(active) = active {
            active.release().await;
        }
    }
}
