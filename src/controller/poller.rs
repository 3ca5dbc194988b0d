//! Position polling for the active audio handle

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::audio::AudioHandle;
use crate::model::{SampleOutcome, SessionStore};

struct PollerTask {
    id: u64,
    task: JoinHandle<()>,
}

/// Samples one [`AudioHandle`]'s transport on a fixed interval and writes it
/// into the session.
///
/// Writes go through [`SessionStore::apply_sample`], which only accepts the
/// currently active poller id. Retiring the id under the store lock is what
/// makes [`PositionPoller::stop`] synchronous: once it returns, no sample from
/// this poller can land.
pub struct PositionPoller {
    store: Arc<SessionStore>,
    interval: Duration,
    current: Option<PollerTask>,
}

impl PositionPoller {
    pub fn new(store: Arc<SessionStore>, interval: Duration) -> Self {
        Self {
            store,
            interval,
            current: None,
        }
    }

    /// Start sampling `handle` for the session of `generation`. Any previous
    /// run of this poller is stopped first. Returns `false` when that
    /// generation is no longer the live `Ready` session.
    pub fn start(&mut self, handle: Arc<dyn AudioHandle>, generation: u64) -> bool {
        self.stop();

        let Some(id) = self.store.activate_poller(generation) else {
            tracing::debug!(generation, "Poller not started, session superseded");
            return false;
        };

        tracing::debug!(poller_id = id, generation, "Position poller started");
        let task = tokio::spawn(run(self.store.clone(), handle, id, self.interval));
        self.current = Some(PollerTask { id, task });
        true
    }

    /// Idempotent.
    pub fn stop(&mut self) {
        if let Some(PollerTask { id, task }) = self.current.take() {
            if self.store.retire_poller(id) {
                tracing::debug!(poller_id = id, "Position poller stopped");
            }
            task.abort();
        }
    }

    /// Still sampling. A poller that saw the end of the stream reports `false`.
    pub fn is_running(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|current| self.store.active_poller() == Some(current.id))
    }
}

impl Drop for PositionPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run(store: Arc<SessionStore>, handle: Arc<dyn AudioHandle>, id: u64, interval: Duration) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        let status = match handle.status().await {
            Ok(status) => status,
            Err(e) => {
                tracing::trace!(poller_id = id, error = %e, "Transport status unavailable");
                if store.active_poller() != Some(id) {
                    break;
                }
                continue;
            }
        };

        match store.apply_sample(id, &status) {
            SampleOutcome::Applied => {
                tracing::trace!(poller_id = id, position_ms = status.position_ms, "Position sampled");
            }
            SampleOutcome::Finished => {
                tracing::debug!(poller_id = id, "Playback finished, poller stopping");
                break;
            }
            SampleOutcome::Ignored => break,
        }
    }
}
