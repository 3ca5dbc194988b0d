//! Audio engine seam
//!
//! The controller never talks to a concrete decoder. It opens streams through
//! an [`AudioEngine`] and drives the returned [`AudioHandle`]. Status is pulled
//! by the position poller instead of pushed through callbacks.

use std::sync::Arc;

use anyhow::Result;
use futures::future::BoxFuture;

/// Transport snapshot returned by [`AudioHandle::status`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransportStatus {
    pub position_ms: u64,
    pub duration_ms: u64,
    pub is_playing: bool,
    /// Playback reached the end of the stream
    pub finished: bool,
}

pub trait AudioEngine: Send + Sync {
    /// Open `url` and return a handle to it. Fails with a decode error when
    /// the stream cannot be opened.
    fn create<'a>(&'a self, url: &'a str, autoplay: bool) -> BoxFuture<'a, Result<Arc<dyn AudioHandle>>>;
}

/// One open stream. Dropped handles are not unloaded implicitly; the owner
/// calls [`AudioHandle::unload`].
pub trait AudioHandle: Send + Sync {
    fn play(&self) -> BoxFuture<'_, Result<()>>;

    fn pause(&self) -> BoxFuture<'_, Result<()>>;

    fn seek(&self, position_ms: u64) -> BoxFuture<'_, Result<()>>;

    fn unload(&self) -> BoxFuture<'_, Result<()>>;

    fn status(&self) -> BoxFuture<'_, Result<TransportStatus>>;
}
