//! Scriptable collaborators shared by the integration tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{json, Value};
use tokio::sync::Semaphore;

use now_playing::audio::{AudioEngine, AudioHandle, TransportStatus};
use now_playing::config::PlayerConfig;
use now_playing::model::{AudioFormatCandidate, FormatProvider, MetadataProvider, TrackMetadata, TrackRef};
use now_playing::NowPlayingController;

pub const TRACK_DURATION_MS: u64 = 200_000;

pub fn url_for(id: &str) -> String {
    format!("fake://{id}/aac")
}

pub fn track(id: &str) -> TrackRef {
    TrackRef::new(id).with_title(format!("Title {id}")).with_artist("Artist")
}

/// Catalog answering every id unless told otherwise.
#[derive(Default)]
pub struct FakeCatalog {
    formats: Mutex<HashMap<String, Vec<AudioFormatCandidate>>>,
    failing_metadata: Mutex<HashSet<String>>,
    failing_related: Mutex<HashSet<String>>,
    format_gates: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl FakeCatalog {
    pub fn set_formats(&self, id: &str, formats: Vec<AudioFormatCandidate>) {
        self.formats.lock().unwrap().insert(id.to_string(), formats);
    }

    pub fn fail_metadata(&self, id: &str) {
        self.failing_metadata.lock().unwrap().insert(id.to_string());
    }

    pub fn fail_related(&self, id: &str) {
        self.failing_related.lock().unwrap().insert(id.to_string());
    }

    /// Hold `fetch_formats(id)` until the returned semaphore gets a permit.
    pub fn gate_formats(&self, id: &str) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.format_gates.lock().unwrap().insert(id.to_string(), gate.clone());
        gate
    }
}

impl MetadataProvider for FakeCatalog {
    fn fetch_track<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<TrackMetadata>> {
        async move {
            tokio::task::yield_now().await;
            if self.failing_metadata.lock().unwrap().contains(id) {
                bail!("metadata service unavailable for {id}");
            }
            Ok(TrackMetadata {
                title: Some(format!("Title {id}")),
                artist: Some("Artist".to_string()),
                poster_url: None,
                poster_large_url: Some(format!("https://img.test/{id}.jpg")),
                duration_ms: Some(TRACK_DURATION_MS),
            })
        }
        .boxed()
    }

    fn fetch_related_and_lyrics<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Value>> {
        async move {
            tokio::task::yield_now().await;
            if self.failing_related.lock().unwrap().contains(id) {
                bail!("related service unavailable for {id}");
            }
            Ok(json!({
                "lyrics": { "lines": [{ "text": "first line" }, { "text": "second line" }] },
                "related": [
                    { "videoId": format!("{id}-rel-1"), "title": "Related One", "artist": "Someone" },
                    { "id": format!("{id}-rel-2"), "title": "Related Two", "artists": [{ "name": "Other" }] },
                    { "title": "No id, skipped" },
                ],
            }))
        }
        .boxed()
    }
}

impl FormatProvider for FakeCatalog {
    fn fetch_formats<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Vec<AudioFormatCandidate>>> {
        async move {
            let gate = self.format_gates.lock().unwrap().get(id).cloned();
            if let Some(gate) = gate {
                gate.acquire().await?.forget();
            }
            tokio::task::yield_now().await;
            let scripted = self.formats.lock().unwrap().get(id).cloned();
            Ok(scripted.unwrap_or_else(|| {
                vec![
                    AudioFormatCandidate::new(format!("fake://{id}/opus"), 160_000, "opus"),
                    AudioFormatCandidate::new(url_for(id), 128_000, "mp4a.40.2"),
                ]
            }))
        }
        .boxed()
    }
}

#[derive(Debug, Default)]
struct Transport {
    position_ms: u64,
    duration_ms: u64,
    is_playing: bool,
    finished: bool,
    unloaded: bool,
}

/// Handle whose transport the test scripts directly.
pub struct FakeHandle {
    pub url: String,
    transport: Mutex<Transport>,
    status_calls: AtomicUsize,
    live: Arc<AtomicUsize>,
}

impl FakeHandle {
    pub fn set_transport(&self, position_ms: u64, is_playing: bool, finished: bool) {
        let mut transport = self.transport.lock().unwrap();
        transport.position_ms = position_ms;
        transport.is_playing = is_playing;
        transport.finished = finished;
    }

    pub fn is_playing(&self) -> bool {
        self.transport.lock().unwrap().is_playing
    }

    pub fn position_ms(&self) -> u64 {
        self.transport.lock().unwrap().position_ms
    }

    pub fn is_unloaded(&self) -> bool {
        self.transport.lock().unwrap().unloaded
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    fn live_op(&self, f: impl FnOnce(&mut Transport)) -> Result<()> {
        let mut transport = self.transport.lock().unwrap();
        if transport.unloaded {
            bail!("handle {} unloaded", self.url);
        }
        f(&mut transport);
        Ok(())
    }
}

impl AudioHandle for FakeHandle {
    fn play(&self) -> BoxFuture<'_, Result<()>> {
        async move { self.live_op(|t| t.is_playing = true) }.boxed()
    }

    fn pause(&self) -> BoxFuture<'_, Result<()>> {
        async move { self.live_op(|t| t.is_playing = false) }.boxed()
    }

    fn seek(&self, position_ms: u64) -> BoxFuture<'_, Result<()>> {
        async move { self.live_op(|t| t.position_ms = position_ms) }.boxed()
    }

    fn unload(&self) -> BoxFuture<'_, Result<()>> {
        async move {
            let mut transport = self.transport.lock().unwrap();
            if !transport.unloaded {
                transport.unloaded = true;
                transport.is_playing = false;
                self.live.fetch_sub(1, Ordering::SeqCst);
            }
            Ok(())
        }
        .boxed()
    }

    fn status(&self) -> BoxFuture<'_, Result<TransportStatus>> {
        async move {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            let transport = self.transport.lock().unwrap();
            if transport.unloaded {
                bail!("handle {} unloaded", self.url);
            }
            Ok(TransportStatus {
                position_ms: transport.position_ms,
                duration_ms: transport.duration_ms,
                is_playing: transport.is_playing,
                finished: transport.finished,
            })
        }
        .boxed()
    }
}

/// Engine counting how many handles are open at once.
#[derive(Default)]
pub struct FakeEngine {
    handles: Mutex<Vec<Arc<FakeHandle>>>,
    failing_urls: Mutex<HashSet<String>>,
    create_gates: Mutex<HashMap<String, Arc<Semaphore>>>,
    pending_creates: AtomicUsize,
    live: Arc<AtomicUsize>,
    max_live: AtomicUsize,
}

impl FakeEngine {
    pub fn fail_url(&self, url: &str) {
        self.failing_urls.lock().unwrap().insert(url.to_string());
    }

    /// Hold `create(url)` until the returned semaphore gets a permit.
    pub fn gate_create(&self, url: &str) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.create_gates.lock().unwrap().insert(url.to_string(), gate.clone());
        gate
    }

    pub fn pending_creates(&self) -> usize {
        self.pending_creates.load(Ordering::SeqCst)
    }

    pub fn handles(&self) -> Vec<Arc<FakeHandle>> {
        self.handles.lock().unwrap().clone()
    }

    pub fn handle(&self, index: usize) -> Arc<FakeHandle> {
        self.handles()[index].clone()
    }

    pub fn created_urls(&self) -> Vec<String> {
        self.handles().iter().map(|h| h.url.clone()).collect()
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn max_live(&self) -> usize {
        self.max_live.load(Ordering::SeqCst)
    }
}

impl AudioEngine for FakeEngine {
    fn create<'a>(&'a self, url: &'a str, autoplay: bool) -> BoxFuture<'a, Result<Arc<dyn AudioHandle>>> {
        async move {
            let gate = self.create_gates.lock().unwrap().get(url).cloned();
            if let Some(gate) = gate {
                self.pending_creates.fetch_add(1, Ordering::SeqCst);
                gate.acquire().await?.forget();
                self.pending_creates.fetch_sub(1, Ordering::SeqCst);
            }
            if self.failing_urls.lock().unwrap().contains(url) {
                return Err(anyhow!("cannot decode {url}"));
            }

            let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_live.fetch_max(live, Ordering::SeqCst);

            let handle = Arc::new(FakeHandle {
                url: url.to_string(),
                transport: Mutex::new(Transport {
                    duration_ms: TRACK_DURATION_MS,
                    is_playing: autoplay,
                    ..Transport::default()
                }),
                status_calls: AtomicUsize::new(0),
                live: self.live.clone(),
            });
            self.handles.lock().unwrap().push(handle.clone());
            Ok(handle as Arc<dyn AudioHandle>)
        }
        .boxed()
    }
}

pub struct Harness {
    pub controller: NowPlayingController,
    pub catalog: Arc<FakeCatalog>,
    pub engine: Arc<FakeEngine>,
}

pub fn harness() -> Harness {
    let catalog = Arc::new(FakeCatalog::default());
    let engine = Arc::new(FakeEngine::default());
    let controller = NowPlayingController::new(
        PlayerConfig::default(),
        catalog.clone(),
        catalog.clone(),
        engine.clone(),
    );
    Harness {
        controller,
        catalog,
        engine,
    }
}
