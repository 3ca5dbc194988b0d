//! In-process catalog and audio engine for the terminal front-end
//!
//! No network or decoder is involved: the catalog answers with canned
//! payloads after a short delay, and the engine simulates a transport clock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{json, Value};

use now_playing::audio::{AudioEngine, AudioHandle, TransportStatus};
use now_playing::model::{AudioFormatCandidate, FormatProvider, MetadataProvider, TrackMetadata, TrackRef};

const FETCH_DELAY: Duration = Duration::from_millis(250);
const OPEN_DELAY: Duration = Duration::from_millis(150);

struct DemoTrack {
    id: &'static str,
    title: &'static str,
    artist: &'static str,
    duration_ms: u64,
}

static TRACKS: [DemoTrack; 8] = [
    DemoTrack { id: "dQw4w9WgXcQ", title: "Harbor Lights", artist: "The Tidewater Band", duration_ms: 212_000 },
    DemoTrack { id: "kJQP7kiw5Fk", title: "Paper Satellites", artist: "Mira Solen", duration_ms: 187_000 },
    DemoTrack { id: "9bZkp7q19f0", title: "Slow Motion City", artist: "Northbound", duration_ms: 245_000 },
    DemoTrack { id: "3JZ_D3ELwOQ", title: "Glass Orchard", artist: "Lumen & Vale", duration_ms: 199_000 },
    DemoTrack { id: "L_jWHffIx5E", title: "Short Loop", artist: "Test Pattern", duration_ms: 15_000 },
    DemoTrack { id: "fJ9rUzIMcZQ", title: "Quiet Engine", artist: "Mira Solen", duration_ms: 231_000 },
    // No playable format
    DemoTrack { id: "no-formats", title: "Region Locked", artist: "Unavailable", duration_ms: 180_000 },
    // Stream opens fail
    DemoTrack { id: "broken-stream", title: "Corrupted Upload", artist: "Unknown Uploader", duration_ms: 160_000 },
];

fn find(id: &str) -> Result<&'static DemoTrack> {
    TRACKS
        .iter()
        .find(|track| track.id == id)
        .ok_or_else(|| anyhow!("track {id} not found"))
}

/// Library shown behind the player, bound to keys 1-9.
pub fn shortcuts() -> Vec<TrackRef> {
    TRACKS
        .iter()
        .map(|t| TrackRef::new(t.id).with_title(t.title).with_artist(t.artist))
        .collect()
}

pub struct DemoCatalog;

impl DemoCatalog {
    fn lyrics_for(track: &DemoTrack) -> Value {
        match track.id {
            // Line-structured lyrics
            "dQw4w9WgXcQ" | "3JZ_D3ELwOQ" => json!({
                "lines": [
                    { "text": format!("{} in the evening", track.title) },
                    { "text": "the harbor hums a tune" },
                    { "text": "" },
                    { "text": "and every light says stay" },
                ]
            }),
            "L_jWHffIx5E" => Value::Null,
            _ => Value::String(format!("{}\nby {}\n\n(instrumental)", track.title, track.artist)),
        }
    }
}

impl MetadataProvider for DemoCatalog {
    fn fetch_track<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<TrackMetadata>> {
        async move {
            tokio::time::sleep(FETCH_DELAY).await;
            let track = find(id)?;
            Ok(TrackMetadata {
                title: Some(track.title.to_string()),
                artist: Some(track.artist.to_string()),
                poster_url: Some(format!("https://img.example.com/{}/small.jpg", track.id)),
                poster_large_url: Some(format!("https://img.example.com/{}/large.jpg", track.id)),
                duration_ms: Some(track.duration_ms),
            })
        }
        .boxed()
    }

    fn fetch_related_and_lyrics<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Value>> {
        async move {
            tokio::time::sleep(FETCH_DELAY * 2).await;
            let track = find(id)?;
            let related: Vec<Value> = TRACKS
                .iter()
                .filter(|other| other.id != id)
                .take(5)
                .enumerate()
                .map(|(i, other)| {
                    // Alternate between the two entry shapes the catalog serves
                    if i % 2 == 0 {
                        json!({ "videoId": other.id, "title": other.title, "artist": other.artist })
                    } else {
                        json!({
                            "id": other.id,
                            "title": other.title,
                            "artists": [{ "name": other.artist }],
                            "thumbnails": [{ "url": format!("https://img.example.com/{}/small.jpg", other.id) }],
                        })
                    }
                })
                .collect();
            Ok(json!({ "lyrics": Self::lyrics_for(track), "related": related }))
        }
        .boxed()
    }
}

impl FormatProvider for DemoCatalog {
    fn fetch_formats<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Vec<AudioFormatCandidate>>> {
        async move {
            tokio::time::sleep(FETCH_DELAY).await;
            let track = find(id)?;
            if track.id == "no-formats" {
                return Ok(Vec::new());
            }
            let base = format!("demo://{}", track.id);
            Ok(vec![
                AudioFormatCandidate::new(format!("{base}/opus-160"), 160_000, "opus"),
                AudioFormatCandidate::new(format!("{base}/aac-48"), 48_000, "mp4a.40.5"),
                AudioFormatCandidate::new(format!("{base}/aac-128"), 128_000, "mp4a.40.2"),
            ])
        }
        .boxed()
    }
}

/// Transport clock for one simulated stream
struct Clock {
    position_ms: u64,
    last_update: Instant,
    is_playing: bool,
    duration_ms: u64,
    unloaded: bool,
}

impl Clock {
    fn current_position_ms(&self) -> u64 {
        if self.is_playing {
            let elapsed = self.last_update.elapsed().as_millis() as u64;
            self.position_ms.saturating_add(elapsed).min(self.duration_ms)
        } else {
            self.position_ms.min(self.duration_ms)
        }
    }

    /// Fold elapsed time into `position_ms`.
    fn settle(&mut self) {
        self.position_ms = self.current_position_ms();
        self.last_update = Instant::now();
    }
}

pub struct SimulatedEngine;

impl AudioEngine for SimulatedEngine {
    fn create<'a>(&'a self, url: &'a str, autoplay: bool) -> BoxFuture<'a, Result<Arc<dyn AudioHandle>>> {
        async move {
            tokio::time::sleep(OPEN_DELAY).await;
            let id = url
                .strip_prefix("demo://")
                .and_then(|rest| rest.split('/').next())
                .ok_or_else(|| anyhow!("unsupported url {url}"))?;
            let track = find(id)?;
            if track.id == "broken-stream" {
                bail!("invalid container header in {url}");
            }
            tracing::debug!(url, "Simulated stream opened");
            let handle: Arc<dyn AudioHandle> = Arc::new(SimulatedHandle {
                clock: Mutex::new(Clock {
                    position_ms: 0,
                    last_update: Instant::now(),
                    is_playing: autoplay,
                    duration_ms: track.duration_ms,
                    unloaded: false,
                }),
            });
            Ok(handle)
        }
        .boxed()
    }
}

struct SimulatedHandle {
    clock: Mutex<Clock>,
}

impl SimulatedHandle {
    fn clock(&self) -> MutexGuard<'_, Clock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_clock<T>(&self, f: impl FnOnce(&mut Clock) -> T) -> Result<T> {
        let mut clock = self.clock();
        if clock.unloaded {
            bail!("handle already unloaded");
        }
        clock.settle();
        Ok(f(&mut clock))
    }
}

impl AudioHandle for SimulatedHandle {
    fn play(&self) -> BoxFuture<'_, Result<()>> {
        async move {
            self.with_clock(|clock| {
                if clock.position_ms >= clock.duration_ms {
                    clock.position_ms = 0;
                }
                clock.is_playing = true;
            })
        }
        .boxed()
    }

    fn pause(&self) -> BoxFuture<'_, Result<()>> {
        async move { self.with_clock(|clock| clock.is_playing = false) }.boxed()
    }

    fn seek(&self, position_ms: u64) -> BoxFuture<'_, Result<()>> {
        async move { self.with_clock(|clock| clock.position_ms = position_ms.min(clock.duration_ms)) }.boxed()
    }

    fn unload(&self) -> BoxFuture<'_, Result<()>> {
        async move {
            let mut clock = self.clock();
            clock.unloaded = true;
            clock.is_playing = false;
            Ok(())
        }
        .boxed()
    }

    fn status(&self) -> BoxFuture<'_, Result<TransportStatus>> {
        async move {
            self.with_clock(|clock| {
                let finished = clock.position_ms >= clock.duration_ms;
                if finished {
                    clock.is_playing = false;
                }
                TransportStatus {
                    position_ms: clock.position_ms,
                    duration_ms: clock.duration_ms,
                    is_playing: clock.is_playing,
                    finished,
                }
            })
        }
        .boxed()
    }
}
