//! Catalog collaborator seams
//!
//! Metadata, lyrics/related and format discovery are external services. The
//! controller only sees these traits.

use anyhow::Result;
use futures::future::BoxFuture;
use serde_json::Value;

use super::types::{AudioFormatCandidate, TrackMetadata};

pub trait MetadataProvider: Send + Sync {
    fn fetch_track<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<TrackMetadata>>;

    /// Raw related/lyrics payload, normalized by `RelatedAndLyrics::from_payload`.
    fn fetch_related_and_lyrics<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Value>>;
}

pub trait FormatProvider: Send + Sync {
    fn fetch_formats<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Vec<AudioFormatCandidate>>>;
}
