//! Lyrics and related-track normalization
//!
//! The related/lyrics endpoint is loosely shaped. Anything unexpected
//! degrades to a default instead of failing the load.

use serde_json::Value;

use super::types::TrackRef;

pub const NO_LYRICS_PLACEHOLDER: &str = "No lyrics available.";

/// Lyrics text and related tracks extracted from one provider payload
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedAndLyrics {
    pub lyrics: String,
    pub related: Vec<TrackRef>,
}

impl Default for RelatedAndLyrics {
    fn default() -> Self {
        Self {
            lyrics: NO_LYRICS_PLACEHOLDER.to_string(),
            related: Vec::new(),
        }
    }
}

impl RelatedAndLyrics {
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            lyrics: normalize_lyrics(payload.get("lyrics")),
            related: normalize_related(payload),
        }
    }
}

/// Plain strings pass through; `{ "lines": [{ "text": .. }] }` is joined
/// with newlines.
pub fn normalize_lyrics(lyrics: Option<&Value>) -> String {
    match lyrics {
        Some(Value::String(text)) if !text.trim().is_empty() => text.clone(),
        Some(Value::Object(object)) => match object.get("lines").and_then(Value::as_array) {
            Some(lines) => {
                let joined = lines
                    .iter()
                    .filter_map(|line| line.get("text").and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join("\n");
                if joined.trim().is_empty() {
                    NO_LYRICS_PLACEHOLDER.to_string()
                } else {
                    joined
                }
            }
            None => NO_LYRICS_PLACEHOLDER.to_string(),
        },
        _ => NO_LYRICS_PLACEHOLDER.to_string(),
    }
}

/// Related tracks come either under `related` or under `list`.
pub fn normalize_related(payload: &Value) -> Vec<TrackRef> {
    let entries = payload
        .get("related")
        .and_then(Value::as_array)
        .or_else(|| payload.get("list").and_then(Value::as_array));

    match entries {
        Some(entries) => entries.iter().filter_map(TrackRef::from_json).collect(),
        None => Vec::new(),
    }
}
