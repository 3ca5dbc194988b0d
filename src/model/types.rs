//! Core type definitions for the player

use serde_json::Value;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const PLACEHOLDER_ARTWORK_URL: &str = "https://via.placeholder.com/300";

/// What the UI asked to play
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackRef {
    pub id: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub poster_url: Option<String>,
}

impl TrackRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            artist: None,
            poster_url: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    /// Build a reference from one provider list entry.
    ///
    /// Entries without an identifier are not playable and yield `None`.
    pub fn from_json(entry: &Value) -> Option<Self> {
        let id = string_field(entry, "videoId").or_else(|| string_field(entry, "id"))?;

        let artist = string_field(entry, "artist").or_else(|| {
            entry
                .get("artists")
                .and_then(Value::as_array)
                .and_then(|artists| artists.first())
                .and_then(|first| string_field(first, "name"))
        });

        let poster_url = string_field(entry, "poster").or_else(|| {
            entry
                .get("thumbnails")
                .and_then(Value::as_array)
                .and_then(|thumbs| thumbs.first())
                .and_then(|first| string_field(first, "url"))
        });

        Some(Self {
            id,
            title: string_field(entry, "title"),
            artist,
            poster_url,
        })
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Details returned by `MetadataProvider::fetch_track`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub poster_url: Option<String>,
    pub poster_large_url: Option<String>,
    pub duration_ms: Option<u64>,
}

/// One candidate stream returned by `FormatProvider::fetch_formats`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioFormatCandidate {
    pub url: Option<String>,
    pub bitrate_bps: u32,
    pub codec: String,
}

impl AudioFormatCandidate {
    pub fn new(url: impl Into<String>, bitrate_bps: u32, codec: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            bitrate_bps,
            codec: codec.into(),
        }
    }
}

/// Tabs of the full player
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlayerTab {
    #[default]
    Player,
    Lyrics,
    Related,
}

impl PlayerTab {
    pub fn next(self) -> Self {
        match self {
            Self::Player => Self::Lyrics,
            Self::Lyrics => Self::Related,
            Self::Related => Self::Player,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Player => Self::Related,
            Self::Lyrics => Self::Player,
            Self::Related => Self::Lyrics,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Player => "Player",
            Self::Lyrics => "Lyrics",
            Self::Related => "Related",
        }
    }
}

/// Host-side UI state that never feeds back into the session
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub active_tab: PlayerTab,
    pub related_selected: usize,
    pub should_quit: bool,
}
