//! Model module - Session state and data types
//!
//! This module contains the data the controller owns and the seams it reads
//! from. It is organized into submodules by responsibility:
//!
//! - `types`: Track references, metadata, format candidates, tabs
//! - `session`: The live `TrackSession` and its generation-guarded store
//! - `payload`: Lyrics / related-track normalization
//! - `format`: Audio stream selection policy
//! - `provider`: Metadata and format provider traits

mod types;
mod session;
mod payload;
mod format;
mod provider;

pub use types::{
    AudioFormatCandidate, PlayerTab, TrackMetadata, TrackRef, UiState,
    PLACEHOLDER_ARTWORK_URL, UNKNOWN_ARTIST, UNKNOWN_TITLE,
};

pub use session::{LoadStatus, ReadyTrack, SampleOutcome, SessionStore, TrackSession};

pub use payload::{normalize_lyrics, normalize_related, RelatedAndLyrics, NO_LYRICS_PLACEHOLDER};

pub use format::select_format;

pub use provider::{FormatProvider, MetadataProvider};
