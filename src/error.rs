//! Load error types
//!
//! Collaborators report failures as `anyhow::Error`; the controller folds them
//! into a [`LoadError`] so the session can carry a typed, comparable error.

use thiserror::Error;

/// Why a single `load_track` attempt ended in `LoadStatus::Error`.
///
/// All variants are terminal for that attempt. Recovery is a new load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Metadata, related/lyrics or format fetch failed
    #[error("Network request failed: {0}")]
    NetworkFailure(String),

    /// Candidate set was empty or the chosen candidate had no URL
    #[error("No audio format found")]
    NoAudioFormatFound,

    /// The audio engine could not open the selected stream
    #[error("Audio decode failed: {0}")]
    DecodeFailure(String),
}

/// Discriminant of [`LoadError`] without the payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NetworkFailure,
    NoAudioFormatFound,
    DecodeFailure,
}

impl LoadError {
    pub fn network(error: &anyhow::Error) -> Self {
        Self::NetworkFailure(format!("{error:#}"))
    }

    pub fn decode(error: &anyhow::Error) -> Self {
        Self::DecodeFailure(format!("{error:#}"))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NetworkFailure(_) => ErrorKind::NetworkFailure,
            Self::NoAudioFormatFound => ErrorKind::NoAudioFormatFound,
            Self::DecodeFailure(_) => ErrorKind::DecodeFailure,
        }
    }

    /// Message shown next to the retry affordance.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NetworkFailure(_) => "Failed to load track. Check your connection and retry.",
            Self::NoAudioFormatFound => "This track has no playable audio stream.",
            Self::DecodeFailure(_) => "Could not play this track's audio stream.",
        }
    }
}
