//! Now-playing controller
//!
//! Headless core of a mini player that expands into a full player: track
//! session loading with supersession, position polling, and the gesture-driven
//! expand/collapse machine with its interpolated visuals. The terminal
//! front-end in `view` and the binary are thin hosts around it.

pub mod audio;
pub mod config;
pub mod controller;
pub mod error;
pub mod expansion;
pub mod logging;
pub mod model;
pub mod view;

pub use audio::{AudioEngine, AudioHandle, TransportStatus};
pub use config::PlayerConfig;
pub use controller::NowPlayingController;
pub use error::{ErrorKind, LoadError};
