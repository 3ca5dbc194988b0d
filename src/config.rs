//! Player configuration
//!
//! Every tunable of the controller lives here with its default. Nothing in
//! this module is mutated after the controller is built.

use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);
pub const DEFAULT_MIN_BITRATE_BPS: u32 = 128_000;
pub const DEFAULT_PREFERRED_CODEC: &str = "mp4a";

const MINI_PLAYER_HEIGHT: f64 = 60.0;
const MINI_PLAYER_MARGIN_BOTTOM: f64 = 90.0;
const DEFAULT_SCREEN_HEIGHT: f64 = 800.0;

/// Preferred-stream policy used by `select_format`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatPolicy {
    pub min_bitrate_bps: u32,
    /// Codec family prefix, matched against the start of a candidate's codec string
    pub codec: String,
}

impl Default for FormatPolicy {
    fn default() -> Self {
        Self {
            min_bitrate_bps: DEFAULT_MIN_BITRATE_BPS,
            codec: DEFAULT_PREFERRED_CODEC.to_string(),
        }
    }
}

/// Geometry of the collapsed and expanded layouts, in layout pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutMetrics {
    pub screen_height: f64,
    pub mini_height: f64,
    pub mini_margin_bottom: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            screen_height: DEFAULT_SCREEN_HEIGHT,
            mini_height: MINI_PLAYER_HEIGHT,
            mini_margin_bottom: MINI_PLAYER_MARGIN_BOTTOM,
        }
    }
}

impl LayoutMetrics {
    pub fn with_screen_height(screen_height: f64) -> Self {
        Self {
            screen_height,
            ..Self::default()
        }
    }

    /// Vertical distance a finger travels between the two layouts.
    pub fn travel_distance(&self) -> f64 {
        (self.screen_height - self.mini_height - self.mini_margin_bottom).max(1.0)
    }

    /// Top offset of the collapsed container.
    pub fn mini_top(&self) -> f64 {
        self.screen_height - self.mini_height - self.mini_margin_bottom
    }
}

/// Spring constants in tension/friction form
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub tension: f64,
    pub friction: f64,
    pub rest_displacement: f64,
    pub rest_speed: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            tension: 50.0,
            friction: 8.0,
            rest_displacement: 0.01,
            rest_speed: 0.01,
        }
    }
}

impl SpringConfig {
    pub fn stiffness(&self) -> f64 {
        (self.tension - 30.0) * 3.62 + 194.0
    }

    pub fn damping(&self) -> f64 {
        (self.friction - 8.0) * 3.0 + 25.0
    }
}

#[derive(Clone, Debug)]
pub struct PlayerConfig {
    pub format_policy: FormatPolicy,
    pub poll_interval: Duration,
    pub layout: LayoutMetrics,
    pub spring: SpringConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            format_policy: FormatPolicy::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            layout: LayoutMetrics::default(),
            spring: SpringConfig::default(),
        }
    }
}

impl PlayerConfig {
    pub fn with_layout(mut self, layout: LayoutMetrics) -> Self {
        self.layout = layout;
        self
    }
}
