//! Utility functions for rendering player components

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use ratatui::style::Color;

const ACCENT_PALETTE: [(u8, u8, u8); 20] = [
    (0x1D, 0xB9, 0x54),
    (0xE9, 0x1E, 0x63),
    (0x9C, 0x27, 0xB0),
    (0x3F, 0x51, 0xB5),
    (0xFF, 0x98, 0x00),
    (0x7B, 0x68, 0xEE),
    (0x93, 0x70, 0xDB),
    (0x00, 0xCE, 0xD1),
    (0xFF, 0x63, 0x47),
    (0x46, 0x82, 0xB4),
    (0x20, 0xB2, 0xAA),
    (0x6A, 0x5A, 0xCD),
    (0x8A, 0x2B, 0xE2),
    (0xFF, 0x45, 0x00),
    (0x32, 0xCD, 0x32),
    (0xBA, 0x55, 0xD3),
    (0x41, 0x69, 0xE1),
    (0xFF, 0x14, 0x93),
    (0x00, 0xBF, 0xFF),
    (0xFF, 0x7F, 0x50),
];

const SECONDARY_SHADE: i16 = -30;

pub fn format_duration(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}

/// Stable per-track accent, `(primary, secondary)`.
pub fn accent_colors(track_id: Option<&str>) -> (Color, Color) {
    let Some(id) = track_id else {
        return (Color::Green, Color::DarkGray);
    };
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let (r, g, b) = ACCENT_PALETTE[(hasher.finish() % ACCENT_PALETTE.len() as u64) as usize];
    (
        Color::Rgb(r, g, b),
        Color::Rgb(shade(r, SECONDARY_SHADE), shade(g, SECONDARY_SHADE), shade(b, SECONDARY_SHADE)),
    )
}

fn shade(channel: u8, amount: i16) -> u8 {
    (i16::from(channel) + amount).clamp(0, 255) as u8
}

/// Convert a layout-pixel length into terminal rows.
pub fn px_to_rows(px: f64, rows_per_px: f64) -> u16 {
    (px * rows_per_px).round().clamp(0.0, f64::from(u16::MAX)) as u16
}

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}
