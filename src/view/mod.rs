//! View module - UI rendering
//!
//! This module renders the player with ratatui. The player container's rows
//! come from the current `VisualParams`, scaled from layout pixels to
//! terminal rows:
//!
//! - `utils`: Shared formatting helpers
//! - `mini`: Collapsed mini player bar
//! - `full`: Expanded player with tabs

mod full;
mod mini;
mod utils;

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem},
    Frame,
};

use crate::config::LayoutMetrics;
use crate::expansion::{ExpansionSnapshot, VisualParams};
use crate::model::{TrackRef, TrackSession, UiState};

pub use utils::{accent_colors, format_duration, px_to_rows};

const MIN_CONTAINER_ROWS: u16 = 3;
/// Opacity below which a layer is not drawn
const VISIBLE_OPACITY: f64 = 0.05;

pub struct PlayerView;

impl PlayerView {
    /// Rows per layout pixel for a terminal of `rows` lines.
    pub fn rows_per_px(rows: u16, layout: &LayoutMetrics) -> f64 {
        f64::from(rows) / layout.screen_height
    }

    pub fn render(
        frame: &mut Frame,
        session: &TrackSession,
        expansion: &ExpansionSnapshot,
        visuals: &VisualParams,
        layout: &LayoutMetrics,
        ui_state: &UiState,
        shortcuts: &[TrackRef],
    ) {
        let area = frame.area();
        render_background(frame, area, shortcuts, visuals.backdrop_opacity);

        let scale = Self::rows_per_px(area.height, layout);
        let height = px_to_rows(visuals.container_height, scale)
            .max(MIN_CONTAINER_ROWS)
            .min(area.height);
        let top = px_to_rows(visuals.container_top, scale).min(area.height.saturating_sub(height));
        let container = Rect::new(area.x, area.y + top, area.width, height);

        frame.render_widget(Clear, container);

        if visuals.mini_player_opacity >= VISIBLE_OPACITY
            && visuals.mini_player_opacity >= visuals.full_player_opacity
        {
            mini::render_mini_player(frame, container, session);
        } else if visuals.full_player_opacity >= VISIBLE_OPACITY {
            full::render_full_player(frame, container, session, ui_state, expansion.allow_interaction);
        } else {
            // Mid-transition: only the morphing container is visible.
            frame.render_widget(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
                container,
            );
        }
    }
}

fn render_background(frame: &mut Frame, area: Rect, shortcuts: &[TrackRef], backdrop_opacity: f64) {
    let style = if backdrop_opacity > VISIBLE_OPACITY {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
    } else {
        Style::default().fg(Color::White)
    };

    let items: Vec<ListItem> = shortcuts
        .iter()
        .enumerate()
        .map(|(i, track)| {
            ListItem::new(format!(
                " {}  {} · {}",
                i + 1,
                track.title.as_deref().unwrap_or(crate::model::UNKNOWN_TITLE),
                track.artist.as_deref().unwrap_or(crate::model::UNKNOWN_ARTIST)
            ))
        })
        .collect();

    let list = List::new(items).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Library (press 1-9 to play) ")
            .border_style(style),
    );
    frame.render_widget(list, area);
}
