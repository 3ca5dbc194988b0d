//! Mini player bar rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::model::{LoadStatus, TrackSession};
use super::utils::{accent_colors, format_duration, truncate_string};

pub fn render_mini_player(frame: &mut Frame, area: Rect, session: &TrackSession) {
    let (primary, secondary) = accent_colors(session.track_id());
    let max_title = area.width.saturating_sub(8) as usize;

    let status_text = match session.status {
        LoadStatus::Idle => " Nothing playing".to_string(),
        LoadStatus::Loading => format!(" … {}", session.title()),
        LoadStatus::Error => format!(" ! {}", session.title()),
        LoadStatus::Ready if session.is_playing => {
            format!(" ▶ {} | {}", session.title(), session.artist())
        }
        LoadStatus::Ready => format!("⏸  {} | {}", session.title(), session.artist()),
    };

    let label = match session.status {
        LoadStatus::Loading => "Loading...".to_string(),
        LoadStatus::Error => session
            .error
            .as_ref()
            .map(|e| format!("{} (r to retry)", e.user_message()))
            .unwrap_or_default(),
        _ => format!(
            "{} / {}",
            format_duration(session.position_ms),
            format_duration(session.duration_ms)
        ),
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(secondary))
                .title(truncate_string(&status_text, max_title))
                .title_bottom(Line::from(" ↑ open · space play/pause ").right_aligned()),
        )
        .gauge_style(Style::default().fg(primary).bg(Color::Black))
        .ratio(session.progress_ratio())
        .label(label);

    frame.render_widget(gauge, area);
}
