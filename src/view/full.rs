//! Full player rendering (player / lyrics / related tabs)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::model::{LoadStatus, PlayerTab, TrackSession, UiState};
use super::utils::{accent_colors, format_duration};

const TABS: [PlayerTab; 3] = [PlayerTab::Player, PlayerTab::Lyrics, PlayerTab::Related];

pub fn render_full_player(
    frame: &mut Frame,
    area: Rect,
    session: &TrackSession,
    ui_state: &UiState,
    interactive: bool,
) {
    let (primary, secondary) = accent_colors(session.track_id());
    let border_style = if interactive {
        Style::default().fg(primary)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Now Playing ")
        .title_bottom(Line::from(" ↓ close · tab switch · enter play related ").right_aligned());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tabs
            Constraint::Min(0),    // Tab content
        ])
        .split(inner);

    let selected = TABS.iter().position(|tab| *tab == ui_state.active_tab).unwrap_or(0);
    let tabs = Tabs::new(TABS.iter().map(|tab| tab.title()))
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(primary).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, chunks[0]);

    match ui_state.active_tab {
        PlayerTab::Player => render_player_tab(frame, chunks[1], session, primary, secondary),
        PlayerTab::Lyrics => render_lyrics_tab(frame, chunks[1], session),
        PlayerTab::Related => render_related_tab(frame, chunks[1], session, ui_state, primary),
    }
}

fn render_player_tab(frame: &mut Frame, area: Rect, session: &TrackSession, primary: Color, secondary: Color) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Track info
            Constraint::Length(3), // Progress
        ])
        .split(area);

    let mut lines = vec![
        Line::from(Span::styled(
            session.title().to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(session.artist().to_string(), Style::default().fg(secondary))),
        Line::from(Span::styled(
            format!("Artwork: {}", session.artwork_url()),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    match session.status {
        LoadStatus::Loading => lines.push(Line::from("Loading...")),
        LoadStatus::Error => {
            if let Some(error) = &session.error {
                lines.push(Line::from(Span::styled(
                    error.user_message(),
                    Style::default().fg(Color::Red),
                )));
                lines.push(Line::from("Press r to retry"));
            }
        }
        LoadStatus::Ready => {
            let state = if session.is_playing { "▶ Playing" } else { "⏸  Paused" };
            lines.push(Line::from(state));
        }
        LoadStatus::Idle => {}
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), chunks[0]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(primary))
        .ratio(session.progress_ratio())
        .label(format!(
            "{} / {}",
            format_duration(session.position_ms),
            format_duration(session.duration_ms)
        ));
    frame.render_widget(gauge, chunks[1]);
}

fn render_lyrics_tab(frame: &mut Frame, area: Rect, session: &TrackSession) {
    let text = if session.status == LoadStatus::Ready {
        session.lyrics.as_str()
    } else {
        ""
    };
    let lyrics = Paragraph::new(text)
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false });
    frame.render_widget(lyrics, area);
}

fn render_related_tab(frame: &mut Frame, area: Rect, session: &TrackSession, ui_state: &UiState, primary: Color) {
    if session.related.is_empty() {
        frame.render_widget(
            Paragraph::new("No related tracks").style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = session
        .related
        .iter()
        .map(|track| {
            let title = track.title.as_deref().unwrap_or(crate::model::UNKNOWN_TITLE);
            let artist = track.artist.as_deref().unwrap_or(crate::model::UNKNOWN_ARTIST);
            ListItem::new(format!("{title} · {artist}"))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().fg(primary).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");

    let mut list_state = ListState::default();
    list_state.select(Some(ui_state.related_selected.min(session.related.len() - 1)));

    frame.render_stateful_widget(list, area, &mut list_state);
}
