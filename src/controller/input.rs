//! Key and mouse event handling

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::expansion::{ExpansionState, GestureEvent};
use crate::model::{PlayerTab, TrackRef, UiState};

use super::NowPlayingController;

const SEEK_STEP_MS: i64 = 10_000;

/// Turns left-button mouse drags into pan gestures.
///
/// A press alone starts nothing; the drag begins once the pointer leaves the
/// row it was pressed on. Terminal rows are scaled to layout pixels with `px_per_row`; velocity is
/// reported in px/ms, positive downward.
#[derive(Debug, Default)]
pub struct DragTracker {
    start_row: Option<u16>,
    last_row: u16,
    last_at: Option<Instant>,
    velocity: f64,
    dragging: bool,
}

/// What a mouse event meant to the player
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerAction {
    /// First movement of a press: start the drag, then move to `dy`
    DragStart { dy: f64 },
    Gesture(GestureEvent),
    /// Press and release on the same row
    Tap,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_mouse(&mut self, event: MouseEvent, px_per_row: f64) -> Option<PointerAction> {
        let row = event.row;
        let now = Instant::now();
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.start_row = Some(row);
                self.last_row = row;
                self.last_at = Some(now);
                self.velocity = 0.0;
                self.dragging = false;
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let start = self.start_row?;
                if let Some(last_at) = self.last_at {
                    let elapsed_ms = now.duration_since(last_at).as_secs_f64() * 1000.0;
                    if elapsed_ms > 0.0 {
                        let rows = f64::from(row) - f64::from(self.last_row);
                        self.velocity = rows * px_per_row / elapsed_ms;
                    }
                }
                self.last_row = row;
                self.last_at = Some(now);
                let dy = (f64::from(row) - f64::from(start)) * px_per_row;
                if self.dragging {
                    Some(PointerAction::Gesture(GestureEvent::Move { dy }))
                } else if row != start {
                    self.dragging = true;
                    Some(PointerAction::DragStart { dy })
                } else {
                    None
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let start = self.start_row.take()?;
                if !std::mem::take(&mut self.dragging) {
                    return (row == start).then_some(PointerAction::Tap);
                }
                let dy = (f64::from(row) - f64::from(start)) * px_per_row;
                Some(PointerAction::Gesture(GestureEvent::Release {
                    dy,
                    velocity: self.velocity,
                }))
            }
            _ => None,
        }
    }
}

impl NowPlayingController {
    /// `shortcuts` are the tracks bound to the number keys.
    pub async fn handle_key_event(&self, key: KeyEvent, ui: &mut UiState, shortcuts: &[TrackRef]) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let expansion = self.expansion_snapshot();
        let full_player_active = expansion.allow_interaction;
        let related_len = self.session().related.len();

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => ui.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                ui.should_quit = true;
            }
            KeyCode::Char(' ') => self.toggle_playback().await,
            KeyCode::Left => self.seek_by(-SEEK_STEP_MS).await,
            KeyCode::Right => self.seek_by(SEEK_STEP_MS).await,
            KeyCode::Up if full_player_active && ui.active_tab == PlayerTab::Related => {
                ui.related_selected = ui.related_selected.saturating_sub(1);
            }
            KeyCode::Down if full_player_active && ui.active_tab == PlayerTab::Related => {
                if ui.related_selected + 1 < related_len {
                    ui.related_selected += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.expand(),
            KeyCode::Down | KeyCode::Char('j') => self.collapse(),
            KeyCode::Tab if full_player_active => ui.active_tab = ui.active_tab.next(),
            KeyCode::BackTab if full_player_active => ui.active_tab = ui.active_tab.prev(),
            KeyCode::Enter => {
                if full_player_active && ui.active_tab == PlayerTab::Related {
                    let picked = self.session().related.get(ui.related_selected).cloned();
                    if let Some(track) = picked {
                        if self.select_related(track).is_some() {
                            ui.related_selected = 0;
                        }
                    }
                } else if expansion.state == ExpansionState::Collapsed {
                    self.expand();
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.retry();
            }
            KeyCode::Esc => {
                if expansion.state == ExpansionState::Collapsed {
                    self.dismiss().await;
                } else {
                    self.collapse();
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                let index = c.to_digit(10).map_or(0, |d| d as usize - 1);
                if let Some(track) = shortcuts.get(index) {
                    self.load_track(track.clone());
                    ui.related_selected = 0;
                }
            }
            _ => {}
        }
    }

    pub fn handle_mouse_event(&self, event: MouseEvent, tracker: &mut DragTracker, px_per_row: f64) {
        match tracker.on_mouse(event, px_per_row) {
            Some(PointerAction::DragStart { dy }) => {
                self.handle_gesture(GestureEvent::Start);
                self.handle_gesture(GestureEvent::Move { dy });
            }
            Some(PointerAction::Gesture(gesture)) => self.handle_gesture(gesture),
            // Taps inside the full player belong to its content.
            Some(PointerAction::Tap) => {
                if self.expansion_snapshot().state == ExpansionState::Collapsed {
                    self.expand();
                }
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(kind: MouseEventKind, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column: 10,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_drag_reports_scaled_displacement() {
        let mut tracker = DragTracker::new();
        assert_eq!(tracker.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 20), 10.0), None);
        assert_eq!(
            tracker.on_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 15), 10.0),
            Some(PointerAction::DragStart { dy: -50.0 })
        );
        assert_eq!(
            tracker.on_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 13), 10.0),
            Some(PointerAction::Gesture(GestureEvent::Move { dy: -70.0 }))
        );
        match tracker.on_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 12), 10.0) {
            Some(PointerAction::Gesture(GestureEvent::Release { dy, .. })) => assert_eq!(dy, -80.0),
            other => panic!("expected release, got {other:?}"),
        }
    }

    #[test]
    fn test_press_release_in_place_is_tap() {
        let mut tracker = DragTracker::new();
        tracker.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 5), 10.0);
        assert_eq!(
            tracker.on_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 5), 10.0),
            Some(PointerAction::Tap)
        );
    }

    #[test]
    fn test_jitter_on_pressed_row_does_not_start_drag() {
        let mut tracker = DragTracker::new();
        tracker.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 5), 10.0);
        assert_eq!(tracker.on_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 5), 10.0), None);
        assert_eq!(
            tracker.on_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 5), 10.0),
            Some(PointerAction::Tap)
        );
    }

    #[test]
    fn test_drag_without_press_is_ignored() {
        let mut tracker = DragTracker::new();
        assert!(tracker.on_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 5), 10.0).is_none());
        assert!(tracker.on_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 5), 10.0).is_none());
    }
}
