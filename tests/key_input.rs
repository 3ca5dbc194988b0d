mod common;

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use common::{harness, track};
use now_playing::expansion::{ExpansionState, Rest};
use now_playing::model::{LoadStatus, PlayerTab, UiState};
use now_playing::NowPlayingController;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn settle(controller: &NowPlayingController) {
    for _ in 0..1_000 {
        if controller.tick(Duration::from_millis(16)).is_some() {
            return;
        }
    }
    panic!("expansion never settled");
}

#[tokio::test]
async fn test_tabs_only_switch_when_full_player_is_interactive() {
    let h = harness();
    let mut ui = UiState::default();

    h.controller.handle_key_event(key(KeyCode::Tab), &mut ui, &[]).await;
    assert_eq!(ui.active_tab, PlayerTab::Player);

    h.controller.handle_key_event(key(KeyCode::Up), &mut ui, &[]).await;
    assert_eq!(h.controller.expansion_snapshot().state, ExpansionState::Animating(Rest::Expanded));
    settle(&h.controller);

    h.controller.handle_key_event(key(KeyCode::Tab), &mut ui, &[]).await;
    assert_eq!(ui.active_tab, PlayerTab::Lyrics);
    h.controller.handle_key_event(key(KeyCode::BackTab), &mut ui, &[]).await;
    assert_eq!(ui.active_tab, PlayerTab::Player);
}

#[tokio::test]
async fn test_number_key_loads_shortcut() {
    let h = harness();
    let mut ui = UiState::default();
    let shortcuts = vec![track("first"), track("second")];

    h.controller.handle_key_event(key(KeyCode::Char('2')), &mut ui, &shortcuts).await;
    assert_eq!(h.controller.session().track_id(), Some("second"));
    assert_eq!(h.controller.session().status, LoadStatus::Loading);

    h.controller.handle_key_event(key(KeyCode::Char('9')), &mut ui, &shortcuts).await;
    assert_eq!(h.controller.session().track_id(), Some("second"));
}

#[tokio::test]
async fn test_related_tab_navigation_and_enter() {
    let h = harness();
    let mut ui = UiState::default();
    h.controller.load_track(track("a")).await.unwrap();
    h.controller.expand();
    settle(&h.controller);
    ui.active_tab = PlayerTab::Related;

    h.controller.handle_key_event(key(KeyCode::Down), &mut ui, &[]).await;
    assert_eq!(ui.related_selected, 1);
    // Last entry; stays put
    h.controller.handle_key_event(key(KeyCode::Down), &mut ui, &[]).await;
    assert_eq!(ui.related_selected, 1);
    assert_eq!(h.controller.expansion_snapshot().state, ExpansionState::Expanded);

    h.controller.handle_key_event(key(KeyCode::Enter), &mut ui, &[]).await;
    assert_eq!(h.controller.session().track_id(), Some("a-rel-2"));
    assert_eq!(ui.related_selected, 0);
    assert_eq!(h.controller.expansion_snapshot().state, ExpansionState::Expanded);
}

#[tokio::test]
async fn test_escape_collapses_then_dismisses() {
    let h = harness();
    let mut ui = UiState::default();
    h.controller.load_track(track("a")).await.unwrap();
    h.controller.expand();
    settle(&h.controller);

    h.controller.handle_key_event(key(KeyCode::Esc), &mut ui, &[]).await;
    assert_eq!(h.controller.expansion_snapshot().state, ExpansionState::Animating(Rest::Collapsed));
    settle(&h.controller);
    assert_eq!(h.controller.session().status, LoadStatus::Ready);

    h.controller.handle_key_event(key(KeyCode::Esc), &mut ui, &[]).await;
    assert_eq!(h.controller.session().status, LoadStatus::Idle);
    assert!(!h.controller.has_audio_handle());
}

#[tokio::test]
async fn test_quit_keys() {
    let h = harness();

    let mut ui = UiState::default();
    h.controller.handle_key_event(key(KeyCode::Char('q')), &mut ui, &[]).await;
    assert!(ui.should_quit);

    let mut ui = UiState::default();
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    h.controller.handle_key_event(ctrl_c, &mut ui, &[]).await;
    assert!(ui.should_quit);
}
