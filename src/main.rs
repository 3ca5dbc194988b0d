mod demo;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use now_playing::config::{LayoutMetrics, PlayerConfig};
use now_playing::controller::{DragTracker, NowPlayingController};
use now_playing::logging;
use now_playing::model::{TrackRef, UiState};
use now_playing::view::PlayerView;

use demo::{DemoCatalog, SimulatedEngine};

const FRAME_POLL: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = match logging::init_logging() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!("=== Now Playing Starting ===");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Layout pixels map one-to-one onto a 20px terminal row
    let rows = terminal.size()?.height;
    let layout = LayoutMetrics::with_screen_height(f64::from(rows.max(1)) * 20.0);
    let config = PlayerConfig::default().with_layout(layout);

    let catalog = Arc::new(DemoCatalog);
    let controller = NowPlayingController::new(config, catalog.clone(), catalog, Arc::new(SimulatedEngine));
    let shortcuts = demo::shortcuts();

    let res = run_app(&mut terminal, controller.clone(), &shortcuts).await;

    controller.dismiss().await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("Now Playing shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    controller: NowPlayingController,
    shortcuts: &[TrackRef],
) -> io::Result<()> {
    let mut ui_state = UiState::default();
    let mut drag = DragTracker::new();
    let mut last_frame = Instant::now();

    loop {
        let now = Instant::now();
        if let Some(rest) = controller.tick(now.duration_since(last_frame)) {
            tracing::debug!(?rest, "Player settled");
        }
        last_frame = now;

        let session = controller.session();
        let expansion = controller.expansion_snapshot();
        let visuals = controller.visual_params();
        let layout = controller.config().layout;

        let frame_rows = terminal.draw(|f| {
            PlayerView::render(f, &session, &expansion, &visuals, &layout, &ui_state, shortcuts);
        })?.area.height;

        if event::poll(FRAME_POLL)? {
            match event::read()? {
                Event::Key(key) => {
                    controller.handle_key_event(key, &mut ui_state, shortcuts).await;
                }
                Event::Mouse(mouse) => {
                    let px_per_row = 1.0 / PlayerView::rows_per_px(frame_rows, &layout);
                    controller.handle_mouse_event(mouse, &mut drag, px_per_row);
                }
                _ => {}
            }
        }

        if ui_state.should_quit {
            break;
        }
    }

    Ok(())
}
