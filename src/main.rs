mod audio;
mod controller;
mod export;
mod logging;
mod model;
mod storage;
mod view;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::Mutex;

use audio::AudioPlayer;
use controller::AppController;
use model::{AppModel, HifiClient};
use storage::Storage;
use view::{AppView, ViewState};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== hifi-tui starting ===");

    let storage = Storage::new();
    if let Err(e) = storage.load().await {
        tracing::warn!(error = %e, "Could not load saved library, starting fresh");
    }
    let settings = storage.settings().await;

    let client = HifiClient::new()?;
    let audio = Arc::new(AudioPlayer::new(settings.volume));

    let model = Arc::new(Mutex::new(AppModel::new()));
    let controller = AppController::new(model.clone(), client, storage, audio.clone());
    controller.init_from_storage().await;

    // Home recommendations load in the background, the UI comes up
    // immediately either way.
    let recommender = controller.clone();
    tokio::spawn(async move { recommender.load_recommendations().await });

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, controller, audio.clone()).await;

    // Restore terminal
    let _ = audio.send(audio::AudioCmd::Quit);
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("hifi-tui shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
    audio: Arc<AudioPlayer>,
) -> io::Result<()> {
    loop {
        // Advance the queue when the player drains the current track
        if audio.take_finished() {
            controller.handle_track_finished().await;
        }

        // Snapshot current state, then drop the lock before drawing
        let position = audio.position();
        let (playback, ui_state, entry, home, library, settings, transfers, nav, should_quit) = {
            let model_guard = model.lock().await;

            // Auto-clear old errors (after 5 seconds)
            model_guard.auto_clear_old_errors().await;

            (
                model_guard.get_playback_info(position).await,
                model_guard.get_ui_state().await,
                model_guard.current_entry().await,
                model_guard.get_home().await,
                model_guard.get_library().await,
                model_guard.get_settings().await,
                model_guard.get_transfers(),
                model_guard.nav_state().await,
                model_guard.should_quit().await,
            )
        };

        terminal.draw(|f| {
            AppView::render(
                f,
                &ViewState {
                    playback: &playback,
                    ui: &ui_state,
                    entry: &entry,
                    home: &home,
                    library: &library,
                    settings: &settings,
                    transfers: &transfers,
                    can_back: nav.0,
                    can_forward: nav.1,
                },
            );
        })?;

        // Handle input with a short poll time for smoother UI updates
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                let _ = controller.handle_key_event(key).await;
            }
        }

        if should_quit {
            break;
        }
    }

    Ok(())
}
