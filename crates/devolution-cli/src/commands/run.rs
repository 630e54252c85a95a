use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{info, warn};

use devolution_core::{AppConfig, ConfiguredProbe, MotionProfile};
use devolution_tui::{
    app::{App, AppCommand},
    event::{AppEvent, EventHandler, OpenResult},
    input::{handle_key_event, handle_mouse_event},
    widgets, EnvProbe, Theme,
};

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    let probe = ConfiguredProbe::new(EnvProbe::from_env(), &config.motion);
    let profile = MotionProfile::detect(&probe);
    info!(?profile, "motion profile selected");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        SetTitle(config.event.name.as_str())
    )?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let theme = Theme::from_config(&config.ui);
    let mut app = App::new(config.clone(), profile, theme);
    let size = terminal.size()?;
    app.resize(size.width, size.height);

    let result = run_loop(&mut terminal, &mut app, &config).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    config: &AppConfig,
) -> Result<()> {
    let event_handler =
        EventHandler::with_animation_fps(config.ui.tick_rate_ms, config.ui.animation_fps);

    // Channel for browser launch results
    let (open_tx, mut open_rx) = mpsc::unbounded_channel::<OpenResult>();

    let started = Instant::now();
    // The entrance plays from the first frame, so start fast
    let mut needs_fast_update = true;

    loop {
        while let Ok(result) = open_rx.try_recv() {
            app.handle_open_result(result);
        }

        app.tick(started.elapsed());
        terminal.draw(|frame| widgets::render(frame, app))?;

        let event = if needs_fast_update {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            let action = match event {
                AppEvent::Key(key) => Some(handle_key_event(key)),
                AppEvent::Mouse(mouse) => Some(handle_mouse_event(mouse)),
                AppEvent::Resize(width, height) => {
                    app.resize(width, height);
                    None
                }
                AppEvent::Tick => None,
            };
            app.advance_clock(started.elapsed());
            if let Some(command) = action.and_then(|action| app.handle_action(action)) {
                match command {
                    AppCommand::OpenUrl(url) => spawn_open(url, open_tx.clone()),
                }
            }
        }

        needs_fast_update = app.needs_fast_update();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Open `url` in the system browser off the UI thread
fn spawn_open(url: String, tx: mpsc::UnboundedSender<OpenResult>) {
    tokio::spawn(async move {
        let target = url.clone();
        let result = match tokio::task::spawn_blocking(move || open::that(&target)).await {
            Ok(Ok(())) => {
                info!(%url, "opened in browser");
                OpenResult::Opened { url }
            }
            Ok(Err(e)) => {
                warn!(%url, error = %e, "failed to open browser");
                OpenResult::Failed {
                    url,
                    error: e.to_string(),
                }
            }
            Err(e) => OpenResult::Failed {
                url,
                error: e.to_string(),
            },
        };
        let _ = tx.send(result);
    });
}
