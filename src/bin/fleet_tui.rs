use color_eyre::Result;
use eta_fleet::{
    api::HttpTransport,
    app::{App, FleetSnapshot},
    config::Config,
    events::{Event, EventHandler},
    fleet::FleetService,
    logging, ui,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, sync::Arc, time::Duration};
use tokio::sync::Notify;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Instrumentation and safety
    let _log_guard = logging::initialize_file_logging(logging::LOG_DIR, "fleet-tui.log");
    install_panic_hook();
    color_eyre::install()?;

    let config = Config::load();
    let fleet = FleetService::new(config.eta.clone(), Arc::new(HttpTransport::new()?));

    // Ready terminal and state
    let mut terminal = setup_terminal()?;
    let mut app = App::new(&config.eta.location, config.tui.poll_interval_seconds);
    let events = EventHandler::new(250);

    // ETA poller: fetches immediately, then on every interval or 'r'.
    let refresh = Arc::new(Notify::new());
    let poll_tx = events.tx.clone();
    let poll_refresh = refresh.clone();
    let interval = Duration::from_secs(config.tui.poll_interval_seconds.max(1));
    tokio::spawn(async move {
        loop {
            let snapshot = FleetSnapshot::fetch(&fleet).await;
            info!(
                "Fleet refreshed: {} aircraft{}",
                snapshot.overview.total_aircraft,
                if snapshot.error().is_some() { " (placeholder)" } else { "" }
            );
            if poll_tx.send(Event::FleetUpdate(Box::new(snapshot))).is_err() {
                break;
            }
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = poll_refresh.notified() => {}
            }
        }
    });

    // Main loop
    let mut event_handler = events;
    while !app.should_quit {
        terminal.draw(|f| ui::render(f, &app))?;

        if let Some(event) = event_handler.next().await {
            match event {
                Event::Tick => app.on_tick(),
                Event::Input(key) => app.handle_key(key),
                Event::FleetUpdate(snapshot) => app.apply_snapshot(*snapshot),
            }
        }

        if app.refresh_requested {
            app.refresh_requested = false;
            refresh.notify_one();
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen, crossterm::cursor::Hide)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen, crossterm::cursor::Show)?;
    Ok(())
}

fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Force terminal cleanup!
        crossterm::terminal::disable_raw_mode().ok();
        crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen, crossterm::cursor::Show).ok();
        original_hook(panic_info);
    }));
}
