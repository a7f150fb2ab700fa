//! TrueSignal - follow TrueSignals trading orders from the terminal
//!
//! Polls the order feed, normalizes whatever layout it returns, and shows the
//! orders in a terminal table. The last good snapshot is cached so the table
//! still has content while the feed is down.

use std::io;
use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use truesignal::app::{App, AppState};
use truesignal::cache::{CacheManager, FileStore};
use truesignal::cli::{CacheLocation, Cli, StartupConfig};
use truesignal::data::OrderStats;
use truesignal::feed::FeedClient;
use truesignal::refresh::{self, run_cycle, RefreshConfig, RefreshHandle};
use truesignal::telemetry::init_tracing;
use truesignal::ui;

/// Log file written while the TUI owns the terminal
const LOG_FILE: &str = "truesignal.log";

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Builds the cache for the configured location.
///
/// Also returns the directory for the log file, if the cache lives on disk.
fn build_cache(config: &StartupConfig) -> (CacheManager, Option<PathBuf>) {
    let (cache, dir) = match &config.cache {
        CacheLocation::Dir(dir) => (CacheManager::with_dir(dir.clone()), Some(dir.clone())),
        CacheLocation::Default => match FileStore::new() {
            Some(store) => {
                let dir = store.dir().to_path_buf();
                (CacheManager::with_store(store), Some(dir))
            }
            None => (CacheManager::in_memory(), None),
        },
        CacheLocation::Memory => (CacheManager::in_memory(), None),
    };
    (cache.with_expiry(config.expiry), dir)
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    match app.state {
        AppState::Loading => render_loading(frame),
        AppState::OrderList => ui::render_order_table(frame, app),
    }

    if app.show_detail {
        ui::render_order_detail(frame, app);
    }
    if app.show_help {
        ui::render_help_overlay(frame, app);
    }
}

/// Renders a loading message while data is being fetched
fn render_loading(frame: &mut ratatui::Frame) {
    use ratatui::{
        layout::{Alignment, Constraint, Direction, Layout},
        style::{Color, Style},
        widgets::Paragraph,
    };

    let area = frame.area();

    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new("Veriler yükleniyor...")
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

/// Fetches once, prints the filtered table to stdout and exits
async fn run_once(config: &StartupConfig, client: FeedClient, cache: CacheManager) -> ExitCode {
    let snapshot = run_cycle(client.fetch().await, &cache);
    let rows = config.filter.apply(snapshot.records());
    let stats = OrderStats::from_records(snapshot.records());

    print!("{}", ui::render_plain(&snapshot, &rows, &stats));

    match snapshot {
        refresh::Snapshot::Unavailable { .. } => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}

/// Runs the interactive table until the user quits
async fn run_tui(
    config: &StartupConfig,
    client: FeedClient,
    cache: CacheManager,
) -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Show the last snapshot right away while the first fetch runs
    let mut app = App::new(config.filter.clone()).with_cached(cache.load());

    let refresh_config = RefreshConfig {
        interval: config.interval,
        enabled: true,
    };
    let mut handle = RefreshHandle::spawn(refresh_config, client, cache);

    // Main event loop
    loop {
        // Render UI
        terminal.draw(|f| render_ui(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        while let Some(message) = refresh::try_recv(&mut handle) {
            app.handle_refresh_message(message);
        }

        if app.refresh_requested {
            app.refresh_requested = false;
            handle.request_refresh();
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    handle.shutdown().await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let (cache, cache_dir) = build_cache(&config);

    let log_path = if config.once {
        None
    } else {
        Some(cache_dir.unwrap_or_else(std::env::temp_dir).join(LOG_FILE))
    };
    if let Err(e) = init_tracing(&config.log_level, log_path.as_deref()) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let client = match FeedClient::new(config.url.clone(), config.timeout) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(url = %config.url, ?cache, "Starting TrueSignal");

    if config.once {
        return run_once(&config, client, cache).await;
    }

    match run_tui(&config, client, cache).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            warn!(error = %e, "Terminal session failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
