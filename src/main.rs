//! Marquee - movie lookup with type-ahead search
//!
//! # Usage
//!
//! ```bash
//! # Run the backend
//! OMDB_API_KEY=... TMDB_API_KEY=... marquee serve
//!
//! # Launch the terminal client against it
//! marquee
//!
//! # One-shots (for scripting)
//! marquee search "india" --json
//! marquee movie --id tt0118799
//! ```

use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use marquee::app::{dispatch, Action, App, Message};
use marquee::cli::{Cli, ExitCode, Output};
use marquee::{commands, ui, BackendClient, Config, MovieBackend};

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<std::process::ExitCode> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let mut config = Config::load(cli.config.as_deref());
    if let Some(url) = cli.backend.clone() {
        config.backend_url = Some(url);
    }

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        Ok(run_cli(cli, config).await.into())
    } else {
        run_tui(config).await?;
        Ok(std::process::ExitCode::SUCCESS)
    }
}

/// Logging goes to stderr; the terminal client stays silent unless RUST_LOG is set
fn init_tracing(cli: &Cli) {
    let explicit = std::env::var("RUST_LOG").ok();
    if !cli.is_cli_mode() && explicit.is_none() {
        return;
    }

    let env_filter = explicit.unwrap_or_else(|| {
        if cli.verbose {
            "marquee=debug,tower_http=debug".to_string()
        } else {
            "marquee=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .init();
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli, config: Config) -> ExitCode {
    let output = Output::new(&cli);

    match cli.command {
        Some(command) => commands::run(command, config, &output).await,
        // Unreachable: guarded by is_cli_mode
        None => ExitCode::Success,
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(config: Config) -> Result<()> {
    let backend: Arc<dyn MovieBackend> = Arc::new(BackendClient::new(config.backend_url()));
    let mut app = App::new(config.backend_url());

    let mut terminal = init_terminal()?;
    let result = run_event_loop(&mut terminal, &mut app, backend).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop - handles input, timers and backend replies, renders UI
async fn run_event_loop(
    terminal: &mut Tui,
    app: &mut App,
    backend: Arc<dyn MovieBackend>,
) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(25);

    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    // Liveness check on startup
    dispatch(Action::Ping, backend.clone(), tx.clone());

    while app.running {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = app.handle_key(key, Instant::now()) {
                        dispatch(action, backend.clone(), tx.clone());
                    }
                }
            }
        }

        if let Some(action) = app.tick(Instant::now()) {
            dispatch(action, backend.clone(), tx.clone());
        }

        while let Ok(message) = rx.try_recv() {
            app.apply(message);
        }
    }

    Ok(())
}
