// ABOUTME: Main entry point for mgb with TUI and CLI support
//
// Binary: mgb
// Usage: mgb [COMMAND]
// - No command: launches TUI
// - list: print which remote branches are merged into which
// - prune: prune stale remote-tracking branches
// - delete: delete a branch on its remote

#![allow(missing_docs)]

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, prelude::*, Terminal};
use std::{
    io::{self, IsTerminal},
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::{info, warn};

use merged_branches::actions::{ActionSurface, SystemClipboard, TmuxShell};
use merged_branches::app::{App, EventHandler};
use merged_branches::cli;
use merged_branches::components::LayoutComponent;
use merged_branches::config::AppConfig;
use merged_branches::git::GitCli;
use merged_branches::tree::{BranchTree, ViewController};

/// Terminal cleanup utility to ensure proper restoration
fn cleanup_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Unified terminal cleanup that works with a terminal instance
fn cleanup_terminal_with_instance<B: Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    setup_panic_handler();

    let args = cli::Cli::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!("Falling back to default configuration: {:#}", e);
        eprintln!("Warning: ignoring configuration ({e:#})");
        AppConfig::default()
    });
    args.apply_overrides(&mut config);

    let result = match args.command {
        Some(cli::Commands::List(list_args)) => {
            cli::list::execute(list_args, args.format, &config).await
        }
        Some(cli::Commands::Prune) => cli::prune::execute(&config).await,
        Some(cli::Commands::Delete(delete_args)) => {
            cli::delete::execute(delete_args, &config).await
        }

        // TUI mode (explicit or default)
        Some(cli::Commands::Tui) | None => {
            let tree = Arc::new(BranchTree::new(
                GitCli::new(&config.git_binary),
                config.resolve_workspaces(),
                config.tree_options(),
            ));
            let view = ViewController::new(tree, config.initial_sort_mode());
            let actions = ActionSurface::new(
                Box::new(TmuxShell::new()),
                Box::new(SystemClipboard::new()),
                &config.git_binary,
            );

            let mut app = App::new(view, actions, config.ui.show_details);
            app.init();
            let mut layout = LayoutComponent::new();

            // Flush any pending terminal events to prevent stray keypresses
            while event::poll(Duration::from_millis(10)).unwrap_or(false) {
                let _ = event::read();
            }

            run_tui(&mut app, &mut layout).await
        }
    };

    // Ensure terminal is cleaned up on any error
    if result.is_err() {
        cleanup_terminal();
    }

    result
}

async fn run_tui(app: &mut App<GitCli>, layout: &mut LayoutComponent) -> Result<()> {
    if !IsTerminal::is_terminal(&io::stdout()) {
        return Err(anyhow::anyhow!(
            "No TTY detected. This application requires a terminal.\n\
             Try `mgb list` when redirecting output."
        ));
    }

    if let Err(e) = crossterm::terminal::is_raw_mode_enabled() {
        eprintln!("Cannot check terminal raw mode: {}", e);
        return Err(anyhow::anyhow!("Terminal not compatible: {}", e));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_tui_loop(app, layout, &mut terminal).await;

    if let Err(e) = cleanup_terminal_with_instance(&mut terminal) {
        tracing::error!("Failed to cleanup terminal: {}", e);
        cleanup_terminal();
    }

    result
}

async fn run_tui_loop(
    app: &mut App<GitCli>,
    layout: &mut LayoutComponent,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| {
            layout.render(frame, &app.state);
        })?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    if let Some(app_event) =
                        EventHandler::handle_key_event(key_event, &mut app.state)
                    {
                        EventHandler::process_event(app_event, &mut app.state);
                    }
                    // Run the queued action right away instead of waiting for the tick
                    app.process_async_action().await?;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick().await?;
            last_tick = Instant::now();
        }

        if app.state.should_quit {
            info!("Quitting");
            break;
        }
    }

    Ok(())
}

fn setup_logging() {
    use std::fs::OpenOptions;
    use std::path::PathBuf;
    use tracing_subscriber::fmt::writer::BoxMakeWriter;
    use tracing_subscriber::prelude::*;

    let log_dir = dirs::home_dir()
        .map(|home| home.join(".merged-branches").join("logs"))
        .unwrap_or_else(|| PathBuf::from(".merged-branches/logs"));

    let _ = std::fs::create_dir_all(&log_dir);

    // JSONL log file with timestamp
    let log_file = log_dir.join(format!(
        "merged-branches-{}.jsonl",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    // The TUI owns the terminal, so logs never go to stdout or stderr
    let writer = match OpenOptions::new().create(true).append(true).open(&log_file) {
        Ok(file) => BoxMakeWriter::new(file),
        Err(_) => BoxMakeWriter::new(io::sink),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(writer)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "merged_branches=info".into()),
        )
        .init();
}

fn setup_panic_handler() {
    use tracing::error;

    std::panic::set_hook(Box::new(|panic_info| {
        // Ensure terminal is restored before logging the panic
        cleanup_terminal();

        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}
