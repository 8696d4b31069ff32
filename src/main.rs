// evlog - Collapsible live event console for the terminal
//
// A demo client (or any producer holding a PanelHandle) reports Info/Error
// events; a collapsible panel docked at the bottom of the screen shows
// them, auto-expanding on activity unless the user turned that off.
//
// Architecture:
// - Panel core: state machine + event log, owned by the TUI event loop
// - PanelHandle: marshals calls from any task onto that loop (mpsc)
// - Demo producer: scripted background client exercising the handle
// - Tracing bridge: log records become panel events in TUI mode

mod cli;
mod config;
mod demo;
mod events;
mod logging;
mod panel;
mod prefs;
mod theme;
mod tui;

use anyhow::Result;
use config::Config;
use events::EventKind;
use panel::{PanelCommand, PanelHandle};
use tokio::sync::{mpsc, oneshot};

#[tokio::main]
async fn main() -> Result<()> {
    // Handle CLI commands first (config --show, --reset, --path)
    if cli::handle_cli() {
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let config = Config::from_env();

    // Command channel: the single marshaling point onto the owning loop.
    // Bounded so a runaway producer degrades to dropped commands instead
    // of unbounded memory growth.
    let (panel_tx, panel_rx) = mpsc::channel(1024);
    let panel = PanelHandle::new(panel_tx.clone());

    // Initialize tracing with conditional output:
    // - TUI mode: records become panel events (stdout would garble the
    //   alternate screen)
    // - Headless mode: records go to stdout
    // - Optionally: JSON records to a daily-rotated file in both modes
    // The guard must stay alive for the duration of the program so file
    // logs flush.
    let _file_guard = init_tracing(&config, &panel);

    tracing::info!("evlog v{} started", config::VERSION);

    // Spawn the demo client (plays the network client role); it reports
    // through a cloned handle from outside the owning task.
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let demo_task = if config.demo.enabled {
        let handle = panel.clone();
        let demo_config = config.demo.clone();
        let collapse_after = config.collapse_after();
        Some(tokio::spawn(async move {
            demo::run_demo(handle, demo_config, collapse_after, shutdown_rx).await;
        }))
    } else {
        drop(shutdown_rx);
        None
    };

    if config.enable_tui {
        if let Err(e) = tui::run_tui(config, panel_tx, panel_rx).await {
            tracing::error!("TUI error: {e:?}");
        }
    } else {
        tracing::info!("TUI disabled, running in headless mode");
        run_headless(panel_rx).await;
    }

    tracing::debug!("shutting down");

    // Signal the demo to stop; if the send fails it already exited.
    let _ = shutdown_tx.send(());
    if let Some(task) = demo_task {
        let _ = task.await;
    }

    Ok(())
}

/// Headless mode: no panel exists, so drain the command channel and emit
/// reported events as ordinary log lines until Ctrl+C.
async fn run_headless(mut panel_rx: mpsc::Receiver<PanelCommand>) {
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            cmd = panel_rx.recv() => match cmd {
                Some(PanelCommand::Report { kind, text }) => match kind {
                    EventKind::Error => tracing::error!("{text}"),
                    EventKind::Info => tracing::info!("{text}"),
                },
                Some(_) => {} // Panel control commands are meaningless headless
                None => break,
            }
        }
    }
}

/// Set up the tracing subscriber stack for the selected mode
fn init_tracing(
    config: &Config,
    panel: &PanelHandle,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    // Precedence: RUST_LOG env var > config file > default "info"
    let default_filter = format!("evlog={}", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    // Non-blocking rotated file writer, if enabled
    let file_writer = if config.logging.file_enabled {
        match std::fs::create_dir_all(&config.logging.file_dir) {
            Ok(()) => {
                let appender =
                    tracing_appender::rolling::daily(&config.logging.file_dir, "evlog");
                Some(tracing_appender::non_blocking(appender))
            }
            Err(e) => {
                eprintln!(
                    "Warning: could not create log directory {:?}: {}",
                    config.logging.file_dir, e
                );
                None
            }
        }
    } else {
        None
    };

    // The layer stacks have distinct types per combination, so each arm
    // calls init() itself.
    match (config.enable_tui, file_writer) {
        (true, Some((writer, guard))) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(logging::PanelLogLayer::new(panel.clone()))
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .init();
            Some(guard)
        }
        (true, None) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(logging::PanelLogLayer::new(panel.clone()))
                .init();
            None
        }
        (false, Some((writer, guard))) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .init();
            Some(guard)
        }
        (false, None) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
            None
        }
    }
}
