// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - The owning event loop (keyboard input, timer ticks, panel commands)
// - Rendering the UI
//
// The event loop task is the panel's owning thread: it is the only place
// PanelController::handle is ever called.

pub mod app;
pub mod binding;
pub mod components;
pub mod ui;

use crate::config::Config;
use crate::events::EventKind;
use crate::panel::PanelCommand;
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

/// Run the TUI
///
/// Sets up the terminal, runs the event loop until the user quits, then
/// tears the panel down and restores the terminal.
pub async fn run_tui(
    config: Config,
    panel_tx: mpsc::Sender<PanelCommand>,
    mut panel_rx: mpsc::Receiver<PanelCommand>,
) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // Expanded panel height, like the original: a fixed share of the screen
    // measured once at startup.
    let rows = terminal.size().map(|area| area.height).unwrap_or(24);
    let full_height =
        (u32::from(rows) * u32::from(config.panel.height_percent) / 100).max(5) as u16;

    let mut app = App::new(&config, panel_tx, full_height);

    let result = run_event_loop(&mut terminal, &mut app, &mut panel_rx).await;

    // Screen teardown: anything still queued against the panel becomes a
    // logged no-op from here on.
    app.panel.handle(PanelCommand::Dispose);

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Waits on three sources with tokio::select!:
/// 1. Keyboard input
/// 2. Timer ticks (animation smoothness, toast expiry)
/// 3. Panel commands (reports from producers, timer/animation callbacks)
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    panel_rx: &mut mpsc::Receiver<PanelCommand>,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(50));

    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            // Keyboard input
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    if let Ok(Event::Key(key_event)) = event::read() {
                        handle_key_event(app, key_event);
                    }
                }
            } => {}

            // Periodic tick keeps animation frames flowing to the screen
            _ = tick_interval.tick() => {
                app.tick();
            }

            // Marshaled panel commands
            Some(cmd) = panel_rx.recv() => {
                app.panel.handle(cmd);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    if key_event.kind != KeyEventKind::Press {
        return;
    }

    let viewport = app.panel_height().saturating_sub(2) as usize;
    let total = app.panel.len();

    match key_event.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            app.should_quit = true;
        }

        // Panel toggle (the FAB tap of the original)
        KeyCode::Char(' ') | KeyCode::Enter => {
            app.panel.handle(PanelCommand::Toggle);
        }

        // Persisted auto-expand preference
        KeyCode::Char('a') | KeyCode::Char('A') => {
            let enabled = !app.panel.auto_expand();
            app.panel.handle(PanelCommand::SetAutoExpand(enabled));
            app.show_toast(if enabled {
                "Auto-expand enabled"
            } else {
                "Auto-expand disabled"
            });
        }

        // Clear the log (confirmation dialog intentionally omitted)
        KeyCode::Char('c') | KeyCode::Char('C') => {
            let message = if app.panel.is_empty() {
                "Event log already empty"
            } else {
                "Event log cleared"
            };
            app.panel.handle(PanelCommand::Clear);
            app.show_toast(message);
        }

        // Inject test events
        KeyCode::Char('e') | KeyCode::Char('E') => {
            app.panel.handle(PanelCommand::Report {
                kind: EventKind::Error,
                text: "Injected test error".to_string(),
            });
        }
        KeyCode::Char('i') | KeyCode::Char('I') => {
            app.panel.handle(PanelCommand::Report {
                kind: EventKind::Info,
                text: "Injected test message".to_string(),
            });
        }

        // Scroll the event list
        KeyCode::Up | KeyCode::Char('k') => app.event_panel.scroll_up(),
        KeyCode::Down | KeyCode::Char('j') => app.event_panel.scroll_down(total, viewport),
        KeyCode::PageUp => app.event_panel.page_up(viewport),
        KeyCode::PageDown => app.event_panel.page_down(total, viewport),
        KeyCode::End | KeyCode::Char('G') => app.event_panel.follow_end(),

        _ => {}
    }
}
