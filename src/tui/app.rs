// TUI application state
//
// Owns the panel controller (this task is the panel's owning thread), the
// render-side view state the controller's binding writes into, and the
// presentation components.

use crate::config::Config;
use crate::panel::{PanelCommand, PanelController, PanelSettings, TweenDriver};
use crate::prefs::{FilePrefs, MemoryPrefs, PrefStore};
use crate::theme::Theme;
use crate::tui::binding::{SharedViewState, TuiView};
use crate::tui::components::{EventPanel, Toast};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Main application state for the TUI
pub struct App {
    /// The panel state machine; this loop is its owning task
    pub panel: PanelController,

    /// Render-side state written by the panel's view binding
    pub view_state: SharedViewState,

    /// Event list presentation (scroll window, follow mode)
    pub event_panel: EventPanel,

    /// Current color theme
    pub theme: Theme,

    /// Active toast notification, if any
    pub toast: Option<Toast>,

    /// Whether the app should quit
    pub should_quit: bool,

    /// When the app started (for uptime display)
    start_time: Instant,
}

impl App {
    pub fn new(config: &Config, panel_tx: mpsc::Sender<PanelCommand>, full_height: u16) -> Self {
        let view_state = SharedViewState::default();
        let view = TuiView::new(view_state.clone());

        let prefs: Arc<dyn PrefStore> = match FilePrefs::open_default() {
            Some(prefs) => Arc::new(prefs),
            None => {
                tracing::warn!("no config directory; preferences will not persist");
                Arc::new(MemoryPrefs::new())
            }
        };

        let panel = PanelController::new(
            Box::new(view),
            Arc::new(TweenDriver),
            prefs,
            panel_tx,
            PanelSettings {
                full_height,
                animation: config.animation(),
            },
        );

        Self {
            panel,
            view_state,
            event_panel: EventPanel::new(),
            theme: Theme::from_name(&config.theme),
            toast: None,
            should_quit: false,
            start_time: Instant::now(),
        }
    }

    /// Panel height in rows, as last reported through the view binding
    pub fn panel_height(&self) -> u16 {
        self.view_state.lock().unwrap().height
    }

    /// Whether the attention cue is showing
    pub fn attention(&self) -> bool {
        self.view_state.lock().unwrap().attention
    }

    /// Apply edge-triggered view notifications to the presentation state.
    /// Called once per frame before drawing.
    pub fn consume_view_flags(&mut self) {
        let mut state = self.view_state.lock().unwrap();
        if state.refresh_requested {
            state.refresh_requested = false;
            self.event_panel.reset();
        }
        if state.follow_requested {
            state.follow_requested = false;
            self.event_panel.follow_end();
        }
    }

    /// Show a toast notification
    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message));
    }

    /// Periodic housekeeping (toast expiry)
    pub fn tick(&mut self) {
        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }
    }

    /// Uptime formatted as mm:ss (hh:mm:ss after an hour)
    pub fn uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        if secs >= 3600 {
            format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
        } else {
            format!("{}:{:02}", secs / 60, secs % 60)
        }
    }
}
