// TuiView - the ViewBinding implementation for the terminal renderer
//
// The controller runs inside the TUI event loop, but rendering happens from
// the draw closure, so the binding writes into a small shared state struct
// the renderer reads each frame. The flags are edge-triggered: the renderer
// consumes them and resets.

use crate::panel::ViewBinding;
use std::sync::{Arc, Mutex};

/// Render-side view of the panel, updated by the binding
#[derive(Debug, Default)]
pub struct ViewState {
    /// Panel height in rows (0 = hidden)
    pub height: u16,
    /// Attention cue currently shown
    pub attention: bool,
    /// Pending scroll-to-newest request
    pub follow_requested: bool,
    /// Pending full-refresh request (set by clear)
    pub refresh_requested: bool,
}

pub type SharedViewState = Arc<Mutex<ViewState>>;

/// ViewBinding that records notifications into SharedViewState
pub struct TuiView {
    state: SharedViewState,
}

impl TuiView {
    pub fn new(state: SharedViewState) -> Self {
        Self { state }
    }
}

impl ViewBinding for TuiView {
    fn on_items_changed(&self, _start: usize, count: usize) {
        if count == 0 {
            // Whole-list refresh; the renderer resets its scroll window.
            self.state.lock().unwrap().refresh_requested = true;
        }
        // Inserts need no bookkeeping here: the renderer snapshots the log
        // every frame.
    }

    fn on_height_changed(&self, rows: u16) {
        self.state.lock().unwrap().height = rows;
    }

    fn on_attention_cue(&self, visible: bool) {
        self.state.lock().unwrap().attention = visible;
    }

    fn scroll_to_end(&self) {
        self.state.lock().unwrap().follow_requested = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_writes_through_to_shared_state() {
        let shared: SharedViewState = Arc::default();
        let view = TuiView::new(shared.clone());

        view.on_height_changed(7);
        view.on_attention_cue(true);
        view.scroll_to_end();
        view.on_items_changed(0, 0);

        let state = shared.lock().unwrap();
        assert_eq!(state.height, 7);
        assert!(state.attention);
        assert!(state.follow_requested);
        assert!(state.refresh_requested);
    }
}
