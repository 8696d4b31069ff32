// ViewBinding - the rendering surface the controller notifies
//
// The controller owns the log and the state machine; the view owns pixels
// (rows, in a terminal). The binding is deliberately narrow: the view is
// told what changed and how tall the panel is, and nothing else. It holds
// no log-management logic.

/// Rendering surface contract.
///
/// Methods take `&self`: implementations use interior mutability (the TUI
/// binding writes into shared render state; test doubles record calls).
pub trait ViewBinding: Send {
    /// `count` items starting at `start` were inserted. `count == 0` means
    /// the whole list changed (used by clear).
    fn on_items_changed(&self, start: usize, count: usize);

    /// The panel height changed (animation frame or settle)
    fn on_height_changed(&self, rows: u16);

    /// Show or hide the attention cue
    fn on_attention_cue(&self, visible: bool);

    /// Bring the newest item into view
    fn scroll_to_end(&self);
}
