// Panel visibility state
//
// An explicit four-state enum rather than a pair of booleans: a boolean
// "animation playing" flag cannot distinguish direction, and the transition
// rules differ between Expanding and Collapsing.

/// Visibility state of the event panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    /// Hidden (height 0), the initial state
    #[default]
    Collapsed,
    /// Animating toward full height
    Expanding,
    /// Fully visible at full height
    Expanded,
    /// Animating toward height 0
    Collapsing,
}

impl PanelState {
    /// Display name for the status bar
    pub fn name(&self) -> &'static str {
        match self {
            PanelState::Collapsed => "collapsed",
            PanelState::Expanding => "expanding",
            PanelState::Expanded => "expanded",
            PanelState::Collapsing => "collapsing",
        }
    }
}
