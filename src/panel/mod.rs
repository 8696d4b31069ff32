// Panel module - the collapsible event log panel core
//
// The controller is the single owner of panel state and the event log; it
// runs on the TUI event loop task. Everything else reaches it through
// PanelHandle, which marshals calls onto that task as PanelCommands.

pub mod animation;
pub mod command;
pub mod controller;
pub mod state;
pub mod view;

pub use animation::{AnimationDriver, AnimationEvent, AnimationHandle, AnimationSink, TweenDriver};
pub use command::{PanelCommand, PanelHandle};
pub use controller::{PanelController, PanelSettings};
pub use state::PanelState;
pub use view::ViewBinding;
