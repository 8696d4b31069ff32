// UI components owned by the App and rendered by ui.rs

pub mod event_panel;
pub mod status_bar;
pub mod toast;

pub use event_panel::EventPanel;
pub use toast::Toast;
