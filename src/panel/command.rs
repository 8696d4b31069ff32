// Panel commands and the marshaling handle
//
// PanelState and the EventLog are owned by a single task (the TUI event
// loop). Producers on other tasks or threads never touch them directly:
// they enqueue a PanelCommand through PanelHandle, and the owning loop
// drains the channel and feeds each command to the controller. Timer and
// animation tasks report back through the same channel, so every state
// check happens after the hop onto the owning task.

use crate::events::EventKind;
use crate::panel::animation::AnimationEvent;
use std::time::Duration;
use tokio::sync::mpsc;

/// Messages processed by the panel controller on its owning task
#[derive(Debug)]
pub enum PanelCommand {
    /// Append an event and apply the expand policy
    Report { kind: EventKind, text: String },
    /// User tapped the panel toggle
    Toggle,
    /// Empty the event log
    Clear,
    /// User changed the auto-expand preference
    SetAutoExpand(bool),
    /// Request the panel hide itself after an idle delay
    ScheduleAutoCollapse { delay: Duration },
    /// A scheduled auto-collapse delay elapsed
    CollapseTimerFired { generation: u64 },
    /// Progress from the animation driver
    Animation {
        generation: u64,
        event: AnimationEvent,
    },
    /// The owning screen is going away
    Dispose,
}

/// Cloneable front door to the panel.
///
/// Safe to call from any task or thread; every method is non-blocking. If
/// the channel is full or the panel is gone the command is dropped with a
/// diagnostic, never an error to the caller.
#[derive(Clone)]
pub struct PanelHandle {
    tx: mpsc::Sender<PanelCommand>,
}

impl PanelHandle {
    pub fn new(tx: mpsc::Sender<PanelCommand>) -> Self {
        Self { tx }
    }

    /// Report an event to the panel
    pub fn report(&self, kind: EventKind, text: impl Into<String>) {
        self.send(PanelCommand::Report {
            kind,
            text: text.into(),
        });
    }

    /// Report an informational event
    pub fn show_message(&self, text: impl Into<String>) {
        self.report(EventKind::Info, text);
    }

    /// Report an error event
    pub fn show_error(&self, text: impl Into<String>) {
        self.report(EventKind::Error, text);
    }

    /// Toggle the panel open/closed
    ///
    /// Note: the TUI runs on the owning task and dispatches input to the
    /// controller directly; these entries exist for producers that do not.
    #[allow(dead_code)]
    pub fn toggle(&self) {
        self.send(PanelCommand::Toggle);
    }

    /// Clear the event log
    #[allow(dead_code)]
    pub fn clear(&self) {
        self.send(PanelCommand::Clear);
    }

    /// Change the persisted auto-expand preference
    #[allow(dead_code)]
    pub fn set_auto_expand(&self, enabled: bool) {
        self.send(PanelCommand::SetAutoExpand(enabled));
    }

    /// Ask the panel to collapse after `delay` of inactivity.
    /// Supersedes any previously scheduled collapse.
    pub fn schedule_auto_collapse(&self, delay: Duration) {
        self.send(PanelCommand::ScheduleAutoCollapse { delay });
    }

    /// Tear the panel down; all later calls become no-ops
    #[allow(dead_code)]
    pub fn dispose(&self) {
        self.send(PanelCommand::Dispose);
    }

    fn send(&self, cmd: PanelCommand) {
        if let Err(e) = self.tx.try_send(cmd) {
            // Bounded channel full, or the owning loop already exited.
            tracing::debug!("panel command dropped: {e}");
        }
    }
}
