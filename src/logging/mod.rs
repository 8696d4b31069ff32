// Logging module - tracing bridge into the event panel
//
// In TUI mode nothing may write to stdout: the alternate screen would be
// garbled. Instead a custom tracing layer forwards log records into the
// event panel itself, where they show up as Info/Error entries next to the
// events the demo client reports. Records emitted by the panel module are
// excluded so the panel never reports about its own bookkeeping.

use crate::events::EventKind;
use crate::panel::PanelHandle;
use tracing::{Level, Metadata, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// Tracing layer that forwards records to the event panel
pub struct PanelLogLayer {
    panel: PanelHandle,
}

impl PanelLogLayer {
    pub fn new(panel: PanelHandle) -> Self {
        Self { panel }
    }

    fn kind_for(level: &Level) -> Option<EventKind> {
        match *level {
            Level::ERROR => Some(EventKind::Error),
            Level::WARN | Level::INFO => Some(EventKind::Info),
            // Debug/trace would flood the panel; they still reach the
            // file layer when enabled.
            Level::DEBUG | Level::TRACE => None,
        }
    }
}

impl<S> Layer<S> for PanelLogLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let Some(kind) = Self::kind_for(metadata.level()) else {
            return;
        };

        // Feedback guard: panel internals log too, and mirroring those
        // records back into the panel would echo every operation.
        if metadata.target().starts_with("evlog::panel") {
            return;
        }

        let mut message = String::new();
        let mut visitor = MessageVisitor(&mut message);
        event.record(&mut visitor);

        if message.is_empty() {
            return;
        }

        if *metadata.level() == Level::WARN {
            message = format!("warning: {message}");
        }

        // report() marshals onto the owning task, so this is safe from any
        // thread a producer logs on.
        self.panel.report(kind, message);
    }

    fn enabled(&self, _metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        true
    }
}

/// Visitor to extract the message from a tracing event
struct MessageVisitor<'a>(&'a mut String);

impl tracing::field::Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = format!("{:?}", value);
            // Remove the quotes that Debug adds
            if self.0.starts_with('"') && self.0.ends_with('"') {
                *self.0 = self.0[1..self.0.len() - 1].to_string();
            }
        }
    }
}
