// Event model for the diagnostic panel
//
// Producers (the demo client, the tracing bridge) report EventItems through
// the panel handle; the controller appends them to the EventLog. Using a
// plain enum for the kind allows pattern matching and keeps rendering
// decisions out of the model.

use chrono::{DateTime, Utc};

/// Severity of a reported event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Info,
    Error,
}

impl EventKind {
    /// Display label used by the panel renderer
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Info => "INFO",
            EventKind::Error => "ERROR",
        }
    }
}

/// A single reported event. Immutable once created.
#[derive(Debug, Clone)]
pub struct EventItem {
    pub kind: EventKind,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl EventItem {
    pub fn new(kind: EventKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered, append-only sequence of events.
///
/// Owned exclusively by the panel controller; everyone else sees snapshots.
/// Length only ever grows, except for an explicit `clear()`.
#[derive(Debug, Default)]
pub struct EventLog {
    items: Vec<EventItem>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event. Returns the new length.
    pub fn append(&mut self, item: EventItem) -> usize {
        self.items.push(item);
        self.items.len()
    }

    /// Remove all events. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.items.len();
        self.items.clear();
        removed
    }

    /// Snapshot of the current contents (copy-on-read, so consumers never
    /// observe a sequence that mutates under them).
    pub fn items(&self) -> Vec<EventItem> {
        self.items.clone()
    }

    /// Item at `index`, if present
    #[allow(dead_code)] // Complete container API; the renderer reads snapshots
    pub fn get(&self, index: usize) -> Option<&EventItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn append_returns_new_length_and_keeps_order() {
        let mut log = EventLog::new();
        assert_eq!(log.append(EventItem::new(EventKind::Info, "a")), 1);
        assert_eq!(log.append(EventItem::new(EventKind::Error, "b")), 2);
        assert_eq!(log.append(EventItem::new(EventKind::Info, "c")), 3);

        let texts: Vec<&str> = log.items.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn clear_reports_removed_count() {
        let mut log = EventLog::new();
        for i in 0..5 {
            log.append(EventItem::new(EventKind::Info, format!("event {i}")));
        }
        assert_eq!(log.clear(), 5);
        assert!(log.is_empty());
        assert_eq!(log.clear(), 0);
    }

    #[test]
    fn get_indexes_in_insertion_order() {
        let mut log = EventLog::new();
        log.append(EventItem::new(EventKind::Info, "a"));
        log.append(EventItem::new(EventKind::Error, "b"));

        assert_eq!(log.get(0).map(|e| e.text.as_str()), Some("a"));
        assert_eq!(log.get(1).map(|e| e.kind), Some(EventKind::Error));
        assert!(log.get(2).is_none());
    }

    #[test]
    fn snapshot_is_detached_from_later_appends() {
        let mut log = EventLog::new();
        log.append(EventItem::new(EventKind::Info, "first"));
        let snapshot = log.items();
        log.append(EventItem::new(EventKind::Info, "second"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(log.len(), 2);
    }
}
