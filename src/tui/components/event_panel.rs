//! Event panel component
//!
//! Renders the collapsible event list docked at the bottom of the screen.
//! The controller owns what to show and how tall the panel is; this
//! component owns only presentation state: the scroll window and whether
//! the view is following the newest entry.

use crate::events::{EventItem, EventKind};
use crate::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Scroll/presentation state for the event panel
pub struct EventPanel {
    /// Index of the first visible item
    offset: usize,
    /// Follow mode: keep the newest item in view as the log grows
    follow: bool,
}

impl EventPanel {
    pub fn new() -> Self {
        Self {
            offset: 0,
            follow: true,
        }
    }

    /// Re-enter follow mode (controller asked to show the newest item)
    pub fn follow_end(&mut self) {
        self.follow = true;
    }

    /// Reset after a full-list refresh (clear)
    pub fn reset(&mut self) {
        self.offset = 0;
        self.follow = true;
    }

    pub fn scroll_up(&mut self) {
        if self.offset > 0 {
            self.offset -= 1;
        }
        self.follow = false;
    }

    pub fn scroll_down(&mut self, total: usize, viewport: usize) {
        let max_offset = total.saturating_sub(viewport);
        if self.offset < max_offset {
            self.offset += 1;
        }
        if self.offset >= max_offset {
            self.follow = true;
        }
    }

    pub fn page_up(&mut self, viewport: usize) {
        self.offset = self.offset.saturating_sub(viewport.max(1));
        self.follow = false;
    }

    pub fn page_down(&mut self, total: usize, viewport: usize) {
        let max_offset = total.saturating_sub(viewport);
        self.offset = (self.offset + viewport.max(1)).min(max_offset);
        if self.offset >= max_offset {
            self.follow = true;
        }
    }

    /// Render the panel into `area` (already sized by the controller's
    /// animated height; zero-height areas never reach here).
    pub fn render(
        &mut self,
        f: &mut Frame,
        area: Rect,
        items: &[EventItem],
        attention: bool,
        theme: &Theme,
    ) {
        let viewport = area.height.saturating_sub(2) as usize;
        let content_width = area.width.saturating_sub(2) as usize;

        // Clamp the window against the current content, snapping to the
        // bottom in follow mode.
        let max_offset = items.len().saturating_sub(viewport);
        if self.follow {
            self.offset = max_offset;
        } else {
            self.offset = self.offset.min(max_offset);
        }

        let end = (self.offset + viewport).min(items.len());
        let rows: Vec<ListItem> = items[self.offset..end]
            .iter()
            .map(|item| {
                let line = truncate_to_width(&format_event_line(item), content_width);
                ListItem::new(line).style(event_style(item.kind, theme))
            })
            .collect();

        let title = if items.is_empty() {
            " Events ".to_string()
        } else if self.follow {
            format!(" Events ({}) ", items.len())
        } else {
            format!(" Events ({}) [scroll] ", items.len())
        };

        let border_color = if attention {
            theme.attention
        } else {
            theme.highlight
        };

        let list = List::new(rows).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(border_color))
                .title(title),
        );

        f.render_widget(list, area);
    }
}

impl Default for EventPanel {
    fn default() -> Self {
        Self::new()
    }
}

/// Format one event as a display line
fn format_event_line(item: &EventItem) -> String {
    format!(
        "[{}] {:5} {}",
        item.timestamp.format("%H:%M:%S"),
        item.kind.as_str(),
        item.text
    )
}

/// Truncate with an ellipsis using display width, not byte length, so
/// emojis and CJK text line up correctly.
fn truncate_to_width(line: &str, width: usize) -> String {
    if line.width() <= width {
        return line.to_string();
    }
    let target = width.saturating_sub(1);
    let mut current = 0;
    let mut out = String::new();
    for c in line.chars() {
        let w = c.width().unwrap_or(0);
        if current + w > target {
            break;
        }
        current += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// Color style for an event kind
fn event_style(kind: EventKind, theme: &Theme) -> Style {
    match kind {
        EventKind::Info => Style::default().fg(theme.info),
        EventKind::Error => Style::default()
            .fg(theme.error)
            .add_modifier(Modifier::BOLD),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(text: &str) -> EventItem {
        EventItem {
            kind: EventKind::Info,
            text: text.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello world", 8), "hello w…");
        // Wide chars count double
        let truncated = truncate_to_width("ああああ", 5);
        assert!(truncated.width() <= 5);
        assert!(truncated.ends_with('…'));
    }

    #[test]
    fn scroll_up_leaves_follow_mode_and_bottom_restores_it() {
        let mut panel = EventPanel::new();
        assert!(panel.follow);

        panel.scroll_up();
        assert!(!panel.follow);

        // Scroll back to the bottom of a 10-item, 5-row window
        for _ in 0..20 {
            panel.scroll_down(10, 5);
        }
        assert!(panel.follow);
    }

    #[test]
    fn format_includes_kind_label() {
        let line = format_event_line(&item("something happened"));
        assert!(line.contains("INFO"));
        assert!(line.ends_with("something happened"));
    }
}
