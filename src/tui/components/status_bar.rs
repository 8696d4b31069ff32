// Status bar component
//
// One line at the bottom: panel indicator (with the attention cue), event
// counts, auto-expand state, and key hints.

use crate::events::EventKind;
use crate::panel::PanelState;
use crate::theme::Theme;
use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const HINTS: &str = "space:panel  a:auto-expand  c:clear  e/i:inject  q:quit";

/// Render the status bar
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let items = app.panel.items();
    let errors = items
        .iter()
        .filter(|i| i.kind == EventKind::Error)
        .count();

    let (indicator, indicator_style) = indicator_for(app, theme);

    let auto = if app.panel.auto_expand() {
        "auto-expand on"
    } else {
        "auto-expand off"
    };

    let line = Line::from(vec![
        Span::styled(indicator, indicator_style),
        Span::styled(
            format!(" {} events ({} errors) │ {} │ ", items.len(), errors, auto),
            Style::default().fg(theme.foreground),
        ),
        Span::styled(HINTS, Style::default().fg(theme.muted)),
    ]);

    f.render_widget(Paragraph::new(line), area);
}

/// Panel indicator: state glyph, swapped for a warning glyph while the
/// attention cue is up (the terminal equivalent of the warning icon).
fn indicator_for(app: &App, theme: &Theme) -> (&'static str, Style) {
    if app.attention() {
        return (
            " ⚠ ",
            Style::default()
                .fg(theme.attention)
                .add_modifier(Modifier::BOLD),
        );
    }
    let glyph = match app.panel.state() {
        PanelState::Collapsed => " ▸ ",
        PanelState::Expanded => " ▾ ",
        PanelState::Expanding | PanelState::Collapsing => " ⋯ ",
    };
    (glyph, Style::default().fg(theme.highlight))
}
