// UI rendering logic
//
// The layout is a vertical stack: title bar, session overview, the docked
// event panel (height driven by the controller's animation, 0 = hidden),
// and the status bar. Called on every frame.

use crate::config::VERSION;
use crate::events::EventKind;
use crate::tui::app::App;
use crate::tui::components::status_bar;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &mut App) {
    app.consume_view_flags();

    // The panel never swallows the whole screen: keep at least the title,
    // three content rows, and the status bar visible.
    let max_panel = f.area().height.saturating_sub(5);
    let panel_height = app.panel_height().min(max_panel);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // Title bar
            Constraint::Min(3),               // Session overview
            Constraint::Length(panel_height), // Event panel (0 = hidden)
            Constraint::Length(1),            // Status bar
        ])
        .split(f.area());

    render_title(f, chunks[0], app);
    render_session(f, chunks[1], app);

    if panel_height > 0 {
        let items = app.panel.items();
        let attention = app.attention();
        let theme = app.theme.clone();
        app.event_panel
            .render(f, chunks[2], &items, attention, &theme);
    }

    status_bar::render(f, chunks[3], app);

    let screen = f.area();
    if let Some(toast) = &app.toast {
        toast.render(f, screen, &app.theme);
    }
}

fn render_title(f: &mut Frame, area: Rect, app: &App) {
    let title = Line::from(vec![
        Span::styled(
            " evlog ",
            Style::default()
                .fg(app.theme.highlight)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("v{VERSION} — live event console"),
            Style::default().fg(app.theme.muted),
        ),
    ]);
    f.render_widget(Paragraph::new(title), area);
}

/// Session overview: what the demo client has been up to, at a glance
fn render_session(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let items = app.panel.items();
    let errors = items
        .iter()
        .filter(|i| i.kind == EventKind::Error)
        .count();

    let last_event = items
        .last()
        .map(|i| i.text.clone())
        .unwrap_or_else(|| "waiting for activity…".to_string());

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  uptime     ", Style::default().fg(theme.muted)),
            Span::styled(app.uptime(), Style::default().fg(theme.foreground)),
        ]),
        Line::from(vec![
            Span::styled("  events     ", Style::default().fg(theme.muted)),
            Span::styled(
                format!("{} total, {} errors", items.len(), errors),
                Style::default().fg(theme.foreground),
            ),
        ]),
        Line::from(vec![
            Span::styled("  panel      ", Style::default().fg(theme.muted)),
            Span::styled(
                app.panel.state().name(),
                Style::default().fg(theme.highlight),
            ),
        ]),
        Line::from(vec![
            Span::styled("  last event ", Style::default().fg(theme.muted)),
            Span::styled(last_event, Style::default().fg(theme.foreground)),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border))
        .title(" Session ");

    f.render_widget(Paragraph::new(lines).block(block), area);
}
