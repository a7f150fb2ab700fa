//! Help overlay showing all keybindings
//!
//! Renders a centered modal with the key list and the filters currently in
//! effect, so it is clear why rows may be missing from the table.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::centered_rect;

const KEYS: [(&str, &str); 8] = [
    ("↑/k, ↓/j", "Move selection up/down"),
    ("g / G", "Jump to first/last order"),
    ("Enter", "Show every field of the order"),
    ("f", "Cycle filter: all, open, closed"),
    ("r", "Refresh from feed now"),
    ("?", "Toggle this help"),
    ("Esc", "Close overlay"),
    ("q", "Quit application"),
];

/// Renders the help overlay on top of the current view
pub fn render(frame: &mut Frame, app: &App) {
    let heading = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(KEYS.iter().map(|(key, description)| help_line(key, description)));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Active filters", heading)));
    lines.push(help_line("status", app.filter.status.label()));
    lines.push(help_line(
        "symbol",
        app.filter.symbol.as_deref().unwrap_or("any"),
    ));
    lines.push(help_line(
        "source",
        app.snapshot.as_ref().map_or("loading", |s| s.origin()),
    ));

    let overlay_area = centered_rect(52, lines.len() as u16 + 2, frame.area());
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}

/// One key/description row
fn help_line(key: &str, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", key), Style::default().fg(Color::Yellow)),
        Span::raw(description.to_string()),
    ])
}
