//! Detail overlay for the selected order
//!
//! Lists every known field, including the ones the table has no room for,
//! followed by any keys the alias table does not know.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use serde_json::Value;

use crate::app::App;
use crate::data::fields::is_known_key;
use crate::data::{Field, OrderRecord};
use crate::ui::centered_rect;

const LABEL_WIDTH: usize = 14;

/// Renders the detail overlay for the selected order, if any
pub fn render(frame: &mut Frame, app: &App) {
    let Some((index, record)) = app.selected_record() else {
        return;
    };

    let lines = detail_lines(index, record);
    let overlay_area = centered_rect(64, lines.len() as u16 + 2, frame.area());
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .title(format!(" Emir {} ", record.display_id(index)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, overlay_area);
}

/// One line per field, then the unrecognized keys
fn detail_lines(index: usize, record: &OrderRecord) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = Field::ALL
        .iter()
        .map(|field| {
            let value = match field {
                Field::Id => record.display_id(index),
                _ => record.display(*field),
            };
            detail_line(field.label(), value)
        })
        .collect();

    let extras: Vec<Line> = record
        .as_map()
        .iter()
        .filter(|(key, _)| !is_known_key(key.as_str()))
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            detail_line(key, text)
        })
        .collect();

    if !extras.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Diğer alanlar",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.extend(extras);
    }
    lines
}

fn detail_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {:<width$}", label, width = LABEL_WIDTH),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw(value),
    ])
}
