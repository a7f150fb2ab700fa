//! Order table screen rendering
//!
//! Renders the main view: a header with summary statistics and data origin,
//! the filtered order table, and a key hint line.

use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::{Field, OrderRecord, OrderStats, StatusTone};
use crate::refresh::Snapshot;

/// Columns shown in the table, left to right
pub const TABLE_FIELDS: [Field; 17] = [
    Field::Id,
    Field::OpenedAt,
    Field::Symbol,
    Field::Side,
    Field::Volume,
    Field::EntryPrice,
    Field::StopLoss,
    Field::TakeProfit,
    Field::CurrentPrice,
    Field::Rsi,
    Field::Macd,
    Field::Ema,
    Field::Stoch,
    Field::Status,
    Field::ListType,
    Field::Profit,
    Field::ProfitPercent,
];

/// Column widths matching [`TABLE_FIELDS`]
const COLUMN_WIDTHS: [u16; 17] = [5, 19, 10, 5, 7, 10, 10, 10, 10, 6, 8, 8, 7, 8, 8, 10, 8];

/// Color for a status cell
fn tone_color(tone: StatusTone) -> Color {
    match tone {
        StatusTone::Positive => Color::Green,
        StatusTone::Negative => Color::Red,
        StatusTone::Neutral => Color::Gray,
    }
}

/// Color for a profit value; unparseable values count as zero
fn profit_color(profit: f64) -> Color {
    if profit >= 0.0 {
        Color::Green
    } else {
        Color::Red
    }
}

/// Color for an RSI reading: overbought red, oversold green
fn rsi_color(rsi: Option<f64>) -> Color {
    match rsi {
        Some(v) if v > 70.0 => Color::Red,
        Some(v) if v < 30.0 => Color::Green,
        _ => Color::White,
    }
}

/// Builds the styled cell for one field of one record
fn field_cell(record: &OrderRecord, index: usize, field: Field) -> Cell<'static> {
    match field {
        Field::Id => Cell::from(record.display_id(index)),
        Field::Symbol => Cell::from(record.display(field))
            .style(Style::default().add_modifier(Modifier::BOLD)),
        Field::Status => {
            let status = record.text(field);
            let color = tone_color(StatusTone::of(&status));
            Cell::from(status).style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        }
        Field::Rsi => Cell::from(record.display(field))
            .style(Style::default().fg(rsi_color(record.number(field)))),
        Field::Profit | Field::ProfitPercent => {
            let color = profit_color(record.number_or_zero(Field::Profit));
            let text = match (field, record.get(field)) {
                (Field::ProfitPercent, Some(_)) if record.number(field).is_some() => {
                    format!("{}%", record.display(field))
                }
                _ => record.display(field),
            };
            Cell::from(text).style(Style::default().fg(color))
        }
        _ => Cell::from(record.display(field)),
    }
}

/// Renders the order table screen
///
/// # Arguments
/// * `frame` - The ratatui Frame to render to
/// * `app` - The application state containing the snapshot, filter and selection
pub fn render_order_table(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(3),    // Table
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_table(frame, app, chunks[1]);
    render_help(frame, chunks[2], app);
}

/// Renders the title, statistics and data origin
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let stats = app.stats();
    let now = Local::now().format("%d.%m.%Y %H:%M:%S").to_string();

    let mut title = vec![
        Span::styled(
            "TRUESIGNAL",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  Emir Takip  "),
        Span::styled(now, Style::default().fg(Color::White)),
    ];
    if app.refreshing {
        title.push(Span::styled("  Yenileniyor...", Style::default().fg(Color::Yellow)));
    }

    let lines = vec![
        Line::from(title),
        stats_line(&stats),
        origin_line(app.snapshot.as_ref()),
    ];

    frame.render_widget(Paragraph::new(lines), area);
}

/// Summary statistics line
fn stats_line(stats: &OrderStats) -> Line<'static> {
    Line::from(vec![
        Span::styled("Toplam: ", Style::default().fg(Color::Gray)),
        Span::raw(stats.total.to_string()),
        Span::styled("  Açık: ", Style::default().fg(Color::Gray)),
        Span::styled(stats.open.to_string(), Style::default().fg(Color::Green)),
        Span::styled("  Kapalı: ", Style::default().fg(Color::Gray)),
        Span::styled(stats.closed.to_string(), Style::default().fg(Color::Red)),
        Span::styled("  Toplam K/Z: ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{:.4}", stats.total_profit),
            Style::default()
                .fg(profit_color(stats.total_profit))
                .add_modifier(Modifier::BOLD),
        ),
    ])
}

/// Where the data came from and when
fn origin_line(snapshot: Option<&Snapshot>) -> Line<'static> {
    let Some(snapshot) = snapshot else {
        return Line::from(Span::styled(
            "Veriler yükleniyor...",
            Style::default().fg(Color::DarkGray),
        ));
    };

    let color = match snapshot {
        Snapshot::Live(response) if response.success => Color::Green,
        Snapshot::Live(_) | Snapshot::Cached { .. } => Color::Yellow,
        Snapshot::Unavailable { .. } => Color::Red,
    };

    let mut spans = vec![Span::styled(
        format!("Kaynak: {}", snapshot.origin()),
        Style::default().fg(color),
    )];
    if let Some(updated) = snapshot.updated_at() {
        spans.push(Span::styled(
            format!(
                "  Son güncelleme: {}",
                updated.with_timezone(&Local).format("%H:%M:%S")
            ),
            Style::default().fg(Color::Gray),
        ));
    }
    if let Some(error) = snapshot.error() {
        spans.push(Span::styled(
            format!("  Hata: {}", error),
            Style::default().fg(Color::Red),
        ));
    }
    Line::from(spans)
}

/// Renders the filtered orders, or a placeholder when there are none
fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let visible = app.visible_records();
    let block = Block::default()
        .title(format!(
            " Emirler ({}/{}) [filtre: {}] ",
            visible.len(),
            app.records().len(),
            app.filter.status.label()
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if visible.is_empty() {
        let message = Paragraph::new(Line::from(Span::styled(
            "Gösterilecek emir bulunamadı.",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(message, area);
        return;
    }

    let header = Row::new(
        TABLE_FIELDS
            .iter()
            .map(|field| Cell::from(field.label()))
            .collect::<Vec<_>>(),
    )
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = visible
        .iter()
        .map(|(index, record)| {
            Row::new(
                TABLE_FIELDS
                    .iter()
                    .map(|field| field_cell(record, *index, *field))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let widths = COLUMN_WIDTHS.map(Constraint::Length);
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("\u{25B8} "); // ▸

    let mut state = TableState::default().with_selected(Some(app.selected_index));
    frame.render_stateful_widget(table, area, &mut state);
}

/// Renders key hints with data freshness
fn render_help(frame: &mut Frame, area: Rect, app: &App) {
    let mut help_spans = vec![
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Navigate  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Details  "),
        Span::styled("f", Style::default().fg(Color::Yellow)),
        Span::raw(" Filter  "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" Refresh  "),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::raw(" Help  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ];

    if let Some(last_refresh) = app.last_refresh {
        let elapsed = Local::now() - last_refresh;
        let secs_ago = elapsed.num_seconds();
        let freshness_text = if secs_ago < 60 {
            format!(" │ Data: {}s ago", secs_ago.max(0))
        } else {
            format!(" │ Data: {}m ago", elapsed.num_minutes())
        };
        help_spans.push(Span::styled(
            freshness_text,
            Style::default().fg(Color::DarkGray),
        ));
    }

    let paragraph = Paragraph::new(Line::from(help_spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}
