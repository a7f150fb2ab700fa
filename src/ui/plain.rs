//! Plain-text order table for one-shot runs

use std::fmt::Write;

use crate::data::{Field, OrderRecord, OrderStats};
use crate::refresh::Snapshot;
use crate::ui::order_table::TABLE_FIELDS;

/// Renders the snapshot header, the given rows, and totals as aligned text
pub fn render_plain(snapshot: &Snapshot, rows: &[(usize, &OrderRecord)], stats: &OrderStats) -> String {
    let mut out = String::new();

    let _ = write!(out, "Kaynak: {}", snapshot.origin());
    if let Some(updated) = snapshot.updated_at() {
        let _ = write!(
            out,
            "  Son güncelleme: {}",
            updated
                .with_timezone(&chrono::Local)
                .format("%d.%m.%Y %H:%M:%S")
        );
    }
    out.push('\n');
    if let Some(error) = snapshot.error() {
        let _ = writeln!(out, "Hata: {}", error);
    }

    if rows.is_empty() {
        out.push_str("Gösterilecek emir bulunamadı.\n");
    } else {
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|(index, record)| {
                TABLE_FIELDS
                    .iter()
                    .map(|field| match field {
                        Field::Id => record.display_id(*index),
                        _ => record.display(*field),
                    })
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = TABLE_FIELDS
            .iter()
            .enumerate()
            .map(|(col, field)| {
                cells
                    .iter()
                    .map(|row| row[col].chars().count())
                    .chain(std::iter::once(field.label().chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<String> = TABLE_FIELDS.iter().map(|f| f.label().to_string()).collect();
        push_row(&mut out, &header, &widths);
        for row in &cells {
            push_row(&mut out, row, &widths);
        }
    }

    let _ = writeln!(
        out,
        "Toplam: {}  Açık: {}  Kapalı: {}  Toplam K/Z: {:.4}",
        stats.total, stats.open, stats.closed, stats.total_profit
    );
    out
}

fn push_row(out: &mut String, row: &[String], widths: &[usize]) {
    let line: Vec<String> = row
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{normalize, OrderFilter, StatusFilter};
    use serde_json::json;

    #[test]
    fn test_plain_table_lists_filtered_rows_and_totals() {
        let snapshot = Snapshot::Live(normalize(&json!({
            "success": true,
            "emirler": [
                {"Sembol": "EURUSD", "Durum": "Açık", "KapanisFiyati": 1.085, "KarZarar": 3},
                {"Sembol": "XAUUSD", "Durum": "Kapalı", "KarZarar": 1.25}
            ]
        })));
        let filter = OrderFilter {
            status: StatusFilter::Open,
            symbol: None,
        };
        let rows = filter.apply(snapshot.records());
        let stats = OrderStats::from_records(snapshot.records());

        let text = render_plain(&snapshot, &rows, &stats);

        assert!(text.starts_with("Kaynak: live"));
        assert!(text.contains("EURUSD"));
        assert!(!text.contains("XAUUSD"));
        assert!(text.contains("Toplam: 2  Açık: 1  Kapalı: 1  Toplam K/Z: 4.2500"));
    }

    #[test]
    fn test_plain_table_reports_unavailable_feed() {
        let snapshot = Snapshot::Unavailable {
            reason: "HTTP error! status: 404 Not Found".to_string(),
        };
        let stats = OrderStats::from_records(snapshot.records());

        let text = render_plain(&snapshot, &[], &stats);

        assert!(text.contains("Hata: HTTP error! status: 404"));
        assert!(text.contains("bulunamadı"));
        assert!(text.contains("Toplam: 0"));
    }
}
