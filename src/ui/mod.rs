//! UI rendering module for TrueSignal
//!
//! Terminal rendering with ratatui for the interactive view, plus a plain-text
//! table for one-shot runs.

use ratatui::layout::Rect;

pub mod help_overlay;
pub mod order_detail;
pub mod order_table;
pub mod plain;

pub use help_overlay::render as render_help_overlay;
pub use order_detail::render as render_order_detail;
pub use order_table::render_order_table;
pub use plain::render_plain;

/// A `width` x `height` rect centered in `area`, shrunk to fit when `area` is smaller
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
