//! Application state management for TrueSignal
//!
//! This module contains the state the driver owns: the current snapshot of
//! orders, the active filter and selection, and keyboard handling.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};

use crate::cache::CacheEntry;
use crate::data::{OrderFilter, OrderRecord, OrderStats};
use crate::refresh::{RefreshMessage, Snapshot};

/// Application state enum representing the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Waiting for the first snapshot
    Loading,
    /// Order table
    OrderList,
}

/// Main application struct managing state and data
#[derive(Debug)]
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Orders currently shown and where they came from
    pub snapshot: Option<Snapshot>,
    /// Active status and symbol filter
    pub filter: OrderFilter,
    /// Index into the filtered rows
    pub selected_index: usize,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag indicating a refresh has been requested
    pub refresh_requested: bool,
    /// A refresh cycle is in flight
    pub refreshing: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag to show the detail overlay for the selected order
    pub show_detail: bool,
    /// When the last snapshot arrived
    pub last_refresh: Option<DateTime<Local>>,
}

impl App {
    /// Creates a new App with the given filter, waiting for data
    pub fn new(filter: OrderFilter) -> Self {
        Self {
            state: AppState::Loading,
            snapshot: None,
            filter,
            selected_index: 0,
            should_quit: false,
            refresh_requested: false,
            refreshing: false,
            show_help: false,
            show_detail: false,
            last_refresh: None,
        }
    }

    /// Shows a cached snapshot while the first fetch runs
    pub fn with_cached(mut self, entry: Option<CacheEntry>) -> Self {
        if let Some(entry) = entry {
            self.apply_snapshot(Snapshot::Cached {
                entry,
                reason: "waiting for feed".to_string(),
            });
        }
        self
    }

    /// Replaces the displayed snapshot
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = Some(snapshot);
        self.last_refresh = Some(Local::now());
        self.state = AppState::OrderList;
        self.clamp_selection();
        if self.selected_record().is_none() {
            self.show_detail = false;
        }
    }

    /// Applies a message from the refresh task
    pub fn handle_refresh_message(&mut self, message: RefreshMessage) {
        match message {
            RefreshMessage::RefreshStarted => self.refreshing = true,
            RefreshMessage::Completed(snapshot) => {
                self.refreshing = false;
                self.apply_snapshot(snapshot);
            }
        }
    }

    /// All orders in the current snapshot
    pub fn records(&self) -> &[OrderRecord] {
        self.snapshot.as_ref().map(Snapshot::records).unwrap_or(&[])
    }

    /// Orders passing the filter, with their positions in the snapshot
    pub fn visible_records(&self) -> Vec<(usize, &OrderRecord)> {
        self.filter.apply(self.records())
    }

    /// The highlighted order with its position in the snapshot
    pub fn selected_record(&self) -> Option<(usize, &OrderRecord)> {
        self.visible_records().get(self.selected_index).copied()
    }

    /// Summary over every order in the snapshot
    pub fn stats(&self) -> OrderStats {
        OrderStats::from_records(self.records())
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q` or `Esc`: Quit the application
    /// - `Up`/`k`, `Down`/`j`: Move selection
    /// - `g`/`G`: Jump to first/last row
    /// - `Enter`: Show every field of the selected order
    /// - `f`: Cycle the status filter
    /// - `r`: Refresh now
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Help overlay intercepts all keys when shown
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        if self.show_detail {
            match key_event.code {
                KeyCode::Esc | KeyCode::Enter => self.show_detail = false,
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match self.state {
            AppState::Loading => {
                if matches!(key_event.code, KeyCode::Char('q') | KeyCode::Esc) {
                    self.should_quit = true;
                }
            }
            AppState::OrderList => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.move_selection_up();
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.move_selection_down();
                }
                KeyCode::Char('g') => {
                    self.selected_index = 0;
                }
                KeyCode::Char('G') => {
                    self.selected_index = self.visible_records().len().saturating_sub(1);
                }
                KeyCode::Enter => {
                    self.show_detail = self.selected_record().is_some();
                }
                KeyCode::Char('f') => {
                    self.filter.status = self.filter.status.next();
                    self.clamp_selection();
                }
                KeyCode::Char('r') => {
                    self.refresh_requested = true;
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
        }
    }

    /// Moves the selection up, wrapping to bottom if at top
    fn move_selection_up(&mut self) {
        let count = self.visible_records().len();
        if count == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = count - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Moves the selection down, wrapping to top if at bottom
    fn move_selection_down(&mut self) {
        let count = self.visible_records().len();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }

    /// Keeps the selection inside the filtered rows
    fn clamp_selection(&mut self) {
        let count = self.visible_records().len();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{normalize, StatusFilter};
    use chrono::Utc;
    use crossterm::event::KeyModifiers;
    use serde_json::json;

    /// Helper to create a KeyEvent for testing
    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn live_snapshot() -> Snapshot {
        Snapshot::Live(normalize(&json!({
            "success": true,
            "emirler": [
                {"Sembol": "EURUSD", "Durum": "Açık", "KarZarar": 10},
                {"Sembol": "XAUUSD", "Durum": "Kapalı", "KarZarar": -4},
                {"Sembol": "GBPUSD", "Durum": "Açık", "KarZarar": 1.5}
            ]
        })))
    }

    fn loaded_app() -> App {
        let mut app = App::new(OrderFilter::default());
        app.apply_snapshot(live_snapshot());
        app
    }

    #[test]
    fn test_new_app_is_loading() {
        let app = App::new(OrderFilter::default());
        assert_eq!(app.state, AppState::Loading);
        assert!(app.records().is_empty());
        assert!(app.last_refresh.is_none());
    }

    #[test]
    fn test_with_cached_shows_cached_orders() {
        let entry = CacheEntry {
            records: live_snapshot().records().to_vec(),
            written_at: Utc::now(),
        };

        let app = App::new(OrderFilter::default()).with_cached(Some(entry));

        assert_eq!(app.state, AppState::OrderList);
        assert_eq!(app.records().len(), 3);
        assert_eq!(app.snapshot.as_ref().unwrap().origin(), "cache");
    }

    #[test]
    fn test_with_cached_none_stays_loading() {
        let app = App::new(OrderFilter::default()).with_cached(None);
        assert_eq!(app.state, AppState::Loading);
    }

    #[test]
    fn test_refresh_messages_update_state() {
        let mut app = App::new(OrderFilter::default());

        app.handle_refresh_message(RefreshMessage::RefreshStarted);
        assert!(app.refreshing);

        app.handle_refresh_message(RefreshMessage::Completed(live_snapshot()));
        assert!(!app.refreshing);
        assert_eq!(app.state, AppState::OrderList);
        assert_eq!(app.records().len(), 3);
        assert!(app.last_refresh.is_some());
    }

    #[test]
    fn test_stats_cover_all_records() {
        let mut app = loaded_app();
        app.filter.status = StatusFilter::Closed;

        let stats = app.stats();

        assert_eq!(stats.total, 3);
        assert_eq!(stats.open, 2);
        assert_eq!(stats.closed, 1);
        assert!((stats.total_profit - 7.5).abs() < 1e-9);
        assert_eq!(app.visible_records().len(), 1);
    }

    #[test]
    fn test_selection_wraps() {
        let mut app = loaded_app();

        app.handle_key(key_event(KeyCode::Up));
        assert_eq!(app.selected_index, 2);

        app.handle_key(key_event(KeyCode::Char('j')));
        assert_eq!(app.selected_index, 0);

        app.handle_key(key_event(KeyCode::Char('G')));
        assert_eq!(app.selected_index, 2);

        app.handle_key(key_event(KeyCode::Char('g')));
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_filter_key_cycles_and_clamps_selection() {
        let mut app = loaded_app();
        app.selected_index = 2;

        app.handle_key(key_event(KeyCode::Char('f')));
        assert_eq!(app.filter.status, StatusFilter::Open);
        assert_eq!(app.visible_records().len(), 2);
        assert_eq!(app.selected_index, 1);

        app.handle_key(key_event(KeyCode::Char('f')));
        assert_eq!(app.filter.status, StatusFilter::Closed);
        assert_eq!(app.selected_index, 0);

        app.handle_key(key_event(KeyCode::Char('f')));
        assert_eq!(app.filter.status, StatusFilter::All);
    }

    #[test]
    fn test_refresh_key_sets_flag() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Char('r')));
        assert!(app.refresh_requested);
    }

    #[test]
    fn test_help_overlay_intercepts_keys() {
        let mut app = loaded_app();

        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key_event(KeyCode::Char('j')));
        assert_eq!(app.selected_index, 0);

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_enter_toggles_detail_for_selected_order() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Char('j')));

        app.handle_key(key_event(KeyCode::Enter));
        assert!(app.show_detail);
        let (index, record) = app.selected_record().unwrap();
        assert_eq!(index, 1);
        assert_eq!(record.text(crate::data::Field::Symbol), "XAUUSD");

        // Navigation is blocked while the overlay is open
        app.handle_key(key_event(KeyCode::Char('j')));
        assert_eq!(app.selected_index, 1);

        app.handle_key(key_event(KeyCode::Esc));
        assert!(!app.show_detail);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_enter_without_orders_shows_nothing() {
        let mut app = App::new(OrderFilter::default());
        app.apply_snapshot(Snapshot::Unavailable {
            reason: "offline".to_string(),
        });

        app.handle_key(key_event(KeyCode::Enter));

        assert!(!app.show_detail);
        assert!(app.selected_record().is_none());
    }

    #[test]
    fn test_detail_closes_when_orders_disappear() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Enter));
        assert!(app.show_detail);

        app.apply_snapshot(Snapshot::Unavailable {
            reason: "offline".to_string(),
        });

        assert!(!app.show_detail);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new(OrderFilter::default());
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_selection_on_empty_snapshot() {
        let mut app = App::new(OrderFilter::default());
        app.apply_snapshot(Snapshot::Unavailable {
            reason: "offline".to_string(),
        });

        app.handle_key(key_event(KeyCode::Down));

        assert_eq!(app.selected_index, 0);
        assert!(app.visible_records().is_empty());
    }
}
