//! Core data models for TrueSignal
//!
//! This module contains the order record type, the normalized response the
//! rest of the application consumes, and the helpers that turn loosely typed
//! feed JSON into display-ready values.

pub mod fields;
pub mod format;
pub mod normalize;
pub mod stats;
pub mod text;

pub use fields::{Field, FieldKind};
pub use normalize::{normalize, normalize_at, ResponseShape};
pub use stats::{OrderFilter, OrderStats, OrderStatus, StatusFilter, StatusTone};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use format::PLACEHOLDER;

/// One trading order as sent by the feed.
///
/// The record keeps every key the producer sent, in the producer's order.
/// Logical fields are read through the alias table in [`fields`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderRecord(Map<String, Value>);

impl OrderRecord {
    /// Wraps a JSON object as an order record
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Raw access to the underlying object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Resolves a logical field through its aliases
    pub fn get(&self, field: Field) -> Option<&Value> {
        fields::resolve(&self.0, field)
    }

    /// Field value as text, `-` when absent
    pub fn text(&self, field: Field) -> String {
        match self.get(field) {
            Some(Value::String(s)) if s.is_empty() => PLACEHOLDER.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => PLACEHOLDER.to_string(),
        }
    }

    /// Field value as a number; `None` when absent or not numeric
    pub fn number(&self, field: Field) -> Option<f64> {
        self.get(field).and_then(format::parse_number)
    }

    /// Field value as a number, `0.0` when absent or not numeric
    pub fn number_or_zero(&self, field: Field) -> f64 {
        self.number(field).unwrap_or(0.0)
    }

    /// Field value rendered for display according to its [`FieldKind`]
    pub fn display(&self, field: Field) -> String {
        let Some(value) = self.get(field) else {
            return PLACEHOLDER.to_string();
        };
        match field.kind() {
            FieldKind::Text => self.text(field),
            FieldKind::Number(decimals) => format::format_number(value, decimals),
            FieldKind::Timestamp => format::format_date_time(value),
        }
    }

    /// Record identifier, or its 1-based position when the feed sent none
    pub fn display_id(&self, index: usize) -> String {
        match self.get(Field::Id) {
            Some(_) => self.text(Field::Id),
            None => (index + 1).to_string(),
        }
    }

    /// Parsed status of the order
    pub fn status(&self) -> OrderStatus {
        OrderStatus::classify(&self.text(Field::Status))
    }
}

impl From<Map<String, Value>> for OrderRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self::from_map(map)
    }
}

/// Result of normalizing one feed response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResponse {
    /// Orders in the order the feed listed them
    pub records: Vec<OrderRecord>,
    /// When the producer fetched the data, or when we normalized it
    pub fetched_at: DateTime<Utc>,
    /// Label identifying where the data came from
    pub source: String,
    /// Whether the producer reported success
    pub success: bool,
}

impl NormalizedResponse {
    /// The result for input that matches no known shape
    pub fn unknown(now: DateTime<Utc>) -> Self {
        Self {
            records: Vec::new(),
            fetched_at: now,
            source: "unknown".to_string(),
            success: false,
        }
    }

    /// Whether this response should replace the cached snapshot
    pub fn is_cacheable(&self) -> bool {
        self.success && !self.records.is_empty()
    }
}
