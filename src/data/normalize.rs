//! Response normalizer
//!
//! The feed has been published in several layouts over its lifetime. Each
//! layout is a [`ResponseShape`] variant; [`ResponseShape::classify`] tries
//! them in a fixed order and every variant folds into the same
//! [`NormalizedResponse`].

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::format::parse_instant;
use super::text::{repair, repair_value};
use super::{NormalizedResponse, OrderRecord};

/// Key holding the order list in every object layout
const ORDERS_KEY: &str = "emirler";

/// Source label when an object layout carries none
const DEFAULT_OBJECT_SOURCE: &str = "api";

/// Source label for a bare top-level array
const ARRAY_SOURCE: &str = "array";

/// Metadata carried next to the orders in object layouts
#[derive(Debug, Clone, Copy, Default)]
pub struct Envelope<'a> {
    pub last_fetch: Option<&'a Value>,
    pub source: Option<&'a str>,
}

impl<'a> Envelope<'a> {
    fn from_object(object: &'a Map<String, Value>) -> Self {
        Self {
            last_fetch: object.get("lastFetch").filter(|v| !v.is_null()),
            source: object.get("source").and_then(Value::as_str),
        }
    }
}

/// The recognized feed layouts, in matching precedence
#[derive(Debug, Clone)]
pub enum ResponseShape<'a> {
    /// `{success: true, emirler: {emirler: [...], success}}`
    DoublyNested {
        orders: &'a [Value],
        inner_success: bool,
        envelope: Envelope<'a>,
    },
    /// `{success: true, emirler: [...]}`
    Nested {
        orders: &'a [Value],
        envelope: Envelope<'a>,
    },
    /// `{success: true, emirler: {<key>: [...]}}`
    Keyed {
        key: &'a str,
        orders: &'a [Value],
        envelope: Envelope<'a>,
    },
    /// `{success: false, ...}`
    Failure {
        dropped: usize,
        envelope: Envelope<'a>,
    },
    /// `[...]`
    BareArray(&'a [Value]),
    /// Anything else
    Unknown,
}

impl<'a> ResponseShape<'a> {
    /// Matches a raw value against the known layouts, first match wins
    pub fn classify(raw: &'a Value) -> Self {
        match raw {
            Value::Array(items) => ResponseShape::BareArray(items),
            Value::Object(object) => Self::classify_object(object),
            _ => ResponseShape::Unknown,
        }
    }

    fn classify_object(object: &'a Map<String, Value>) -> Self {
        let Some(success) = object.get("success").and_then(Value::as_bool) else {
            return ResponseShape::Unknown;
        };
        let envelope = Envelope::from_object(object);
        let orders = object.get(ORDERS_KEY);

        if !success {
            return ResponseShape::Failure {
                dropped: orders.map(count_orders).unwrap_or(0),
                envelope,
            };
        }

        match orders {
            Some(Value::Object(inner)) => {
                if let Some(Value::Array(items)) = inner.get(ORDERS_KEY) {
                    let inner_success = inner.get("success").and_then(Value::as_bool).unwrap_or(true);
                    return ResponseShape::DoublyNested {
                        orders: items,
                        inner_success,
                        envelope,
                    };
                }
                inner
                    .iter()
                    .find_map(|(key, value)| match value {
                        Value::Array(items) => Some(ResponseShape::Keyed {
                            key: key.as_str(),
                            orders: items,
                            envelope,
                        }),
                        _ => None,
                    })
                    .unwrap_or(ResponseShape::Unknown)
            }
            Some(Value::Array(items)) => ResponseShape::Nested {
                orders: items,
                envelope,
            },
            _ => ResponseShape::Unknown,
        }
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            ResponseShape::DoublyNested { .. } => "doubly-nested",
            ResponseShape::Nested { .. } => "nested",
            ResponseShape::Keyed { .. } => "keyed",
            ResponseShape::Failure { .. } => "failure",
            ResponseShape::BareArray(_) => "bare-array",
            ResponseShape::Unknown => "unknown",
        }
    }

    /// Folds the shape into a normalized response
    pub fn into_response(self, now: DateTime<Utc>) -> NormalizedResponse {
        match self {
            ResponseShape::DoublyNested {
                orders,
                inner_success,
                envelope,
            } => {
                // The outer flag is always true here
                build(orders, inner_success, envelope, DEFAULT_OBJECT_SOURCE, now)
            }
            ResponseShape::Nested { orders, envelope } => {
                build(orders, true, envelope, DEFAULT_OBJECT_SOURCE, now)
            }
            ResponseShape::Keyed {
                key,
                orders,
                envelope,
            } => {
                debug!(key, "Orders taken from keyed property");
                build(orders, true, envelope, DEFAULT_OBJECT_SOURCE, now)
            }
            ResponseShape::Failure { dropped, envelope } => {
                if dropped > 0 {
                    warn!(dropped, "Feed reported failure; ignoring orders it still listed");
                }
                build(&[], false, envelope, DEFAULT_OBJECT_SOURCE, now)
            }
            ResponseShape::BareArray(orders) => {
                build(orders, true, Envelope::default(), ARRAY_SOURCE, now)
            }
            ResponseShape::Unknown => NormalizedResponse::unknown(now),
        }
    }
}

fn count_orders(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Object(inner) => inner
            .values()
            .find_map(|v| v.as_array())
            .map(Vec::len)
            .unwrap_or(0),
        _ => 0,
    }
}

fn build(
    orders: &[Value],
    success: bool,
    envelope: Envelope<'_>,
    default_source: &str,
    now: DateTime<Utc>,
) -> NormalizedResponse {
    NormalizedResponse {
        records: to_records(orders),
        fetched_at: envelope.last_fetch.and_then(parse_instant).unwrap_or(now),
        source: repair(envelope.source.unwrap_or(default_source)),
        success,
    }
}

/// Converts raw orders into repaired records, keeping source order
fn to_records(orders: &[Value]) -> Vec<OrderRecord> {
    orders
        .iter()
        .enumerate()
        .filter_map(|(index, order)| match order {
            Value::Object(map) => {
                let mut map = map.clone();
                map.values_mut().for_each(repair_value);
                Some(OrderRecord::from_map(map))
            }
            other => {
                debug!(index, kind = json_kind(other), "Skipping non-object order entry");
                None
            }
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Normalizes a raw feed value at the given instant
pub fn normalize_at(raw: &Value, now: DateTime<Utc>) -> NormalizedResponse {
    let shape = ResponseShape::classify(raw);
    let name = shape.name();
    let response = shape.into_response(now);
    debug!(
        shape = name,
        records = response.records.len(),
        success = response.success,
        "Normalized feed response"
    );
    response
}

/// Normalizes a raw feed value of unknown layout. Never fails.
pub fn normalize(raw: &Value) -> NormalizedResponse {
    normalize_at(raw, Utc::now())
}
