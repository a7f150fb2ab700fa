//! Declarative field alias table
//!
//! Feed producers have renamed fields over time (Turkish names, snake_case
//! names, names from an older signal bot). Each logical [`Field`] lists its
//! historical keys in priority order and a single routine resolves them.

use serde_json::{Map, Value};

use super::format::{DEFAULT_DECIMALS, PRICE_DECIMALS};

/// How a field's value should be interpreted for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text shown as-is
    Text,
    /// Number rendered with the given decimal places
    Number(u32),
    /// Timestamp rendered in the display date format
    Timestamp,
}

/// Logical fields of an order record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    OpenedAt,
    Symbol,
    Side,
    Volume,
    EntryPrice,
    StopLoss,
    TakeProfit,
    CurrentPrice,
    Rsi,
    Macd,
    Ema,
    Stoch,
    Status,
    ListType,
    Profit,
    ProfitPercent,
    ClosedAt,
    Comment,
}

impl Field {
    /// Every field, in the order the detail view lists them
    pub const ALL: [Field; 19] = [
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
        Field::ClosedAt,
        Field::Comment,
    ];

    /// Source keys for this field, highest priority first
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Id => &["Id", "ID", "id"],
            Field::OpenedAt => &["Tarih/Saat", "Tarih", "Saat", "EmirZamani", "created_at"],
            Field::Symbol => &["Sembol", "symbol", "Coin"],
            Field::Side => &["Tip", "type", "SignalType"],
            Field::Volume => &["Lot", "volume", "Amount"],
            Field::EntryPrice => &["GirisFiyati", "entry_price", "SignalPrice"],
            Field::StopLoss => &["StopLoss", "stop_loss"],
            Field::TakeProfit => &["TakeProfit", "take_profit"],
            Field::CurrentPrice => &["KapanisFiyati", "current_price", "CurrentPrice"],
            Field::Rsi => &["RSI", "rsi"],
            Field::Macd => &["MACD", "macd"],
            Field::Ema => &["EMA", "ema"],
            Field::Stoch => &["STOACH", "stoch"],
            Field::Status => &["Durum", "Status", "durum"],
            Field::ListType => &["ListType"],
            Field::Profit => &["KarZarar", "profit", "PLRatio"],
            Field::ProfitPercent => &["KarZararYuzde", "profit_percentage"],
            Field::ClosedAt => &["KapanisZamani", "closed_at", "close_time"],
            Field::Comment => &["Yorum", "Aciklama", "comment"],
        }
    }

    /// How values of this field are rendered
    pub fn kind(self) -> FieldKind {
        match self {
            Field::Volume | Field::Rsi | Field::ProfitPercent => FieldKind::Number(DEFAULT_DECIMALS),
            Field::EntryPrice
            | Field::StopLoss
            | Field::TakeProfit
            | Field::CurrentPrice
            | Field::Profit => FieldKind::Number(PRICE_DECIMALS),
            Field::OpenedAt | Field::ClosedAt => FieldKind::Timestamp,
            Field::Id
            | Field::Symbol
            | Field::Side
            | Field::Macd
            | Field::Ema
            | Field::Stoch
            | Field::Status
            | Field::ListType
            | Field::Comment => FieldKind::Text,
        }
    }

    /// Short column heading
    pub fn label(self) -> &'static str {
        match self {
            Field::Id => "ID",
            Field::OpenedAt => "Tarih/Saat",
            Field::Symbol => "Sembol",
            Field::Side => "Tip",
            Field::Volume => "Lot",
            Field::EntryPrice => "Giriş",
            Field::StopLoss => "SL",
            Field::TakeProfit => "TP",
            Field::CurrentPrice => "Fiyat",
            Field::Rsi => "RSI",
            Field::Macd => "MACD",
            Field::Ema => "EMA",
            Field::Stoch => "STOCH",
            Field::Status => "Durum",
            Field::ListType => "Liste",
            Field::Profit => "K/Z",
            Field::ProfitPercent => "K/Z %",
            Field::ClosedAt => "Kapanış",
            Field::Comment => "Yorum",
        }
    }
}

/// Returns the first present, non-null value among the field's aliases
pub fn resolve(map: &Map<String, Value>, field: Field) -> Option<&Value> {
    field
        .aliases()
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !value.is_null())
}

/// Whether `key` is an alias of any field
pub fn is_known_key(key: &str) -> bool {
    Field::ALL.iter().any(|field| field.aliases().contains(&key))
}
