//! Order status classification, summary statistics and filtering

use super::{Field, OrderRecord};

/// Lifecycle state read from an order's status text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Open,
    Closed,
    Other,
}

/// Status words after [`fold_status`]
const OPEN_WORDS: &[&str] = &["acik", "open", "aktif", "active"];
const CLOSED_WORDS: &[&str] = &["kapali", "closed", "kapandi"];

/// Lower-cases status text and folds Turkish letters to ASCII.
///
/// Dotted and dotless I both fold to `i`, so "AÇIK", "Açık" and "acik" compare
/// equal regardless of which casing rules produced them.
fn fold_status(status: &str) -> String {
    status
        .trim()
        .chars()
        .map(|c| match c {
            'İ' | 'I' | 'ı' => 'i',
            'Ç' | 'ç' => 'c',
            'Ş' | 'ş' => 's',
            'Ğ' | 'ğ' => 'g',
            'Ö' | 'ö' => 'o',
            'Ü' | 'ü' => 'u',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

impl OrderStatus {
    /// Classifies status text, ignoring case, Turkish diacritics and surrounding whitespace
    pub fn classify(status: &str) -> Self {
        let normalized = fold_status(status);
        if OPEN_WORDS.contains(&normalized.as_str()) {
            OrderStatus::Open
        } else if CLOSED_WORDS.contains(&normalized.as_str()) {
            OrderStatus::Closed
        } else {
            OrderStatus::Other
        }
    }
}

/// Colour hint for a status cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Positive,
    Negative,
    Neutral,
}

impl StatusTone {
    /// Buy signals and open orders are positive, sell signals and closed orders negative
    ///
    /// Signal markers are upper-case in the feed and matched case-sensitively.
    pub fn of(status: &str) -> Self {
        match OrderStatus::classify(status) {
            OrderStatus::Open => StatusTone::Positive,
            OrderStatus::Closed => StatusTone::Negative,
            OrderStatus::Other if status.contains("SAT") || status.contains("SELL") => {
                StatusTone::Negative
            }
            OrderStatus::Other if status.contains("AL") || status.contains("BUY") => {
                StatusTone::Positive
            }
            OrderStatus::Other => StatusTone::Neutral,
        }
    }
}

/// Summary shown above the order table
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrderStats {
    pub total: usize,
    pub open: usize,
    pub closed: usize,
    pub total_profit: f64,
}

impl OrderStats {
    /// Computes the summary; unparseable profits count as zero
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a OrderRecord>) -> Self {
        records.into_iter().fold(OrderStats::default(), |mut stats, record| {
            stats.total += 1;
            match record.status() {
                OrderStatus::Open => stats.open += 1,
                OrderStatus::Closed => stats.closed += 1,
                OrderStatus::Other => {}
            }
            stats.total_profit += record.number_or_zero(Field::Profit);
            stats
        })
    }
}

/// Which statuses to show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Open,
    Closed,
}

impl StatusFilter {
    /// Parses a filter name (`all`, `open`, `closed`)
    pub fn from_str(s: &str) -> Option<Self> {
        match fold_status(s).as_str() {
            "all" | "hepsi" => Some(StatusFilter::All),
            "open" | "acik" => Some(StatusFilter::Open),
            "closed" | "kapali" => Some(StatusFilter::Closed),
            _ => None,
        }
    }

    /// The next filter in the All → Open → Closed cycle
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Open,
            StatusFilter::Open => StatusFilter::Closed,
            StatusFilter::Closed => StatusFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Open => "open",
            StatusFilter::Closed => "closed",
        }
    }

    fn matches(self, status: OrderStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Open => status == OrderStatus::Open,
            StatusFilter::Closed => status == OrderStatus::Closed,
        }
    }
}

/// Status and symbol filter applied before display
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: StatusFilter,
    /// Case-insensitive substring of the symbol
    pub symbol: Option<String>,
}

impl OrderFilter {
    /// Whether a record passes the filter
    pub fn matches(&self, record: &OrderRecord) -> bool {
        if !self.status.matches(record.status()) {
            return false;
        }
        match &self.symbol {
            Some(query) if !query.is_empty() => record
                .text(Field::Symbol)
                .to_lowercase()
                .contains(&query.to_lowercase()),
            _ => true,
        }
    }

    /// Records passing the filter with their original positions, in source order
    pub fn apply<'a>(&self, records: &'a [OrderRecord]) -> Vec<(usize, &'a OrderRecord)> {
        records
            .iter()
            .enumerate()
            .filter(|(_, record)| self.matches(record))
            .collect()
    }
}
