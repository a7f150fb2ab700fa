//! Repair of mis-encoded Turkish text
//!
//! The upstream feed is sometimes produced by tools that read UTF-8 bytes as
//! Windows-1252 (or Latin-1), turning `ş` into `ÅŸ` and so on. Repair is a plain
//! substitution over a fixed table, so it is safe to apply more than once.

use serde_json::Value;

/// Mis-encoded sequence and the character it should have been.
///
/// Both the Windows-1252 and the Latin-1 (C1 control) readings of each second
/// byte are listed.
const REPAIRS: &[(&str, &str)] = &[
    ("Ã§", "ç"),
    ("Ã‡", "Ç"),
    ("Ã\u{87}", "Ç"),
    ("Ã¶", "ö"),
    ("Ã–", "Ö"),
    ("Ã\u{96}", "Ö"),
    ("Ã¼", "ü"),
    ("Ãœ", "Ü"),
    ("Ã\u{9c}", "Ü"),
    ("ÄŸ", "ğ"),
    ("Ä\u{9f}", "ğ"),
    ("Äž", "Ğ"),
    ("Ä\u{9e}", "Ğ"),
    ("Ä±", "ı"),
    ("Ä°", "İ"),
    ("ÅŸ", "ş"),
    ("Å\u{9f}", "ş"),
    ("Åž", "Ş"),
    ("Å\u{9e}", "Ş"),
];

/// Lead characters every mis-encoded sequence starts with
const LEADS: [char; 3] = ['Ã', 'Ä', 'Å'];

/// Replaces known mis-encoded sequences with the intended Turkish letters.
///
/// Replacements never produce a lead character, so `repair(repair(s)) == repair(s)`.
pub fn repair(text: &str) -> String {
    if !text.contains(LEADS) {
        return text.to_string();
    }

    let mut repaired = text.to_string();
    for (broken, fixed) in REPAIRS {
        if repaired.contains(broken) {
            repaired = repaired.replace(broken, fixed);
        }
    }
    repaired
}

/// Repairs every string inside a JSON value, descending into arrays and objects.
///
/// Object keys are left untouched.
pub fn repair_value(value: &mut Value) {
    match value {
        Value::String(s) => {
            if s.contains(LEADS) {
                *s = repair(s);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(repair_value),
        Value::Object(map) => map.values_mut().for_each(repair_value),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}
