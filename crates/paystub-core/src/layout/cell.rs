//! Typed cell values and best-effort numeric coercion of OCR tokens.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// A single cell of a reconstructed row.
///
/// Coercion never fails: a token that does not parse as a number stays
/// [`Cell::Text`] with its original content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// Single-character integer token.
    Integer(i64),
    /// Token read as an amount with two implied fraction digits.
    Decimal(Decimal),
    /// Anything else, untouched.
    Text(String),
}

impl Cell {
    /// Coerce a raw token into a cell.
    ///
    /// A one-character token is tried as an integer first. Every other token
    /// is reduced to printable ASCII, stripped of whitespace, `*` and `$`, and
    /// a decimal point is inserted before its last two characters. If the
    /// result is not a number the original token is kept.
    pub fn coerce(raw: &str) -> Self {
        if raw.chars().count() == 1 {
            if let Ok(value) = raw.parse::<i64>() {
                return Cell::Integer(value);
            }
        }

        match parse_implied_cents(raw) {
            Some(value) => Cell::Decimal(value),
            None => Cell::Text(raw.to_string()),
        }
    }

    /// Text content, if this cell was not coerced.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Decimal value, if this cell was coerced to one.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Cell::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Whether this cell is a decimal amount.
    pub fn is_decimal(&self) -> bool {
        matches!(self, Cell::Decimal(_))
    }

    /// Whether this cell is the given label.
    pub fn is_label(&self, label: &str) -> bool {
        self.as_text() == Some(label)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Integer(n) => write!(f, "{}", n),
            Cell::Decimal(d) => write!(f, "{}", d),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

impl From<Decimal> for Cell {
    fn from(value: Decimal) -> Self {
        Cell::Decimal(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// Characters OCR output is allowed to keep before cleaning.
fn is_printable(c: char) -> bool {
    c.is_ascii_graphic() || matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

/// Insert a decimal point two characters from the end of the cleaned token.
///
/// The insertion is purely syntactic: `"23456"` becomes `"234.56"`, while an
/// already formatted `"12.34"` becomes `"12..34"` and is rejected.
fn parse_implied_cents(raw: &str) -> Option<Decimal> {
    let printable: String = raw.chars().filter(|c| is_printable(*c)).collect();
    let cleaned = WHITESPACE
        .replace_all(&printable, "")
        .replace(['*', '$'], "");
    // Decimal parsing accepts `_` separators; amounts never carry them.
    if cleaned.is_empty() || cleaned.contains('_') {
        return None;
    }

    // All remaining characters are ASCII, so byte offsets are char offsets.
    let split = cleaned.len().saturating_sub(2);
    let (whole, fraction) = cleaned.split_at(split);

    let (sign, digits) = match whole.chars().next() {
        Some(c @ ('-' | '+')) => (c.to_string(), &whole[1..]),
        _ => (String::new(), whole),
    };
    let digits = if digits.is_empty() { "0" } else { digits };

    Decimal::from_str(&format!("{}{}.{}", sign, digits, fraction)).ok()
}
