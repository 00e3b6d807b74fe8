//! Cost field normalization.
//!
//! Applicants type costs by hand (`5,000円/年`, `１２０００`, `不明`). Normalization folds
//! full-width digits, drops a trailing `/period` suffix, currency symbols, thousands separators
//! and whitespace, then parses what is left as a non-negative integer.

use std::fmt;

const CURRENCY_SYMBOLS: &[char] = &['円', '¥', '￥', '$', '＄'];
const THOUSANDS_SEPARATORS: &[char] = &[',', '，', '、'];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CostError {
    /// Nothing left after normalization (empty cell, only a currency symbol, ...).
    Empty,
    /// Residue that is not a non-negative integer, e.g. `不明` or `1.5`.
    NotANumber(String),
}

impl fmt::Display for CostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostError::Empty => write!(f, "cost is empty"),
            CostError::NotANumber(raw) => write!(f, "cost is not a number: {raw}"),
        }
    }
}

impl std::error::Error for CostError {}

/// Strip decoration from a cost string without parsing it.
pub fn normalize_cost(raw: &str) -> String {
    let folded: String = raw.chars().map(fold_full_width).collect();

    // `5000円/年` -> `5000円`
    let amount = match folded.find('/') {
        Some(idx) => &folded[..idx],
        None => folded.as_str(),
    };

    amount
        .chars()
        .filter(|c| !c.is_whitespace())
        .filter(|c| !CURRENCY_SYMBOLS.contains(c))
        .filter(|c| !THOUSANDS_SEPARATORS.contains(c))
        .collect()
}

/// Normalize and parse a cost string.
pub fn parse_cost(raw: &str) -> Result<u64, CostError> {
    let normalized = normalize_cost(raw);
    if normalized.is_empty() {
        return Err(CostError::Empty);
    }
    if !normalized.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CostError::NotANumber(raw.trim().to_string()));
    }
    normalized
        .parse::<u64>()
        .map_err(|_| CostError::NotANumber(raw.trim().to_string()))
}

fn fold_full_width(c: char) -> char {
    match c {
        '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
        '／' => '/',
        _ => c,
    }
}
