//! # Amount Parsing
//!
//! Parsing of quantity and money amounts typed by users or arriving in CSV
//! cells. Accepts plain decimals, European comma decimals ("1,5"), simple
//! fractions ("1/2"), mixed numbers ("1 1/2"), and currency-prefixed values
//! ("$4.20"). Anything else coerces to zero rather than failing; a cell the
//! app cannot read shows up as a $0.00 cost, never an error.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Mixed number: whole part plus a fraction ("1 1/2", "2 3/4")
    static ref MIXED_NUMBER_RE: Regex =
        Regex::new(r"^(\d+)\s+(\d+)\s*/\s*(\d+)$").expect("mixed number pattern is valid");

    /// Bare fraction ("1/2", "3/4")
    static ref FRACTION_RE: Regex =
        Regex::new(r"^(\d+)\s*/\s*(\d+)$").expect("fraction pattern is valid");
}

/// Parse a user-supplied amount, returning `None` when unreadable.
pub fn parse_amount(text: &str) -> Option<f64> {
    let cleaned = text
        .trim()
        .trim_start_matches(['$', '€', '£'])
        .trim()
        .to_string();

    if cleaned.is_empty() {
        return None;
    }

    if let Some(caps) = MIXED_NUMBER_RE.captures(&cleaned) {
        let whole: f64 = caps[1].parse().ok()?;
        let numerator: f64 = caps[2].parse().ok()?;
        let denominator: f64 = caps[3].parse().ok()?;
        if denominator == 0.0 {
            return None;
        }
        return Some(whole + numerator / denominator);
    }

    if let Some(caps) = FRACTION_RE.captures(&cleaned) {
        let numerator: f64 = caps[1].parse().ok()?;
        let denominator: f64 = caps[2].parse().ok()?;
        if denominator == 0.0 {
            return None;
        }
        return Some(numerator / denominator);
    }

    // Plain numbers, with comma accepted as the decimal separator
    cleaned.replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an amount, treating missing or unreadable input as zero.
///
/// This is the coercion rule the whole app follows: a malformed numeric
/// field is silently worth nothing.
pub fn coerce_amount(text: &str) -> f64 {
    parse_amount(text).unwrap_or(0.0)
}
