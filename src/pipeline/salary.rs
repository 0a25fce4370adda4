//! Monthly salary extraction from free text.
//!
//! Patterns are tried strictest first. A pattern whose numbers fall outside
//! the plausible range does not stop the search; the next pattern gets a turn.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::models::listing::Salary;
use crate::profile::SalaryBounds;

/// "3000", "3.000", "3,000", "3.500,00".
const NUM: &str = r"(\d[\d.,]*\d|\d+)";

static SALARY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // "€3.000 - €4.000", "EUR 3000 to 4000"
        format!(r"(?i)(?:€|EUR)\s*{NUM}\s*[-–—to]+\s*(?:€|EUR)?\s*{NUM}"),
        // "3000 - 4000 euro", "3.000 - 4.000 per month"
        format!(r"(?i){NUM}\s*[-–—to]+\s*{NUM}\s*(?:euro|eur|per\s+m)"),
        // "€3.000"
        format!(r"(?i)(?:€|EUR)\s*{NUM}"),
        // "salary: 3000"
        r"(?i)salary[:\s]+(\d{3,6})".to_string(),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("salary pattern is valid"))
    .collect()
});

/// Strip thousands separators and parse. "3.000" and "3,000" both give 3000.
fn parse_amount(text: &str) -> Option<i64> {
    let digits: String = text.chars().filter(|c| !matches!(c, '.' | ',')).collect();
    digits.parse().ok()
}

fn within(bounds: SalaryBounds, value: i64) -> bool {
    (bounds.min..=bounds.max).contains(&value)
}

fn from_captures(bounds: SalaryBounds, caps: &Captures<'_>) -> Option<Salary> {
    let raw = caps.get(0)?.as_str().trim().to_string();
    let low = parse_amount(caps.get(1)?.as_str())?;
    let high = match caps.get(2) {
        Some(m) => parse_amount(m.as_str())?,
        None => low,
    };
    if !within(bounds, low) || !within(bounds, high) {
        return None;
    }
    Some(Salary {
        min: i32::try_from(low).ok()?,
        max: i32::try_from(high).ok()?,
        raw,
    })
}

pub fn extract(bounds: SalaryBounds, text: &str) -> Option<Salary> {
    if text.trim().is_empty() {
        return None;
    }
    SALARY_PATTERNS
        .iter()
        .find_map(|pattern| from_captures(bounds, &pattern.captures(text)?))
}
