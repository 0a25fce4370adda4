use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
    Green,
    Orange,
    Grey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostingAge {
    pub text: String,
    pub color: Freshness,
}

impl PostingAge {
    fn new(text: impl Into<String>, color: Freshness) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d %b %Y", "%B %d, %Y", "%d-%m-%Y"];
const DATETIME_FORMATS: [&str; 1] = ["%Y-%m-%dT%H:%M:%S"];

static DAYS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\+?\s*day").expect("valid regex"));
static WEEKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\+?\s*week").expect("valid regex"));
static MONTHS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\+?\s*month").expect("valid regex"));

/// Drop a trailing timezone designator ("+02:00", "Z") before parsing.
fn strip_offset(raw: &str) -> &str {
    let raw = raw.split('+').next().unwrap_or(raw);
    raw.split('Z').next().unwrap_or(raw).trim()
}

fn parse_absolute(raw: &str) -> Option<NaiveDateTime> {
    let cleaned = strip_offset(raw);
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(cleaned, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(cleaned, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn capture_number(re: &Regex, text: &str) -> Option<i64> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

fn from_days(days: i64) -> PostingAge {
    match days.max(0) {
        0 => PostingAge::new("Just posted", Freshness::Green),
        1 => PostingAge::new("1 day ago", Freshness::Green),
        d @ 2..=3 => PostingAge::new(format!("{d} days ago"), Freshness::Green),
        d @ 4..=7 => PostingAge::new(format!("{d} days ago"), Freshness::Orange),
        8..=14 => PostingAge::new("2 weeks ago", Freshness::Grey),
        15..=21 => PostingAge::new("3 weeks ago", Freshness::Grey),
        _ => PostingAge::new("Older", Freshness::Grey),
    }
}

fn from_weeks(weeks: i64) -> PostingAge {
    match weeks {
        i64::MIN..=1 => PostingAge::new("1 week ago", Freshness::Orange),
        2 => PostingAge::new("2 weeks ago", Freshness::Grey),
        3 => PostingAge::new("3 weeks ago", Freshness::Grey),
        _ => PostingAge::new("Older", Freshness::Grey),
    }
}

/// Read phrases like "Just posted", "Yesterday" or "Posted 3 days ago".
fn parse_relative(raw: &str) -> Option<PostingAge> {
    let lower = raw.trim().to_lowercase();
    if lower.contains("just") || lower.contains("today") || lower.contains("now") {
        return Some(from_days(0));
    }
    if lower.contains("yesterday") {
        return Some(from_days(1));
    }
    if let Some(days) = capture_number(&DAYS, &lower) {
        return Some(from_days(days));
    }
    if let Some(weeks) = capture_number(&WEEKS, &lower) {
        return Some(from_weeks(weeks));
    }
    if MONTHS.is_match(&lower) {
        return Some(PostingAge::new("Older", Freshness::Grey));
    }
    None
}

/// Freshness label for a scraped "posted" value, relative to `now`.
pub fn estimate_at(date_posted: Option<&str>, now: DateTime<Utc>) -> PostingAge {
    let Some(raw) = date_posted.filter(|d| !d.trim().is_empty()) else {
        return PostingAge::new("", Freshness::Grey);
    };

    if let Some(posted) = parse_absolute(raw) {
        let days = (now.naive_utc() - posted).num_days();
        return from_days(days);
    }

    parse_relative(raw).unwrap_or_else(|| PostingAge::new(raw, Freshness::Grey))
}

pub fn estimate(date_posted: Option<&str>) -> PostingAge {
    estimate_at(date_posted, Utc::now())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn age(raw: &str) -> PostingAge {
        estimate_at(Some(raw), now())
    }

    #[test]
    fn absent_date_is_empty_grey() {
        assert_eq!(estimate(None), PostingAge::new("", Freshness::Grey));
    }

    #[test]
    fn iso_date_five_days_old_is_orange() {
        let posted = (now() - Duration::days(5)).format("%Y-%m-%d").to_string();
        assert_eq!(age(&posted), PostingAge::new("5 days ago", Freshness::Orange));
    }

    #[test]
    fn iso_datetime_with_offset() {
        assert_eq!(
            age("2024-06-14T08:00:00+02:00"),
            PostingAge::new("1 day ago", Freshness::Green)
        );
        assert_eq!(
            age("2024-06-13T08:00:00Z"),
            PostingAge::new("2 days ago", Freshness::Green)
        );
    }

    #[test]
    fn other_absolute_formats() {
        assert_eq!(age("12 Jun 2024"), PostingAge::new("3 days ago", Freshness::Green));
        assert_eq!(age("June 1, 2024"), PostingAge::new("2 weeks ago", Freshness::Grey));
        assert_eq!(age("01-05-2024"), PostingAge::new("Older", Freshness::Grey));
    }

    #[test]
    fn future_dates_count_as_just_posted() {
        assert_eq!(age("2024-07-01"), PostingAge::new("Just posted", Freshness::Green));
    }

    #[test]
    fn relative_phrases() {
        assert_eq!(age("Just posted"), PostingAge::new("Just posted", Freshness::Green));
        assert_eq!(age("Today"), PostingAge::new("Just posted", Freshness::Green));
        assert_eq!(age("Yesterday"), PostingAge::new("1 day ago", Freshness::Green));
        assert_eq!(age("Posted 3 days ago"), PostingAge::new("3 days ago", Freshness::Green));
        assert_eq!(age("Posted 6 days ago"), PostingAge::new("6 days ago", Freshness::Orange));
        assert_eq!(age("30+ days ago"), PostingAge::new("Older", Freshness::Grey));
        assert_eq!(age("1 week ago"), PostingAge::new("1 week ago", Freshness::Orange));
        assert_eq!(age("3 weeks ago"), PostingAge::new("3 weeks ago", Freshness::Grey));
        assert_eq!(age("2+ weeks ago"), PostingAge::new("2 weeks ago", Freshness::Grey));
        assert_eq!(age("2 months ago"), PostingAge::new("Older", Freshness::Grey));
    }

    #[test]
    fn day_buckets() {
        assert_eq!(from_days(-2).text, "Just posted");
        assert_eq!(from_days(7), PostingAge::new("7 days ago", Freshness::Orange));
        assert_eq!(from_days(8), PostingAge::new("2 weeks ago", Freshness::Grey));
        assert_eq!(from_days(21), PostingAge::new("3 weeks ago", Freshness::Grey));
        assert_eq!(from_days(22), PostingAge::new("Older", Freshness::Grey));
    }

    #[test]
    fn unknown_text_is_returned_verbatim() {
        assert_eq!(age("Recently"), PostingAge::new("Recently", Freshness::Grey));
    }
}
