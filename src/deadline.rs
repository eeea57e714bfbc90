use chrono::{Duration, NaiveDate};
use lazy_regex::regex;

use crate::utils;

/// Label the listing shows on the last day of a contest.
pub const SAME_DAY_MARKER: &str = "오늘마감";

/// Resolve a deadline label against the local current date.
pub fn normalize(text: &str) -> Option<NaiveDate> {
    normalize_at(text, utils::get_today())
}

/// Resolve a deadline label such as `D-14` or `오늘마감` relative to `today`.
///
/// Anything unrecognised, including counters too large to represent, yields
/// `None` rather than an error.
pub fn normalize_at(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    if let Some(caps) = regex!(r"D-(\d+)").captures(text) {
        let days = caps[1].parse::<u32>().ok()?;
        return today.checked_add_signed(Duration::days(i64::from(days)));
    }

    if is_same_day(text) {
        return Some(today);
    }

    None
}

pub(crate) fn looks_like_deadline(text: &str) -> bool {
    text.contains("D-") || text.contains(SAME_DAY_MARKER)
}

fn is_same_day(text: &str) -> bool {
    text.contains(SAME_DAY_MARKER) || regex!(r"(?i)D-day").is_match(text)
}
