//! pt-BR date rendering used across exports.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};

/// `dd/mm/aaaa`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `dd/mm/aaaa, HH:MM:SS` in the timestamp's own offset.
pub fn format_datetime(instant: &DateTime<FixedOffset>) -> String {
    instant.format("%d/%m/%Y, %H:%M:%S").to_string()
}

/// Calendar date of a UTC instant as seen from `offset`.
pub fn format_instant_date(instant: DateTime<Utc>, offset: &FixedOffset) -> String {
    format_date(offset.from_utc_datetime(&instant.naive_utc()).date_naive())
}

/// Parse `+HH:MM`, `-HH:MM`, `+HHMM` or `Z`.
pub fn parse_utc_offset(text: &str) -> Option<FixedOffset> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("z") || text.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }
    let (sign, rest) = match text.as_bytes().first()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
