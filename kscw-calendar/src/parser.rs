use chrono::{NaiveDate, NaiveTime};

/// Parses the date part of a PocketBase date field.
///
/// PocketBase stores `2025-03-01 00:00:00.000Z`; plain `2025-03-01` is
/// accepted as well. Anything else, including an empty field, is `None`.
pub fn parse_date<S: AsRef<str>>(s: S) -> Option<NaiveDate> {
    let s = s.as_ref().trim();
    let day = s.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Parses an `HH:MM` or `HH:MM:SS` time field.
pub fn parse_time<S: AsRef<str>>(s: S) -> Option<NaiveTime> {
    let s = s.as_ref().trim();
    if s.is_empty() {
        return None;
    }

    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

/// `YYYY-MM-DD`, used for synthetic ids and date-set keys.
#[must_use]
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
