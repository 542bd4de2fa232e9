use chrono::{Local, TimeZone};

use super::types::{UNKNOWN_DATE, UNKNOWN_SENDER};

/// Maximum bytes in a message's joined tag string.
pub const TAGS_CAPACITY: usize = 255;

/// Display name from a raw From header.
///
/// `"John Doe" <j@x.com>` becomes `John Doe`. A header with nothing before
/// the address (`<j@x.com>`) is returned unchanged.
pub fn normalize_sender(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return UNKNOWN_SENDER.to_string();
    };

    let start = raw.trim_start_matches('"');
    let candidate = match start.find('<') {
        Some(end) => &start[..end],
        None => start,
    };
    let name = candidate.trim_end_matches([' ', '"']);

    if name.is_empty() {
        raw.to_string()
    } else {
        name.to_string()
    }
}

/// Local month and day of a Unix timestamp, e.g. "Jan 05".
pub fn format_date(timestamp: i64) -> String {
    if timestamp <= 0 {
        return UNKNOWN_DATE.to_string();
    }
    match Local.timestamp_opt(timestamp, 0).single() {
        Some(dt) => dt.format("%b %d").to_string(),
        None => UNKNOWN_DATE.to_string(),
    }
}

/// Space-joined tags, cut off at [`TAGS_CAPACITY`] bytes.
pub fn join_tags<'a>(tags: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for tag in tags.into_iter().filter(|t| !t.is_empty()) {
        if !out.is_empty() && !push_bounded(&mut out, " ") {
            break;
        }
        if !push_bounded(&mut out, tag) {
            break;
        }
    }
    out
}

/// Append as much of `s` as fits; false if anything was cut.
fn push_bounded(out: &mut String, s: &str) -> bool {
    let room = TAGS_CAPACITY.saturating_sub(out.len());
    if s.len() <= room {
        out.push_str(s);
        return true;
    }
    let mut cut = room;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    out.push_str(&s[..cut]);
    false
}
