//! Calendar scan: which events are due at a given wall-clock instant.
//!
//! The embedding calls [`due_events`] (via `Session::tick`) at minute
//! granularity; the session remembers what it already fired so each event
//! notifies once.

use std::collections::BTreeMap;

use lumen_profile::CalendarEvent;
use lumen_types::clock::TimestampMs;

/// Convert days since the Unix epoch to (year, month, day).
fn days_to_ymd(mut days: u64) -> (u16, u8, u8) {
    let mut year = 1970u16;
    loop {
        let year_days = if is_leap(year) { 366 } else { 365 };
        if days < year_days {
            break;
        }
        days -= year_days;
        year += 1;
    }
    let leap = is_leap(year);
    let month_days: [u64; 12] = [
        31,
        if leap { 29 } else { 28 },
        31,
        30,
        31,
        30,
        31,
        31,
        30,
        31,
        30,
        31,
    ];
    let mut month = 0u8;
    for (i, &md) in month_days.iter().enumerate() {
        if days < md {
            month = (i + 1) as u8;
            break;
        }
        days -= md;
    }
    if month == 0 {
        month = 12;
    }
    (year, month, (days + 1) as u8)
}

fn is_leap(y: u16) -> bool {
    (y.is_multiple_of(4) && !y.is_multiple_of(100)) || y.is_multiple_of(400)
}

/// `YYYY-MM-DD` for a timestamp (UTC).
pub fn date_string(now_ms: TimestampMs) -> String {
    let (year, month, day) = days_to_ymd(now_ms / 86_400_000);
    format!("{year:04}-{month:02}-{day:02}")
}

/// `HH:MM` for a timestamp (UTC).
pub fn time_string(now_ms: TimestampMs) -> String {
    let secs_of_day = (now_ms / 1_000) % 86_400;
    format!("{:02}:{:02}", secs_of_day / 3_600, (secs_of_day % 3_600) / 60)
}

/// Events due at `now`: today's all-day events plus timed events whose
/// start is not in the future. Zero-padded `HH:MM` strings compare
/// lexicographically in time order.
pub fn due_events(
    events: &BTreeMap<String, Vec<CalendarEvent>>,
    now_ms: TimestampMs,
) -> Vec<&CalendarEvent> {
    let today = date_string(now_ms);
    let now_time = time_string(now_ms);
    events
        .get(&today)
        .map(|todays| {
            todays
                .iter()
                .filter(|event| match &event.time {
                    Some(start) => start.as_str() <= now_time.as_str(),
                    None => true,
                })
                .collect()
        })
        .unwrap_or_default()
}
