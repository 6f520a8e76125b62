use std::time::Duration;

use chrono::{NaiveTime, Timelike};

const DAY_SECS: u64 = 24 * 60 * 60;

/// The wall-clock minute after `now`, rolling over the hour and midnight.
pub fn next_minute(hour: u32, minute: u32) -> (u32, u32) {
    let minute = minute + 1;
    if minute >= 60 {
        ((hour + 1) % 24, 0)
    } else {
        (hour, minute)
    }
}

/// How long to sleep so the send routine, which itself waits `lead` for the
/// page to load, lands on `target`. Zero when the moment has passed.
pub fn delay_until(now: NaiveTime, target: (u32, u32), lead: Duration) -> Duration {
    let now_secs = u64::from(now.num_seconds_from_midnight());
    let mut target_secs = u64::from(target.0) * 3600 + u64::from(target.1) * 60;
    if target_secs < now_secs {
        target_secs += DAY_SECS;
    }
    Duration::from_secs(target_secs - now_secs).saturating_sub(lead)
}

pub fn format_hm((hour, minute): (u32, u32)) -> String {
    format!("{hour:02}:{minute:02}")
}
