//! Transaction deadlines
//!
//! Entry functions take an absolute deadline in unix seconds.

use chrono::Utc;

/// Current unix time in seconds
pub fn unix_now() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// Deadline `minutes` from now, in unix seconds
pub fn minutes_to_deadline(minutes: u64) -> u64 {
    deadline_from(unix_now(), minutes)
}

/// Deadline `minutes` after `now_secs`
pub fn deadline_from(now_secs: u64, minutes: u64) -> u64 {
    now_secs.saturating_add(minutes.saturating_mul(60))
}
