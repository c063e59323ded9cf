//! Epoch-millisecond time helpers.

use chrono::Utc;

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert whole minutes to milliseconds.
pub fn minutes_to_ms(minutes: u32) -> i64 {
    minutes as i64 * 60_000
}
