//! Shared primitive types used across the engine.

use chrono::{DateTime, Duration, Utc};

/// Every instant the engine reasons about. Always UTC.
pub type Timestamp = DateTime<Utc>;

/// A stable, unique identifier for a ticket.
pub type TicketId = String;

pub const MS_PER_MINUTE: i64 = 60_000;
pub const MS_PER_HOUR: f64 = 3_600_000.0;

/// Fractional hours as whole milliseconds (`hours × 60 × 60 × 1000`).
pub fn hours_to_millis(hours: f64) -> i64 {
    // `as` saturates on overflow and maps NaN to 0.
    (hours * MS_PER_HOUR).round() as i64
}

/// `ts + hours`, saturating at the representable range instead of panicking.
pub fn add_hours(ts: Timestamp, hours: f64) -> Timestamp {
    let millis = hours_to_millis(hours);
    Duration::try_milliseconds(millis)
        .and_then(|d| ts.checked_add_signed(d))
        .unwrap_or(if millis < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}

/// Signed milliseconds from `from` to `to`.
pub fn millis_between(from: Timestamp, to: Timestamp) -> i64 {
    to.signed_duration_since(from).num_milliseconds()
}
