//! Timestamp helpers for persisted shapes.
//!
//! Instants are persisted as `INTEGER` Unix epoch milliseconds (UTC) and
//! spans as signed millisecond counts.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

/// Convert a `DateTime<Utc>` to Unix epoch milliseconds.
#[inline]
pub fn datetime_to_ms(dt: DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}

/// Convert Unix epoch milliseconds to `DateTime<Utc>`.
///
/// Values outside chrono's supported range clamp to the nearest
/// representable timestamp, so conversion is a pure function of `ms`.
#[inline]
pub fn ms_to_datetime(ms: i64) -> DateTime<Utc> {
    match Utc.timestamp_millis_opt(ms) {
        chrono::LocalResult::Single(dt) => dt,
        chrono::LocalResult::Ambiguous(dt, _) => dt,
        chrono::LocalResult::None => {
            if ms.is_negative() {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            }
        }
    }
}

/// Convert a span to signed milliseconds.
#[inline]
pub fn timedelta_to_ms(td: TimeDelta) -> i64 {
    td.num_milliseconds()
}

/// Convert signed milliseconds to a span.
#[inline]
pub fn ms_to_timedelta(ms: i64) -> TimeDelta {
    TimeDelta::milliseconds(ms)
}
