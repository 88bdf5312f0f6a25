//! Helpers for turning the configured timezone name into local dates.

use time::{Date, Duration, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// Get the current UTC offset for a canonical timezone name, e.g. "Pacific/Auckland".
///
/// Returns `None` if the timezone name is not recognised.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Today's date in `canonical_timezone`.
///
/// Returns `None` if the timezone name is not recognised.
pub fn local_today(canonical_timezone: &str) -> Option<Date> {
    get_local_offset(canonical_timezone)
        .map(|offset| OffsetDateTime::now_utc().to_offset(offset).date())
}

/// The current UTC time without the sub-second part, as stored in `created_at` columns.
pub fn utc_now() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();

    now - Duration::nanoseconds(i64::from(now.nanosecond()))
}
