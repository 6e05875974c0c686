//! Wall-clock values for a city, given its UTC offset in seconds.
//!
//! The provider reports a fixed offset rather than a zone name, so every
//! local value here is plain UTC arithmetic: shift the instant by the offset
//! and read the naive fields.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

const CLOCK_FORMAT: &str = "%I:%M %p";

/// Local date and time at `epoch` for a city `offset_seconds` east of UTC.
pub fn local_datetime(epoch: i64, offset_seconds: i32) -> NaiveDateTime {
    let utc = DateTime::from_timestamp(epoch, 0).unwrap_or_default();
    shift(utc, offset_seconds)
}

pub fn local_date(epoch: i64, offset_seconds: i32) -> NaiveDate {
    local_datetime(epoch, offset_seconds).date()
}

/// Time of day at `now` in the city, e.g. `03:05 PM`.
pub fn city_time(now: DateTime<Utc>, offset_seconds: i32) -> String {
    shift(now, offset_seconds).format(CLOCK_FORMAT).to_string()
}

/// The city's current time of day. Reads the system clock on every call.
pub fn current_city_time(offset_seconds: i32) -> String {
    city_time(Utc::now(), offset_seconds)
}

pub fn clock_label(epoch: i64, offset_seconds: i32) -> String {
    local_datetime(epoch, offset_seconds)
        .format(CLOCK_FORMAT)
        .to_string()
}

/// e.g. `Sat Oct 17 2026`
pub fn date_label(epoch: i64, offset_seconds: i32) -> String {
    local_datetime(epoch, offset_seconds)
        .format("%a %b %d %Y")
        .to_string()
}

pub fn weekday_label(epoch: i64, offset_seconds: i32) -> String {
    local_datetime(epoch, offset_seconds).format("%a").to_string()
}

fn shift(utc: DateTime<Utc>, offset_seconds: i32) -> NaiveDateTime {
    utc.naive_utc() + Duration::seconds(i64::from(offset_seconds))
}
