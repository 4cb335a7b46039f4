//! Elapsed-time buckets and phrase rendering
//!
//! An instant is rendered according to how long ago it happened: a "now"
//! word under a minute, rounded minute and hour counts up to a day, a
//! month-and-day form up to a year, and month-and-day plus the year beyond
//! that. Future instants produce a negative elapsed value, fall through
//! every bucket, and land in the year form as well.

use chrono::{DateTime, Datelike, FixedOffset, Utc};

use crate::locale::{HOURS_TEMPLATE, Locale, MINUTES_TEMPLATE};

/// One minute, in seconds.
pub const MINUTE: i64 = 60;
/// One hour, in seconds.
pub const HOUR: i64 = 60 * MINUTE;
/// One day, in seconds.
pub const DAY: i64 = 24 * HOUR;
/// One 365-day year, in seconds.
pub const YEAR: i64 = 365 * DAY;

/// Whole seconds elapsed from `instant` to `now`, floored.
///
/// Flooring happens on milliseconds, so an instant half a second in the
/// future is already elapsed `-1`, never `0`.
pub fn elapsed_between(now: DateTime<Utc>, instant: DateTime<Utc>) -> i64 {
    (now - instant).num_milliseconds().div_euclid(1000)
}

/// Render the phrase for an instant given its elapsed seconds.
///
/// `offset` is the reader's UTC offset; calendar forms use the local month,
/// day and year of the instant.
pub fn phrase(locale: Locale, instant: DateTime<Utc>, elapsed: i64, offset: FixedOffset) -> String {
    if (0..MINUTE).contains(&elapsed) {
        return locale.entry().now.to_string();
    }
    if (MINUTE..HOUR).contains(&elapsed) {
        return counted(MINUTES_TEMPLATE, elapsed, MINUTE);
    }
    if (HOUR..DAY).contains(&elapsed) {
        return counted(HOURS_TEMPLATE, elapsed, HOUR);
    }

    let local = instant.with_timezone(&offset);
    let month_day = month_day(locale, &local);
    if (DAY..YEAR).contains(&elapsed) {
        return month_day;
    }
    format!("{} {}", month_day, local.year())
}

/// Fill a `%d` template with `elapsed / unit`, rounded to the nearest whole
/// count. A value just under the next bucket rounds up, so 3599 seconds
/// reads "60 min" rather than "59 min".
fn counted(template: &str, elapsed: i64, unit: i64) -> String {
    let count = (elapsed as f64 / unit as f64).round() as i64;
    template.replace("%d", &count.to_string())
}

/// The month template for the instant's local month, filled with its day.
fn month_day(locale: Locale, local: &DateTime<FixedOffset>) -> String {
    let months = &locale.entry().months;
    months[local.month0() as usize].replace("%d", &local.day().to_string())
}
