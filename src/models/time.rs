//! Time helpers and the display-day window.
//!
//! The guide works in UTC epoch milliseconds throughout. Only the display
//! day (which slice of absolute time a selected date covers) is
//! timezone-aware, because "the day" starts and ends at local wall-clock
//! hours.

use chrono::{LocalResult, NaiveDate, TimeZone};
use chrono_tz::Tz;

use crate::config::GuideConfig;

pub const MINUTE_IN_MILLIS: i64 = 60 * 1000;
pub const HOUR_IN_MILLIS: i64 = 60 * MINUTE_IN_MILLIS;
pub const HALF_HOUR_IN_MILLIS: i64 = HOUR_IN_MILLIS / 2;
pub const DAY_IN_MILLIS: i64 = 24 * HOUR_IN_MILLIS;

/// Floors time to the given unit. For example, if time is 5:32:11 and unit is
/// one hour, the output is 5:00:00.
pub fn floor_time(time_ms: i64, unit_ms: i64) -> i64 {
    time_ms - time_ms % unit_ms
}

/// The absolute time slice a selected date covers in the guide.
///
/// A display day does not coincide with the calendar day: it runs from a
/// configured early-morning hour to a configured hour on the following day,
/// so late-night programming stays attached to the evening it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineWindow {
    pub starts_at_millis: i64,
    pub ends_at_millis: i64,
}

impl TimelineWindow {
    /// Compute the display-day window for `date` in `tz`.
    ///
    /// The window starts at `config.day_starts_at_hour` local time on `date`
    /// and ends at `config.day_ends_next_day_at_hour` local time on the
    /// following day.
    pub fn for_date(date: NaiveDate, tz: Tz, config: &GuideConfig) -> TimelineWindow {
        let starts_at_millis = local_millis(date, config.day_starts_at_hour, tz);
        let next_day = date.succ_opt().unwrap_or(date);
        let ends_at_millis = local_millis(next_day, config.day_ends_next_day_at_hour, tz);
        TimelineWindow {
            starts_at_millis,
            ends_at_millis,
        }
    }

    pub fn duration_millis(&self) -> i64 {
        self.ends_at_millis - self.starts_at_millis
    }

    pub fn contains(&self, time_ms: i64) -> bool {
        self.starts_at_millis <= time_ms && time_ms < self.ends_at_millis
    }
}

/// Resolve a local wall-clock hour on `date` to epoch milliseconds.
///
/// Ambiguous local times (DST fall-back) resolve to the earliest instant.
/// Nonexistent local times (DST spring-forward) walk forward in one-hour
/// steps until a valid instant is found.
pub(crate) fn local_millis(date: NaiveDate, hour: u32, tz: Tz) -> i64 {
    let mut candidate = hour;
    loop {
        let naive = match date.and_hms_opt(candidate, 0, 0) {
            Some(naive) => naive,
            None => {
                log::warn!("Invalid local hour {} on {}, falling back to midnight", candidate, date);
                return tz
                    .from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default())
                    .timestamp_millis();
            }
        };
        match tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => return dt.timestamp_millis(),
            LocalResult::Ambiguous(earliest, _) => {
                log::warn!("Ambiguous local time {} in {}, using earliest instant", naive, tz);
                return earliest.timestamp_millis();
            }
            LocalResult::None => {
                log::warn!("Nonexistent local time {} in {}, trying the next hour", naive, tz);
                candidate += 1;
            }
        }
    }
}
