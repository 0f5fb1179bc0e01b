//! Timeline presentation queries.
//!
//! Pure derivations the rendering layer needs around the grid itself: where
//! the timeline row starts, where the "now" indicator sits, which part of
//! the day the viewport shows, and where to jump when the user asks for the
//! best programme.

use chrono::{DateTime, Timelike};
use chrono_tz::Tz;

use crate::api::ChannelId;
use crate::config::GuideConfig;
use crate::models::geometry::PixelConverter;
use crate::models::time::{floor_time, local_millis, HALF_HOUR_IN_MILLIS};
use crate::services::manager::GuideManager;

/// Where the rendered timeline row begins.
///
/// The row starts a little before the managed range, floored to a half-hour
/// boundary, so the first label is a round time and the first entry is never
/// clipped down to an unfocusable sliver.
pub fn timeline_start(manager_start_millis: i64, config: &GuideConfig) -> i64 {
    floor_time(
        manager_start_millis - config.entry_min_duration_ms,
        HALF_HOUR_IN_MILLIS,
    )
}

/// Pixel distance between the timeline-row start and the managed range
/// start.
pub fn timeline_adjustment_px(
    timeline_start_millis: i64,
    manager_start_millis: i64,
    converter: &PixelConverter,
) -> i32 {
    converter.millis_to_pixel(manager_start_millis - timeline_start_millis)
}

/// Horizontal scroll offset of the grid for the current viewport position.
pub fn scroll_offset_px<T>(manager: &GuideManager<T>, converter: &PixelConverter) -> i32 {
    converter.millis_to_pixel(manager.shifted_time())
}

/// Offset of the "now" indicator from the grid's left edge, or None when
/// now lies left of the visible area and the indicator should be hidden.
pub fn now_indicator_offset(
    timeline_start_millis: i64,
    now_millis: i64,
    scroll_offset_px: i32,
    adjustment_px: i32,
    converter: &PixelConverter,
) -> Option<i32> {
    let offset =
        converter.span_to_pixel(timeline_start_millis, now_millis) - scroll_offset_px - adjustment_px;
    if offset < 0 {
        None
    } else {
        Some(offset)
    }
}

pub const MORNING_STARTS_AT_HOUR: u32 = 6;
pub const MORNING_UNTIL_HOUR: u32 = 12;
pub const AFTERNOON_UNTIL_HOUR: u32 = 19;

/// Part of the day shown by the viewport; drives the time-of-day filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    /// Classify an instant by its local hour in `tz`.
    pub fn at(time_millis: i64, tz: Tz) -> TimeOfDay {
        let hour = DateTime::from_timestamp_millis(time_millis)
            .unwrap_or(DateTime::UNIX_EPOCH)
            .with_timezone(&tz)
            .hour();
        if hour < MORNING_UNTIL_HOUR {
            TimeOfDay::Morning
        } else if hour < AFTERNOON_UNTIL_HOUR {
            TimeOfDay::Afternoon
        } else {
            TimeOfDay::Evening
        }
    }

    /// Local hour a jump for this part of the day scrolls to.
    pub fn starts_at_hour(&self) -> u32 {
        match self {
            TimeOfDay::Morning => MORNING_STARTS_AT_HOUR,
            TimeOfDay::Afternoon => MORNING_UNTIL_HOUR,
            TimeOfDay::Evening => AFTERNOON_UNTIL_HOUR,
        }
    }
}

/// Time to jump the viewport to for the "best" programme.
///
/// When now falls within the managed range (and the time-of-day filter is
/// not forced), that is the live programme's start. Otherwise the displayed
/// day is not today, and the jump goes to the selected part of that day.
/// Returns None when there is no live programme to scroll to.
pub fn best_programme_jump_target<T>(
    manager: &GuideManager<T>,
    now_millis: i64,
    selected_time_of_day: TimeOfDay,
    use_time_of_day_filter: bool,
    tz: Tz,
) -> Option<i64> {
    if !use_time_of_day_filter
        && manager.start_time() <= now_millis
        && now_millis <= manager.end_time()
    {
        match manager.current_program_at(None, now_millis) {
            Some(current) => Some(current.starts_at_millis),
            None => {
                log::warn!("Can't scroll to current program because schedule not found.");
                None
            }
        }
    } else {
        let midpoint = (manager.start_time() + manager.end_time()) / 2;
        let date = DateTime::from_timestamp_millis(midpoint)
            .unwrap_or(DateTime::UNIX_EPOCH)
            .with_timezone(&tz)
            .date_naive();
        Some(local_millis(date, selected_time_of_day.starts_at_hour(), tz))
    }
}

/// Restore a row's scroll position from the persisted pixel offset.
///
/// Returns the entry index to scroll to and the pixel offset of that entry
/// relative to the row's left edge, or None when the channel has no entry at
/// the restored time (the caller scrolls to the row start instead).
pub fn resolve_row_scroll<T>(
    manager: &GuideManager<T>,
    channel_id: &ChannelId,
    scroll_offset_px: i32,
    converter: &PixelConverter,
) -> Option<(usize, i32)> {
    let start_time = converter.pixel_to_millis(scroll_offset_px) + manager.start_time();
    let position = manager.program_index_at_time(channel_id, start_time)?;
    let entry = manager.schedule(channel_id, position)?;
    let offset =
        converter.span_to_pixel(manager.start_time(), entry.starts_at_millis) - scroll_offset_px;
    Some((position, offset))
}
