//! Timeline reconciliation engine.
//!
//! Raw upstream schedule data is frequently incomplete: boundary times are
//! missing, entries overlap, or tiny slivers and unaccounted holes appear
//! between programmes. This engine turns the raw per-channel lists into the
//! form the rest of the guide relies on: sorted, contiguous, gap-filled,
//! minimum-duration-respecting timelines clipped to the display day, so
//! pixel-width computation and focus search never meet a zero-width or
//! overlapping cell.
//!
//! Each pass builds a new list; raw input is consumed, never patched in
//! place.

use std::collections::HashMap;

use crate::api::ChannelId;
use crate::config::GuideConfig;
use crate::models::channel::Channel;
use crate::models::schedule::Schedule;
use crate::models::time::TimelineWindow;

/// Result of a reconciliation pass: the normalized per-channel lists and the
/// overall range a viewport may scroll within.
#[derive(Debug)]
pub struct ReconcileOutcome<T> {
    pub entries_by_channel: HashMap<ChannelId, Vec<Schedule<T>>>,
    pub start_utc_millis: i64,
    pub end_utc_millis: i64,
}

/// Reconcile raw per-channel entries against a display-day window.
///
/// The overall range is derived from the raw data (ignoring the unknown
/// start/infinite end sentinels), widened to include the initially requested
/// `[initial_from_utc_millis, initial_to_utc_millis)` range, and clamped to
/// the window. Entries for channels absent from `channels` are discarded.
///
/// # Arguments
///
/// * `channels` - Channel rows, in display order
/// * `raw_entries_by_channel` - Raw entries per channel id, in start order
/// * `window` - The display-day window (see `TimelineWindow::for_date`)
/// * `config` - Duration thresholds
/// * `initial_from_utc_millis` / `initial_to_utc_millis` - The requested
///   initial range, usually the viewport set by `update_initial_range`
pub fn reconcile<T>(
    channels: &[Channel],
    mut raw_entries_by_channel: HashMap<ChannelId, Vec<Schedule<T>>>,
    window: TimelineWindow,
    config: &GuideConfig,
    initial_from_utc_millis: i64,
    initial_to_utc_millis: i64,
) -> ReconcileOutcome<T> {
    // Candidate overall range across all channels. A start of 0 means the
    // upstream source did not know when the entry began, and an end of
    // i64::MAX that it did not know when it ends; neither is a usable bound.
    let mut new_start_millis: Option<i64> = None;
    let mut new_end_millis: Option<i64> = None;
    for channel in channels {
        let entries = match raw_entries_by_channel.get(&channel.id) {
            Some(entries) if !entries.is_empty() => entries,
            _ => continue,
        };
        let first = &entries[0];
        let last = &entries[entries.len() - 1];
        if first.starts_at_millis > 0 {
            new_start_millis = Some(
                new_start_millis.map_or(first.starts_at_millis, |v| v.min(first.starts_at_millis)),
            );
        }
        if last.ends_at_millis != i64::MAX {
            new_end_millis =
                Some(new_end_millis.map_or(last.ends_at_millis, |v| v.max(last.ends_at_millis)));
        }
    }

    let mut start_utc_millis = new_start_millis.unwrap_or(initial_from_utc_millis);
    let mut end_utc_millis = new_end_millis.unwrap_or(initial_to_utc_millis);
    // Never narrower than the initially requested range.
    start_utc_millis = start_utc_millis.min(initial_from_utc_millis);
    end_utc_millis = end_utc_millis.max(initial_to_utc_millis);
    // Never wider than the display day.
    start_utc_millis = start_utc_millis.max(window.starts_at_millis);
    end_utc_millis = end_utc_millis.min(window.ends_at_millis);

    if end_utc_millis <= start_utc_millis {
        return ReconcileOutcome {
            entries_by_channel: raw_entries_by_channel,
            start_utc_millis,
            end_utc_millis,
        };
    }

    let mut entries_by_channel = HashMap::with_capacity(channels.len());
    let mut final_end_millis = end_utc_millis;
    for channel in channels {
        let raw = raw_entries_by_channel.remove(&channel.id).unwrap_or_default();
        let entries =
            reconcile_channel(raw, window, config, start_utc_millis, end_utc_millis);
        if let Some(last) = entries.last() {
            final_end_millis = final_end_millis.max(last.ends_at_millis);
        }
        entries_by_channel.insert(channel.id.clone(), entries);
    }

    ReconcileOutcome {
        entries_by_channel,
        start_utc_millis,
        end_utc_millis: final_end_millis,
    }
}

fn reconcile_channel<T>(
    raw: Vec<Schedule<T>>,
    window: TimelineWindow,
    config: &GuideConfig,
    start_utc_millis: i64,
    end_utc_millis: i64,
) -> Vec<Schedule<T>> {
    if raw.is_empty() {
        return vec![Schedule::gap(start_utc_millis, end_utc_millis)];
    }
    let clipped = clip_to_window(raw, window);
    let padded = pad_to_range(clipped, start_utc_millis, end_utc_millis);
    let closed = close_unaccounted_time(padded, config.max_unaccounted_time_before_gap_ms);
    enforce_min_duration(closed, config.entry_min_duration_ms)
}

/// Cut off entries which don't belong in the display day: drop entries fully
/// outside the window and truncate the offending side of entries that
/// straddle a boundary.
fn clip_to_window<T>(mut raw: Vec<Schedule<T>>, window: TimelineWindow) -> Vec<Schedule<T>> {
    raw.sort_by_key(|entry| entry.starts_at_millis);
    let mut clipped = Vec::with_capacity(raw.len());
    for mut entry in raw {
        if entry.ends_at_millis < window.starts_at_millis
            || entry.starts_at_millis > window.ends_at_millis
        {
            continue;
        }
        if entry.starts_at_millis < window.starts_at_millis {
            entry.starts_at_millis = window.starts_at_millis;
        }
        if entry.ends_at_millis > window.ends_at_millis {
            entry.ends_at_millis = window.ends_at_millis;
        }
        clipped.push(entry);
    }
    clipped
}

/// Pad the list on both sides so it reaches the overall range boundaries.
fn pad_to_range<T>(
    mut entries: Vec<Schedule<T>>,
    start_utc_millis: i64,
    end_utc_millis: i64,
) -> Vec<Schedule<T>> {
    // Right side first, then left, so an emptied-out list gets exactly one
    // covering gap.
    let last_times = entries
        .last()
        .map(|last| (last.starts_at_millis, last.ends_at_millis));
    match last_times {
        None => entries.push(Schedule::gap(start_utc_millis, end_utc_millis)),
        Some((_, last_end)) if end_utc_millis > last_end => {
            entries.push(Schedule::gap(last_end, end_utc_millis));
        }
        Some((last_start, last_end)) if last_end == i64::MAX => {
            // Infinite-end sentinel that survived clipping; the entry's end
            // is unknown, so it becomes a gap up to the range end.
            entries.pop();
            entries.push(Schedule::gap(last_start, end_utc_millis));
        }
        _ => {}
    }
    let first_start = entries.first().map(|first| first.starts_at_millis);
    if let Some(first_start) = first_start {
        if start_utc_millis < first_start {
            entries.insert(0, Schedule::gap(start_utc_millis, first_start));
        }
    }
    entries
}

/// Entries in raw feeds do not always follow each other; there are empty
/// places which have not been accounted for. Small holes are absorbed by
/// stretching the earlier entry's end to the next start (this also truncates
/// overlaps); holes at or above the threshold become explicit gap entries.
/// The original times remain available on each entry.
fn close_unaccounted_time<T>(entries: Vec<Schedule<T>>, threshold_ms: i64) -> Vec<Schedule<T>> {
    let mut closed: Vec<Schedule<T>> = Vec::with_capacity(entries.len());
    let mut iter = entries.into_iter().peekable();
    while let Some(mut current) = iter.next() {
        match iter.peek() {
            Some(next) => {
                let time_difference = next.starts_at_millis - current.ends_at_millis;
                if time_difference < threshold_ms {
                    current.ends_at_millis = next.starts_at_millis;
                    closed.push(current);
                } else {
                    let gap_from = current.ends_at_millis;
                    let gap_to = next.starts_at_millis;
                    closed.push(current);
                    closed.push(Schedule::gap(gap_from, gap_to));
                }
            }
            None => closed.push(current),
        }
    }
    closed
}

/// Find very short schedules and extend them to the minimum duration,
/// shifting the following entries to account for it. The carried delay
/// drains into later entries; if the last entry is affected, the list's end
/// time grows to absorb it.
fn enforce_min_duration<T>(entries: Vec<Schedule<T>>, min_duration_ms: i64) -> Vec<Schedule<T>> {
    let len = entries.len();
    let mut result: Vec<Schedule<T>> = Vec::with_capacity(len);
    let mut millis_to_add_to_next_start: i64 = 0;
    for (index, mut current) in entries.into_iter().enumerate() {
        let current_duration =
            current.ends_at_millis - (current.starts_at_millis + millis_to_add_to_next_start);
        let has_next = index + 1 < len;
        if !has_next && (millis_to_add_to_next_start > 0 || current_duration < min_duration_ms) {
            log::info!(
                "The last schedule ({}) has been extended because it was too short.",
                title_of(&current)
            );
            let new_end = (current.starts_at_millis + min_duration_ms).max(current.ends_at_millis);
            current.starts_at_millis += millis_to_add_to_next_start;
            current.ends_at_millis = new_end;
        } else if current_duration < min_duration_ms {
            log::info!(
                "The schedule {} has been extended because it was too short.",
                title_of(&current)
            );
            let original_end = current.ends_at_millis;
            current.starts_at_millis += millis_to_add_to_next_start;
            current.ends_at_millis = current.starts_at_millis + min_duration_ms;
            millis_to_add_to_next_start = current.ends_at_millis - original_end;
        } else if millis_to_add_to_next_start > 0 {
            log::info!(
                "The schedule {} has been shortened because the previous schedule had to be extended.",
                title_of(&current)
            );
            current.starts_at_millis += millis_to_add_to_next_start;
            millis_to_add_to_next_start = 0;
        }
        result.push(current);
    }
    result
}

fn title_of<T>(entry: &Schedule<T>) -> &str {
    entry.display_title.as_deref().unwrap_or("untitled")
}
