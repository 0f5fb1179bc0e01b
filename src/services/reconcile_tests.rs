use std::collections::HashMap;

use crate::api::{ChannelId, ScheduleId};
use crate::config::GuideConfig;
use crate::models::channel::Channel;
use crate::models::schedule::{OriginalTimes, Schedule};
use crate::models::time::{TimelineWindow, HOUR_IN_MILLIS, MINUTE_IN_MILLIS};
use crate::services::reconcile::{reconcile, ReconcileOutcome};

fn channel(id: &str) -> Channel {
    Channel::new(id, id.to_uppercase(), None)
}

fn entry(id: i64, starts: i64, ends: i64, title: &str) -> Schedule<i64> {
    Schedule {
        id: ScheduleId::new(id),
        starts_at_millis: starts,
        ends_at_millis: ends,
        original_times: OriginalTimes {
            starts_at_millis: starts,
            ends_at_millis: ends,
        },
        is_clickable: true,
        display_title: Some(title.to_string()),
        program: Some(id),
    }
}

fn window(starts: i64, ends: i64) -> TimelineWindow {
    TimelineWindow {
        starts_at_millis: starts,
        ends_at_millis: ends,
    }
}

/// Reconcile a single channel against an identical window and initial range.
fn run_single(
    entries: Vec<Schedule<i64>>,
    range_start: i64,
    range_end: i64,
) -> ReconcileOutcome<i64> {
    let channels = vec![channel("c1")];
    let mut raw = HashMap::new();
    raw.insert(ChannelId::new("c1"), entries);
    reconcile(
        &channels,
        raw,
        window(range_start, range_end),
        &GuideConfig::default(),
        range_start,
        range_end,
    )
}

fn entries_of<'a>(outcome: &'a ReconcileOutcome<i64>, id: &str) -> &'a [Schedule<i64>] {
    &outcome.entries_by_channel[&ChannelId::new(id)]
}

/// The invariant every reconciled list must uphold: sorted, contiguous,
/// covering the outcome range, with no entry below the minimum duration.
fn assert_invariants(entries: &[Schedule<i64>], outcome: &ReconcileOutcome<i64>) {
    let min_duration = GuideConfig::default().entry_min_duration_ms;
    assert!(!entries.is_empty(), "a reconciled list is never empty");
    assert_eq!(
        entries[0].starts_at_millis, outcome.start_utc_millis,
        "list must start at the range start"
    );
    assert_eq!(
        entries[entries.len() - 1].ends_at_millis, outcome.end_utc_millis,
        "list must reach the range end"
    );
    for pair in entries.windows(2) {
        assert_eq!(
            pair[0].ends_at_millis, pair[1].starts_at_millis,
            "entries must be contiguous"
        );
    }
    for entry in entries {
        assert!(
            entry.duration_millis() >= min_duration,
            "entry {} is shorter than the minimum duration",
            entry.id
        );
    }
}

#[test]
fn test_unknown_start_keeps_entry_and_pads_right() {
    // An entry whose start the upstream source did not know (0) with the
    // range [0, 2h): the entry survives with its title, and a gap fills the
    // remainder.
    let outcome = run_single(vec![entry(1, 0, 3_600_000, "A")], 0, 7_200_000);
    assert_eq!(outcome.start_utc_millis, 0);
    assert_eq!(outcome.end_utc_millis, 7_200_000);

    let entries = entries_of(&outcome, "c1");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].starts_at_millis, 0);
    assert_eq!(entries[0].ends_at_millis, 3_600_000);
    assert_eq!(entries[0].display_title.as_deref(), Some("A"));
    assert!(!entries[0].is_gap());
    assert_eq!(entries[1].starts_at_millis, 3_600_000);
    assert_eq!(entries[1].ends_at_millis, 7_200_000);
    assert!(entries[1].is_gap());
    assert_invariants(entries, &outcome);
}

#[test]
fn test_unaccounted_time_above_threshold_becomes_explicit_gap() {
    let outcome = run_single(
        vec![
            entry(1, HOUR_IN_MILLIS, 2 * HOUR_IN_MILLIS, "A"),
            entry(
                2,
                2 * HOUR_IN_MILLIS + 20 * MINUTE_IN_MILLIS,
                3 * HOUR_IN_MILLIS,
                "B",
            ),
        ],
        0,
        4 * HOUR_IN_MILLIS,
    );

    let entries = entries_of(&outcome, "c1");
    assert_invariants(entries, &outcome);
    // leading gap, A, the 20-minute gap, B, trailing gap
    assert_eq!(entries.len(), 5);
    assert!(entries[2].is_gap(), "a 20-minute hole becomes a visible gap");
    assert_eq!(entries[2].starts_at_millis, 2 * HOUR_IN_MILLIS);
    assert_eq!(
        entries[2].ends_at_millis,
        2 * HOUR_IN_MILLIS + 20 * MINUTE_IN_MILLIS
    );
    assert_eq!(entries[1].ends_at_millis, 2 * HOUR_IN_MILLIS, "A is not stretched");
}

#[test]
fn test_unaccounted_time_below_threshold_is_absorbed() {
    let outcome = run_single(
        vec![
            entry(1, HOUR_IN_MILLIS, 2 * HOUR_IN_MILLIS, "A"),
            entry(
                2,
                2 * HOUR_IN_MILLIS + 10 * MINUTE_IN_MILLIS,
                3 * HOUR_IN_MILLIS,
                "B",
            ),
        ],
        0,
        4 * HOUR_IN_MILLIS,
    );

    let entries = entries_of(&outcome, "c1");
    assert_invariants(entries, &outcome);
    // leading gap, A (stretched), B, trailing gap; no gap entry in between
    assert_eq!(entries.len(), 4);
    assert_eq!(
        entries[1].ends_at_millis,
        2 * HOUR_IN_MILLIS + 10 * MINUTE_IN_MILLIS,
        "A absorbs the 10-minute hole"
    );
    assert!(!entries[2].is_gap());
    assert_eq!(
        entries[1].original_times.ends_at_millis,
        2 * HOUR_IN_MILLIS,
        "the original end stays available"
    );
}

#[test]
fn test_short_entry_extended_to_minimum_duration() {
    let outcome = run_single(
        vec![entry(1, HOUR_IN_MILLIS, HOUR_IN_MILLIS + 30_000, "Short")],
        0,
        4 * HOUR_IN_MILLIS,
    );

    let entries = entries_of(&outcome, "c1");
    assert_invariants(entries, &outcome);
    let short = entries
        .iter()
        .find(|e| e.id == ScheduleId::new(1))
        .expect("the short entry survives");
    assert_eq!(short.starts_at_millis, HOUR_IN_MILLIS);
    assert_eq!(
        short.ends_at_millis,
        HOUR_IN_MILLIS + 120_000,
        "a 30-second entry is extended to two minutes"
    );
}

#[test]
fn test_consecutive_short_entries_carry_the_shift_forward() {
    let base = HOUR_IN_MILLIS;
    let outcome = run_single(
        vec![
            entry(1, base, base + 30_000, "A"),
            entry(2, base + 30_000, base + 60_000, "B"),
        ],
        0,
        4 * HOUR_IN_MILLIS,
    );

    let entries = entries_of(&outcome, "c1");
    assert_invariants(entries, &outcome);
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[1].starts_at_millis, base);
    assert_eq!(entries[1].ends_at_millis, base + 120_000);
    assert_eq!(
        entries[2].starts_at_millis,
        base + 120_000,
        "B is shifted by A's extension"
    );
    assert_eq!(entries[2].ends_at_millis, base + 240_000);
    assert_eq!(
        entries[3].starts_at_millis,
        base + 240_000,
        "the trailing gap absorbs the carried shift"
    );
}

#[test]
fn test_overlapping_entries_are_truncated() {
    let outcome = run_single(
        vec![
            entry(1, HOUR_IN_MILLIS, 2 * HOUR_IN_MILLIS + 30 * MINUTE_IN_MILLIS, "A"),
            entry(2, 2 * HOUR_IN_MILLIS, 3 * HOUR_IN_MILLIS, "B"),
        ],
        0,
        4 * HOUR_IN_MILLIS,
    );

    let entries = entries_of(&outcome, "c1");
    assert_invariants(entries, &outcome);
    let a = entries.iter().find(|e| e.id == ScheduleId::new(1)).unwrap();
    let b = entries.iter().find(|e| e.id == ScheduleId::new(2)).unwrap();
    assert_eq!(a.ends_at_millis, b.starts_at_millis, "the overlap is cut");
    assert_eq!(b.starts_at_millis, 2 * HOUR_IN_MILLIS);
}

#[test]
fn test_channel_without_entries_gets_single_gap() {
    let channels = vec![channel("c1"), channel("c2")];
    let mut raw = HashMap::new();
    raw.insert(
        ChannelId::new("c1"),
        vec![entry(1, HOUR_IN_MILLIS, 2 * HOUR_IN_MILLIS, "A")],
    );
    let outcome = reconcile(
        &channels,
        raw,
        window(0, 4 * HOUR_IN_MILLIS),
        &GuideConfig::default(),
        0,
        4 * HOUR_IN_MILLIS,
    );

    let empty = entries_of(&outcome, "c2");
    assert_eq!(empty.len(), 1);
    assert!(empty[0].is_gap());
    assert_eq!(empty[0].starts_at_millis, outcome.start_utc_millis);
    assert_eq!(empty[0].ends_at_millis, outcome.end_utc_millis);
}

#[test]
fn test_entries_outside_window_are_dropped() {
    let outcome = run_single(
        vec![
            entry(1, 0, 30 * MINUTE_IN_MILLIS, "Before"),
            entry(2, 90 * MINUTE_IN_MILLIS, 2 * HOUR_IN_MILLIS, "Inside"),
            entry(3, 4 * HOUR_IN_MILLIS, 5 * HOUR_IN_MILLIS, "After"),
        ],
        HOUR_IN_MILLIS,
        3 * HOUR_IN_MILLIS,
    );

    let entries = entries_of(&outcome, "c1");
    assert_invariants(entries, &outcome);
    assert!(entries.iter().all(|e| e.id != ScheduleId::new(1)));
    assert!(entries.iter().all(|e| e.id != ScheduleId::new(3)));
    assert!(entries.iter().any(|e| e.id == ScheduleId::new(2)));
}

#[test]
fn test_straddling_entries_are_truncated_to_the_window() {
    let outcome = run_single(
        vec![
            entry(1, 30 * MINUTE_IN_MILLIS, 90 * MINUTE_IN_MILLIS, "Left"),
            entry(2, 150 * MINUTE_IN_MILLIS, 4 * HOUR_IN_MILLIS, "Right"),
        ],
        HOUR_IN_MILLIS,
        3 * HOUR_IN_MILLIS,
    );

    let entries = entries_of(&outcome, "c1");
    assert_invariants(entries, &outcome);
    let left = entries.iter().find(|e| e.id == ScheduleId::new(1)).unwrap();
    let right = entries.iter().find(|e| e.id == ScheduleId::new(2)).unwrap();
    assert_eq!(left.starts_at_millis, HOUR_IN_MILLIS);
    assert_eq!(left.original_times.starts_at_millis, 30 * MINUTE_IN_MILLIS);
    assert_eq!(right.ends_at_millis, 3 * HOUR_IN_MILLIS);
    assert_eq!(right.original_times.ends_at_millis, 4 * HOUR_IN_MILLIS);
    // the hour between them is above the threshold
    assert!(entries
        .iter()
        .any(|e| e.is_gap() && e.starts_at_millis == 90 * MINUTE_IN_MILLIS));
}

#[test]
fn test_infinite_end_is_clipped_to_the_window() {
    let outcome = run_single(
        vec![entry(1, HOUR_IN_MILLIS, i64::MAX, "Open End")],
        0,
        4 * HOUR_IN_MILLIS,
    );

    let entries = entries_of(&outcome, "c1");
    assert_invariants(entries, &outcome);
    let open = entries.iter().find(|e| e.id == ScheduleId::new(1)).unwrap();
    assert_eq!(open.ends_at_millis, 4 * HOUR_IN_MILLIS);
    assert!(!open.is_gap(), "the programme itself survives");
}

#[test]
fn test_unsorted_input_is_normalized() {
    let sorted = run_single(
        vec![
            entry(1, HOUR_IN_MILLIS, 2 * HOUR_IN_MILLIS, "A"),
            entry(2, 2 * HOUR_IN_MILLIS, 3 * HOUR_IN_MILLIS, "B"),
        ],
        0,
        4 * HOUR_IN_MILLIS,
    );
    let unsorted = run_single(
        vec![
            entry(2, 2 * HOUR_IN_MILLIS, 3 * HOUR_IN_MILLIS, "B"),
            entry(1, HOUR_IN_MILLIS, 2 * HOUR_IN_MILLIS, "A"),
        ],
        0,
        4 * HOUR_IN_MILLIS,
    );
    assert_eq!(entries_of(&sorted, "c1"), entries_of(&unsorted, "c1"));
}

#[test]
fn test_reconciliation_is_idempotent() {
    let first = run_single(
        vec![
            entry(1, HOUR_IN_MILLIS, 2 * HOUR_IN_MILLIS, "A"),
            entry(
                2,
                2 * HOUR_IN_MILLIS + 20 * MINUTE_IN_MILLIS,
                3 * HOUR_IN_MILLIS,
                "B",
            ),
        ],
        0,
        4 * HOUR_IN_MILLIS,
    );
    let reconciled = entries_of(&first, "c1").to_vec();

    let second = run_single(reconciled.clone(), 0, 4 * HOUR_IN_MILLIS);
    assert_eq!(
        entries_of(&second, "c1"),
        reconciled.as_slice(),
        "reconciling a reconciled list changes nothing"
    );
    assert_eq!(second.start_utc_millis, first.start_utc_millis);
    assert_eq!(second.end_utc_millis, first.end_utc_millis);
}

#[test]
fn test_all_channels_empty_falls_back_to_initial_range() {
    let channels = vec![channel("c1")];
    let outcome = reconcile::<i64>(
        &channels,
        HashMap::new(),
        window(0, 4 * HOUR_IN_MILLIS),
        &GuideConfig::default(),
        HOUR_IN_MILLIS,
        2 * HOUR_IN_MILLIS,
    );
    assert_eq!(outcome.start_utc_millis, HOUR_IN_MILLIS);
    assert_eq!(outcome.end_utc_millis, 2 * HOUR_IN_MILLIS);
    let entries = entries_of(&outcome, "c1");
    assert_eq!(entries.len(), 1);
    assert!(entries[0].is_gap());
}

#[test]
fn test_degenerate_range_leaves_entries_untouched() {
    let raw_entry = entry(1, 0, HOUR_IN_MILLIS, "A");
    let channels = vec![channel("c1")];
    let mut raw = HashMap::new();
    raw.insert(ChannelId::new("c1"), vec![raw_entry.clone()]);
    let outcome = reconcile(&channels, raw, window(0, 0), &GuideConfig::default(), 0, 0);
    assert_eq!(outcome.start_utc_millis, outcome.end_utc_millis);
    assert_eq!(entries_of(&outcome, "c1"), &[raw_entry]);
}

#[test]
fn test_range_derived_from_widest_channel() {
    let channels = vec![channel("c1"), channel("c2")];
    let mut raw = HashMap::new();
    raw.insert(
        ChannelId::new("c1"),
        vec![entry(1, HOUR_IN_MILLIS, 2 * HOUR_IN_MILLIS, "A")],
    );
    raw.insert(
        ChannelId::new("c2"),
        vec![entry(2, 30 * MINUTE_IN_MILLIS, 3 * HOUR_IN_MILLIS, "B")],
    );
    let outcome = reconcile(
        &channels,
        raw,
        window(0, 4 * HOUR_IN_MILLIS),
        &GuideConfig::default(),
        HOUR_IN_MILLIS,
        2 * HOUR_IN_MILLIS,
    );
    assert_eq!(outcome.start_utc_millis, 30 * MINUTE_IN_MILLIS);
    assert_eq!(outcome.end_utc_millis, 3 * HOUR_IN_MILLIS);
    // the narrow channel is padded out to the shared range
    let narrow = entries_of(&outcome, "c1");
    assert_eq!(narrow[0].starts_at_millis, 30 * MINUTE_IN_MILLIS);
    assert_eq!(narrow[narrow.len() - 1].ends_at_millis, 3 * HOUR_IN_MILLIS);
    assert_invariants(narrow, &outcome);
    assert_invariants(entries_of(&outcome, "c2"), &outcome);
}

#[test]
fn test_entries_for_unlisted_channels_are_discarded() {
    let channels = vec![channel("c1")];
    let mut raw = HashMap::new();
    raw.insert(
        ChannelId::new("c1"),
        vec![entry(1, HOUR_IN_MILLIS, 2 * HOUR_IN_MILLIS, "A")],
    );
    raw.insert(
        ChannelId::new("ghost"),
        vec![entry(9, HOUR_IN_MILLIS, 2 * HOUR_IN_MILLIS, "Ghost")],
    );
    let outcome = reconcile(
        &channels,
        raw,
        window(0, 4 * HOUR_IN_MILLIS),
        &GuideConfig::default(),
        0,
        4 * HOUR_IN_MILLIS,
    );
    assert!(outcome
        .entries_by_channel
        .get(&ChannelId::new("ghost"))
        .is_none());
}
