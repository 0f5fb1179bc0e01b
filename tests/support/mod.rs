//! Shared fixtures for the integration tests.

use epg_rust::api::Schedule;

/// 2024-01-10 05:00:00 UTC, the display-day start for the fixture date in
/// UTC with the default config.
pub const DAY_START_MS: i64 = 1_704_862_800_000;

pub const HOUR_MS: i64 = 3_600_000;
pub const MINUTE_MS: i64 = 60_000;

/// A feed with three channels over the fixture day:
/// - `one`: clean back-to-back entries
/// - `two`: a feed with a 20-minute hole, an overlap and a short entry
/// - `three`: no entries at all
pub fn fixture_feed_json() -> String {
    let h = |hours: i64, minutes: i64| DAY_START_MS + hours * HOUR_MS + minutes * MINUTE_MS;
    format!(
        r#"{{
            "channels": [
                {{ "id": "one", "name": "Channel One", "image_url": "https://example.org/one.png" }},
                {{ "id": "two", "name": "Channel Two" }},
                {{ "id": "three", "name": "Channel Three" }}
            ],
            "entries": {{
                "one": [
                    {{ "id": 101, "starts_at_millis": {}, "ends_at_millis": {}, "display_title": "Breakfast Show", "program": {{ "genre": "talk" }} }},
                    {{ "id": 102, "starts_at_millis": {}, "ends_at_millis": {}, "display_title": "Morning News", "program": {{ "genre": "news" }} }},
                    {{ "id": 103, "starts_at_millis": {}, "ends_at_millis": {}, "display_title": "Quiz Hour", "program": {{ "genre": "quiz" }} }}
                ],
                "two": [
                    {{ "id": 201, "starts_at_millis": {}, "ends_at_millis": {}, "display_title": "Documentary", "program": {{ "genre": "docu" }} }},
                    {{ "id": 202, "starts_at_millis": {}, "ends_at_millis": {}, "display_title": "Shorts", "program": {{ "genre": "shorts" }} }},
                    {{ "id": 203, "starts_at_millis": {}, "ends_at_millis": {}, "display_title": "Late Movie", "program": {{ "genre": "movie" }} }}
                ]
            }}
        }}"#,
        h(0, 0),
        h(1, 0),
        h(1, 0),
        h(2, 0),
        h(2, 0),
        h(4, 0),
        // channel two: hole between 1:00 and 1:20, then a 30-second entry,
        // then an overlapping movie
        h(0, 0),
        h(1, 0),
        h(1, 20),
        h(1, 20) + 30_000,
        h(1, 20),
        h(3, 0),
    )
}

/// Assert the reconciliation invariant on one channel's entries.
pub fn assert_contiguous<T>(entries: &[Schedule<T>], start_ms: i64, end_ms: i64) {
    assert!(!entries.is_empty());
    assert_eq!(entries[0].starts_at_millis, start_ms);
    assert_eq!(entries[entries.len() - 1].ends_at_millis, end_ms);
    for pair in entries.windows(2) {
        assert_eq!(
            pair[0].ends_at_millis, pair[1].starts_at_millis,
            "entries must be contiguous"
        );
    }
    for entry in entries {
        assert!(
            entry.duration_millis() >= 120_000,
            "every entry must be at least two minutes wide"
        );
    }
}
