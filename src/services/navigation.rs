//! Directional navigation decisions.
//!
//! Pure functions deciding what a directional key press does to focus and to
//! the viewport. The rendering layer performs the actual focus move and
//! feeds the resulting geometry back through the focus tracker.

use crate::models::schedule::Schedule;
use crate::models::time::{HALF_HOUR_IN_MILLIS, HOUR_IN_MILLIS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalDirection {
    Up,
    Down,
}

/// Horizontal movement along a channel row, in timeline terms (start = left
/// in a left-to-right layout).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalDirection {
    TowardStart,
    TowardEnd,
}

/// Outcome of a horizontal focus search within one channel row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalMove {
    /// Shift the viewport by the given delta and keep focus on the current
    /// cell; the move is re-attempted once the shift has settled.
    ShiftAndRetain(i64),
    /// Move focus to the adjacent cell, optionally shifting the viewport by
    /// `nudge` so the target is comfortably visible.
    MoveTo { nudge: Option<i64> },
    /// No usable target here; fall back to the platform's default search.
    Fallback,
}

/// Decide what a horizontal key press does, given the focused entry, the
/// visible window and the entry the platform's default search would land on
/// (`None` when the search found nothing or left the row).
///
/// A cell wider than the viewport is scrolled through in bounded one-hour
/// steps before focus is allowed to leave it.
pub fn horizontal_focus_search<T>(
    focused: &Schedule<T>,
    direction: HorizontalDirection,
    from_utc_millis: i64,
    to_utc_millis: i64,
    target: Option<&Schedule<T>>,
) -> HorizontalMove {
    match direction {
        HorizontalDirection::TowardStart => {
            if focused.starts_at_millis < from_utc_millis {
                // The current entry starts outside of the view; align or
                // scroll to the left.
                return HorizontalMove::ShiftAndRetain(
                    (focused.starts_at_millis - from_utc_millis).max(-HOUR_IN_MILLIS),
                );
            }
        }
        HorizontalDirection::TowardEnd => {
            if focused.ends_at_millis > to_utc_millis {
                // The current entry ends outside of the view; scroll right.
                return HorizontalMove::ShiftAndRetain(HOUR_IN_MILLIS);
            }
        }
    }

    let target = match target {
        Some(target) => target,
        None => {
            if direction == HorizontalDirection::TowardEnd && focused.ends_at_millis != to_utc_millis
            {
                // The focused entry is the last entry; align to the right edge.
                return HorizontalMove::ShiftAndRetain(focused.ends_at_millis - to_utc_millis);
            }
            return HorizontalMove::Fallback;
        }
    };

    match direction {
        HorizontalDirection::TowardStart => {
            if target.starts_at_millis < from_utc_millis
                && target.ends_at_millis < from_utc_millis + HALF_HOUR_IN_MILLIS
            {
                // The target starts outside the view; align or scroll left.
                HorizontalMove::MoveTo {
                    nudge: Some((target.starts_at_millis - from_utc_millis).max(-HOUR_IN_MILLIS)),
                }
            } else {
                HorizontalMove::MoveTo { nudge: None }
            }
        }
        HorizontalDirection::TowardEnd => {
            if target.starts_at_millis > from_utc_millis + HOUR_IN_MILLIS + HALF_HOUR_IN_MILLIS {
                // The target starts far outside the view; scroll right.
                HorizontalMove::MoveTo {
                    nudge: Some(
                        (target.starts_at_millis - from_utc_millis - HOUR_IN_MILLIS)
                            .min(HOUR_IN_MILLIS),
                    ),
                }
            } else {
                HorizontalMove::MoveTo { nudge: None }
            }
        }
    }
}

/// Outcome of a vertical focus move across channel rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalMove {
    /// Move to the visible row at this index.
    To(usize),
    /// Keep focus where it is (more rows exist but are not laid out yet).
    Stay,
    /// Wrap around to the first channel row.
    WrapToFirst,
    /// Wrap around to the last channel row.
    WrapToLast,
    /// Leave the grid.
    Exit,
}

/// Decide where vertical focus goes from the row at `focused_visible_index`
/// among `visible_row_count` laid-out rows. `selected_position` and
/// `row_count` describe the focused row's position within the full channel
/// list, which determines wraparound at the ends.
pub fn vertical_move(
    focused_visible_index: usize,
    direction: VerticalDirection,
    visible_row_count: usize,
    selected_position: usize,
    row_count: usize,
    wrap_enabled: bool,
) -> VerticalMove {
    let next_index = match direction {
        VerticalDirection::Up => focused_visible_index.checked_sub(1),
        VerticalDirection::Down => {
            let next = focused_visible_index + 1;
            (next < visible_row_count).then_some(next)
        }
    };
    match next_index {
        Some(index) => VerticalMove::To(index),
        None => {
            if wrap_enabled {
                if selected_position == 0 {
                    VerticalMove::WrapToLast
                } else if row_count > 0 && selected_position == row_count - 1 {
                    VerticalMove::WrapToFirst
                } else {
                    VerticalMove::Stay
                }
            } else {
                VerticalMove::Exit
            }
        }
    }
}
