//! Focus selection for vertical navigation.
//!
//! When focus moves to another channel row, the cell to land on is chosen
//! geometrically: the tracker remembers the horizontal pixel extent of the
//! previously focused cell and the selector scores the new row's cells
//! against it. The rendering layer supplies each row's cells as
//! [`FocusCandidate`] values and performs the actual focus move.

use crate::api::ScheduleId;
use crate::models::geometry::{PixelConverter, PixelRange};

/// One focusable cell in a candidate row, described by its visible pixel
/// span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusCandidate {
    pub schedule_id: ScheduleId,
    pub bounds: PixelRange,
    pub is_current_program: bool,
}

/// Return the index of the candidate that should be focused in the given
/// row according to the focus range, or None if the row offers nothing (the
/// caller falls back to the platform's default focus search).
///
/// Priority order: the one-shot last-clicked schedule, then the live
/// programme when `keep_current_program_focused` is set, then geometric
/// overlap. A candidate whose span fully contains the focus range wins
/// immediately; otherwise the widest candidate fully inside the range wins;
/// otherwise the largest partial overlap wins, considered only while no
/// fully contained candidate has been seen.
pub fn select_focus_target(
    candidates: &[FocusCandidate],
    focus_range: PixelRange,
    keep_current_program_focused: bool,
    last_clicked: Option<ScheduleId>,
) -> Option<usize> {
    if let Some(clicked) = last_clicked {
        if let Some(index) = candidates
            .iter()
            .position(|candidate| candidate.schedule_id == clicked)
        {
            return Some(index);
        }
    }

    if keep_current_program_focused {
        if let Some(index) = candidates
            .iter()
            .position(|candidate| candidate.is_current_program)
        {
            return Some(index);
        }
    }

    // Find the largest candidate among the fully overlapped ones.
    let mut max_fully_overlapped_width = i32::MIN;
    let mut max_partially_overlapped_width = i32::MIN;
    let mut next_focus_index: Option<usize> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let bounds = candidate.bounds;
        if bounds.left <= focus_range.left && focus_range.right <= bounds.right {
            // The old focused range is fully inside the candidate; take it.
            return Some(index);
        } else if focus_range.left <= bounds.left && bounds.right <= focus_range.right {
            // The candidate is fully inside the old focused range; choose
            // the widest one.
            let width = bounds.width();
            if width > max_fully_overlapped_width {
                next_focus_index = Some(index);
                max_fully_overlapped_width = width;
            }
        } else if max_fully_overlapped_width == i32::MIN {
            let overlapped_width = if focus_range.left <= bounds.left {
                focus_range.right - bounds.left
            } else {
                bounds.right - focus_range.left
            };
            if overlapped_width > max_partially_overlapped_width {
                next_focus_index = Some(index);
                max_partially_overlapped_width = overlapped_width;
            }
        }
    }
    next_focus_index
}

/// Exclude a margin near the viewport's trailing edge from focus, so a
/// nearly invisible sliver at the scroll edge never takes it.
pub fn rightmost_focusable_position(
    viewport_right: i32,
    converter: &PixelConverter,
    focus_side_margin_ms: i64,
) -> i32 {
    viewport_right - converter.millis_to_pixel(focus_side_margin_ms)
}

/// Per-navigation-session focus state: the horizontal range the next
/// vertical move should overlap, the one-shot clicked schedule and the
/// keep-current-programme flag.
///
/// The range narrows as focus moves vertically (intersection with each
/// focused cell's span) and resets whenever focus arrives by other means or
/// the viewport changes.
#[derive(Debug)]
pub struct FocusTracker {
    focus_range_left: i32,
    focus_range_right: i32,
    overlap_start: i32,
    rightmost_focusable: i32,
    feature_keep_current_program_focused: bool,
    keep_current_program_focused: bool,
    last_clicked: Option<ScheduleId>,
}

impl FocusTracker {
    /// Create a tracker for a grid whose rows start at `overlap_start`
    /// pixels and whose focusable area ends at `rightmost_focusable` (see
    /// [`rightmost_focusable_position`]).
    pub fn new(overlap_start: i32, rightmost_focusable: i32) -> Self {
        let mut tracker = FocusTracker {
            focus_range_left: 0,
            focus_range_right: 0,
            overlap_start,
            rightmost_focusable,
            feature_keep_current_program_focused: true,
            keep_current_program_focused: false,
            last_clicked: None,
        };
        tracker.clear(None);
        tracker
    }

    /// Update the grid geometry after a layout or viewport change.
    pub fn set_bounds(&mut self, overlap_start: i32, rightmost_focusable: i32) {
        self.overlap_start = overlap_start;
        self.rightmost_focusable = rightmost_focusable;
    }

    /// Enable or disable the keep-current-programme feature.
    pub fn set_feature_keep_current_program_focused(&mut self, value: bool) {
        self.feature_keep_current_program_focused = value;
        self.keep_current_program_focused = self.keep_current_program_focused && value;
    }

    pub fn keep_current_program_focused(&self) -> bool {
        self.keep_current_program_focused
    }

    /// Remember an explicitly clicked schedule; the next row selection picks
    /// it unconditionally, once.
    pub fn record_clicked(&mut self, schedule_id: ScheduleId) {
        self.last_clicked = Some(schedule_id);
    }

    /// Request that the next selection lands on the live programme.
    pub fn focus_current_program(&mut self) {
        self.keep_current_program_focused = true;
    }

    /// The currently tracked focus range.
    pub fn focus_range(&mut self) -> PixelRange {
        if self.focus_range_left == i32::MIN && self.focus_range_right == i32::MAX {
            self.clear(None);
        }
        PixelRange::new(self.focus_range_left, self.focus_range_right)
    }

    /// Reset the focus state because focus arrived by other means than an
    /// up/down move, or the viewport changed.
    ///
    /// `focused_cell` is None when the newly focused view is not a schedule
    /// cell, and otherwise carries whether that cell shows the live
    /// programme; this determines whether the keep-current behavior stays
    /// armed.
    pub fn clear(&mut self, focused_cell: Option<bool>) {
        self.focus_range_left = self.overlap_start;
        self.focus_range_right = self.rightmost_focusable;
        self.keep_current_program_focused = self.feature_keep_current_program_focused
            && focused_cell.map_or(true, |is_current_program| is_current_program);
    }

    /// Narrow the focus range after a vertical move landed on a cell with
    /// the given span. Both the range and the span are clipped against the
    /// rightmost focusable position first.
    pub fn update_for_vertical_move(&mut self, focused: PixelRange) {
        let rightmost = self.rightmost_focusable;
        self.focus_range_left = self.focus_range_left.min(rightmost);
        self.focus_range_right = self.focus_range_right.min(rightmost);
        let clipped = PixelRange::new(focused.left.min(rightmost), focused.right.min(rightmost));

        if clipped.left > self.focus_range_right || clipped.right < self.focus_range_left {
            log::warn!("The current focus is out of [focus_range_left, focus_range_right]");
            self.focus_range_left = clipped.left;
            self.focus_range_right = clipped.right;
            return;
        }
        self.focus_range_left = self.focus_range_left.max(clipped.left);
        self.focus_range_right = self.focus_range_right.min(clipped.right);
    }

    /// Select the cell to focus in a candidate row, consuming the one-shot
    /// clicked schedule if it was set.
    pub fn select_in_row(&mut self, candidates: &[FocusCandidate]) -> Option<usize> {
        let focus_range = self.focus_range();
        let last_clicked = self.last_clicked.take();
        select_focus_target(
            candidates,
            focus_range,
            self.keep_current_program_focused,
            last_clicked,
        )
    }
}
