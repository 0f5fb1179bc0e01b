//! Schedule entity.
//!
//! A schedule is one cell in the grid: either a real programme or a
//! synthetic gap keeping a channel's timeline contiguous. The payload type
//! is caller-defined; the guide never inspects it beyond presence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::ScheduleId;
use crate::models::geometry::PixelConverter;

/// The times an entry had before reconciliation adjusted them.
///
/// Reconciliation clips, stretches and shifts entry times; the original
/// values are kept here for reference and for detecting inconsistent
/// updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginalTimes {
    pub starts_at_millis: i64,
    pub ends_at_millis: i64,
}

/// A programme or gap in the guide.
///
/// Start and end are UTC epoch milliseconds forming the half-open interval
/// `[starts_at_millis, ends_at_millis)`. Overlapping times within one
/// channel are not allowed and are corrected by the guide manager. The id
/// must be unique across all schedules in the guide; `ScheduleId::GAP` is
/// reserved for synthetic gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule<T> {
    pub id: ScheduleId,
    pub starts_at_millis: i64,
    pub ends_at_millis: i64,
    pub original_times: OriginalTimes,
    pub is_clickable: bool,
    pub display_title: Option<String>,
    pub program: Option<T>,
}

impl<T> Schedule<T> {
    /// Create a synthetic gap entry covering `[from, to)`.
    pub fn gap(from: i64, to: i64) -> Schedule<T> {
        Schedule {
            id: ScheduleId::GAP,
            starts_at_millis: from,
            ends_at_millis: to,
            original_times: OriginalTimes {
                starts_at_millis: from,
                ends_at_millis: to,
            },
            is_clickable: false,
            display_title: None,
            program: None,
        }
    }

    /// Create a programme entry from instants.
    pub fn with_program(
        id: i64,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        is_clickable: bool,
        display_title: Option<String>,
        program: T,
    ) -> Schedule<T> {
        Schedule {
            id: ScheduleId::new(id),
            starts_at_millis: starts_at.timestamp_millis(),
            ends_at_millis: ends_at.timestamp_millis(),
            original_times: OriginalTimes {
                starts_at_millis: starts_at.timestamp_millis(),
                ends_at_millis: ends_at.timestamp_millis(),
            },
            is_clickable,
            display_title,
            program: Some(program),
        }
    }

    pub fn duration_millis(&self) -> i64 {
        self.ends_at_millis - self.starts_at_millis
    }

    /// Pixel width of this entry in the grid.
    pub fn width(&self, converter: &PixelConverter) -> i32 {
        converter.span_to_pixel(self.starts_at_millis, self.ends_at_millis)
    }

    /// A gap is an entry without an associated programme.
    pub fn is_gap(&self) -> bool {
        self.program.is_none()
    }

    /// Whether `now` falls within this entry's interval.
    pub fn is_current_program_at(&self, now_millis: i64) -> bool {
        self.starts_at_millis <= now_millis && now_millis < self.ends_at_millis
    }

    /// Whether the wall clock falls within this entry's interval.
    pub fn is_current_program(&self) -> bool {
        self.is_current_program_at(Utc::now().timestamp_millis())
    }
}
