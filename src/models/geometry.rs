//! Pixel geometry of the grid.
//!
//! The guide positions cells by converting time spans to pixel widths with a
//! fixed pixels-per-hour scale. The converter is passed around explicitly;
//! there is no process-wide scale.

use serde::{Deserialize, Serialize};

use crate::models::time::HOUR_IN_MILLIS;

/// Converts between milliseconds and grid pixels for a fixed hour width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelConverter {
    width_per_hour: i32,
}

impl PixelConverter {
    /// Create a converter for the given hour width in pixels. The width must
    /// be positive.
    pub fn new(width_per_hour: i32) -> Self {
        PixelConverter { width_per_hour }
    }

    pub fn width_per_hour(&self) -> i32 {
        self.width_per_hour
    }

    /// Pixel width corresponding to a duration.
    pub fn millis_to_pixel(&self, millis: i64) -> i32 {
        (millis * i64::from(self.width_per_hour) / HOUR_IN_MILLIS) as i32
    }

    /// Pixel width of the span `[start_millis, end_millis)`. Both endpoints
    /// are converted first so rounding errors do not accumulate.
    pub fn span_to_pixel(&self, start_millis: i64, end_millis: i64) -> i32 {
        self.millis_to_pixel(end_millis) - self.millis_to_pixel(start_millis)
    }

    /// Time corresponding to the given pixel distance in the grid.
    pub fn pixel_to_millis(&self, pixel: i32) -> i64 {
        i64::from(pixel) * HOUR_IN_MILLIS / i64::from(self.width_per_hour)
    }
}

/// A horizontal pixel interval `[left, right]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRange {
    pub left: i32,
    pub right: i32,
}

impl PixelRange {
    pub fn new(left: i32, right: i32) -> Self {
        PixelRange { left, right }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Whether `other` lies entirely within this range.
    pub fn contains(&self, other: &PixelRange) -> bool {
        self.left <= other.left && other.right <= self.right
    }
}
