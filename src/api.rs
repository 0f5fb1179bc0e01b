//! Public API surface for the guide core.
//!
//! This file consolidates the identifier newtypes and re-exports the types a
//! rendering layer needs. All types derive Serialize/Deserialize for JSON
//! serialization.

pub use crate::config::GuideConfig;
pub use crate::models::channel::Channel;
pub use crate::models::feed::{parse_guide_feed_json_str, GuideFeed};
pub use crate::models::geometry::{PixelConverter, PixelRange};
pub use crate::models::schedule::{OriginalTimes, Schedule};
pub use crate::models::time::TimelineWindow;
pub use crate::services::focus::{FocusCandidate, FocusTracker};
pub use crate::services::manager::{GuideListener, GuideManager, ListenerHandle};
pub use crate::services::navigation::{HorizontalDirection, HorizontalMove, VerticalDirection, VerticalMove};
pub use crate::services::repeat_key::{KeyAction, KeyEvent, RepeatedKeyAccelerator};
pub use crate::services::scheduling::{DelayScheduler, GuideTask, ManualScheduler, TaskHandle};
pub use crate::services::timeline::TimeOfDay;

use serde::{Deserialize, Serialize};

/// Schedule entry identifier. Unique across all schedules fed to the guide.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScheduleId(pub i64);

impl ScheduleId {
    /// Identifier reserved for synthetic gap entries.
    pub const GAP: ScheduleId = ScheduleId(-1);

    pub fn new(value: i64) -> Self {
        ScheduleId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Channel identifier. Only used for identification purposes; must be unique
/// within one guide.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub String);

impl ChannelId {
    pub fn new(value: impl Into<String>) -> Self {
        ChannelId(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ScheduleId> for i64 {
    fn from(id: ScheduleId) -> Self {
        id.0
    }
}

impl From<&str> for ChannelId {
    fn from(value: &str) -> Self {
        ChannelId(value.to_string())
    }
}

impl From<String> for ChannelId {
    fn from(value: String) -> Self {
        ChannelId(value)
    }
}
