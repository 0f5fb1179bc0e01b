//! Channel entity.

use serde::{Deserialize, Serialize};

use crate::api::ChannelId;

/// A channel which may be associated with multiple programmes; one row of
/// the grid. Channels are displayed with an optional image and a name; the
/// id must be unique within the guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
    pub image_url: Option<String>,
}

impl Channel {
    pub fn new(id: impl Into<ChannelId>, name: impl Into<String>, image_url: Option<String>) -> Self {
        Channel {
            id: id.into(),
            name: name.into(),
            image_url,
        }
    }
}
