// ============================================================================
// JSON Feed Parsing
// ============================================================================
//
// These functions provide string-based parsing of a raw guide feed: the
// channel list plus per-channel schedule entries, as exported by an upstream
// EPG source. Entries may omit boundary times; absent values map to the
// sentinels the reconciliation engine treats as "unknown start" and
// "infinite end".

use anyhow::{Context, Result};
use std::collections::HashMap;

use crate::api::{ChannelId, ScheduleId};
use crate::models::channel::Channel;
use crate::models::schedule::{OriginalTimes, Schedule};

/// Validation failures of a guide feed document.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("missing required 'channels' field")]
    MissingChannels,
    #[error("duplicate channel id '{0}' in feed")]
    DuplicateChannel(String),
}

#[derive(serde::Deserialize)]
struct FeedInput {
    channels: Vec<FeedChannel>,
    #[serde(default)]
    entries: HashMap<String, Vec<FeedEntry>>,
}

#[derive(serde::Deserialize)]
struct FeedChannel {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    image_url: Option<String>,
}

#[derive(serde::Deserialize)]
struct FeedEntry {
    id: i64,
    #[serde(default)]
    starts_at_millis: Option<i64>,
    #[serde(default)]
    ends_at_millis: Option<i64>,
    #[serde(default = "default_clickable")]
    is_clickable: bool,
    #[serde(default)]
    display_title: Option<String>,
    #[serde(default)]
    program: Option<serde_json::Value>,
}

fn default_clickable() -> bool {
    true
}

/// A parsed raw feed, ready to hand to `GuideManager::set_data`.
#[derive(Debug, Clone)]
pub struct GuideFeed {
    pub channels: Vec<Channel>,
    pub entries_by_channel: HashMap<ChannelId, Vec<Schedule<serde_json::Value>>>,
}

fn validate_feed(feed_json: &str) -> Result<()> {
    let value: serde_json::Value = serde_json::from_str(feed_json).context("Invalid feed JSON")?;
    let has_channels = value
        .as_object()
        .and_then(|obj| obj.get("channels"))
        .is_some();
    if !has_channels {
        return Err(FeedError::MissingChannels.into());
    }
    Ok(())
}

/// Parse a guide feed from a JSON string.
///
/// Entries without a start map to 0 ("unknown start") and entries without an
/// end map to `i64::MAX` ("infinite end"); the reconciliation engine clips
/// both against the display-day window.
///
/// # Arguments
///
/// * `feed_json` - Feed JSON with a `channels` array and an `entries` map
///   keyed by channel id
///
/// # Returns
///
/// A `GuideFeed` with channels in feed order and per-channel entries sorted
/// by start time.
pub fn parse_guide_feed_json_str(feed_json: &str) -> Result<GuideFeed> {
    validate_feed(feed_json)?;

    let input: FeedInput =
        serde_json::from_str(feed_json).context("Failed to deserialize feed JSON using Serde")?;

    let mut channels = Vec::with_capacity(input.channels.len());
    for channel in &input.channels {
        if channels.iter().any(|c: &Channel| c.id.as_str() == channel.id) {
            return Err(FeedError::DuplicateChannel(channel.id.clone()).into());
        }
        channels.push(Channel::new(
            channel.id.as_str(),
            channel.name.as_str(),
            channel.image_url.clone(),
        ));
    }

    let mut entries_by_channel = HashMap::with_capacity(input.entries.len());
    for (channel_id, raw_entries) in input.entries {
        let mut entries: Vec<Schedule<serde_json::Value>> = raw_entries
            .into_iter()
            .map(|entry| {
                let starts_at_millis = entry.starts_at_millis.unwrap_or(0);
                let ends_at_millis = entry.ends_at_millis.unwrap_or(i64::MAX);
                Schedule {
                    id: ScheduleId::new(entry.id),
                    starts_at_millis,
                    ends_at_millis,
                    original_times: OriginalTimes {
                        starts_at_millis,
                        ends_at_millis,
                    },
                    is_clickable: entry.is_clickable,
                    display_title: entry.display_title,
                    program: entry.program,
                }
            })
            .collect();
        entries.sort_by_key(|entry| entry.starts_at_millis);
        entries_by_channel.insert(ChannelId::new(channel_id), entries);
    }

    Ok(GuideFeed {
        channels,
        entries_by_channel,
    })
}
