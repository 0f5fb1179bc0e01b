//! Guide manager.
//!
//! Owns the reconciled schedule data, the channel list and the viewport: the
//! visible `[from, to)` time window inside the scrollable
//! `[start, end]` range. All mutation happens here, on the thread that owns
//! the manager; observers are notified synchronously after each change.

use std::collections::HashMap;
use std::rc::Rc;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

use crate::api::ChannelId;
use crate::config::GuideConfig;
use crate::models::channel::Channel;
use crate::models::schedule::Schedule;
use crate::models::time::TimelineWindow;
use crate::services::reconcile::reconcile;

/// Observer of guide state changes. Notifications carry no payload; a
/// listener re-reads whatever state it needs.
pub trait GuideListener {
    /// The visible time window moved.
    fn on_time_range_updated(&self);
    /// The schedule data was replaced wholesale.
    fn on_schedules_updated(&self);
}

/// De-registration handle returned by `GuideManager::add_listener`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerHandle(u64);

/// The schedule/time-range model of the guide.
///
/// `T` is the caller's programme payload type; the guide only checks its
/// presence (absent payload = gap).
pub struct GuideManager<T> {
    config: GuideConfig,
    start_utc_millis: i64,
    end_utc_millis: i64,
    from_utc_millis: i64,
    to_utc_millis: i64,
    channels: Vec<Channel>,
    entries_by_channel: HashMap<ChannelId, Vec<Schedule<T>>>,
    listeners: Vec<(u64, Rc<dyn GuideListener>)>,
    next_listener_id: u64,
}

impl<T> GuideManager<T> {
    pub fn new(config: GuideConfig) -> Self {
        GuideManager {
            config,
            start_utc_millis: 0,
            end_utc_millis: 0,
            from_utc_millis: 0,
            to_utc_millis: 0,
            channels: Vec::new(),
            entries_by_channel: HashMap::new(),
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    pub fn config(&self) -> &GuideConfig {
        &self.config
    }

    /// Returns the start time of the currently visible time window, in UTC
    /// milliseconds.
    pub fn from_utc_millis(&self) -> i64 {
        self.from_utc_millis
    }

    /// Returns the end time of the currently visible time window, in UTC
    /// milliseconds.
    pub fn to_utc_millis(&self) -> i64 {
        self.to_utc_millis
    }

    /// Returns the start of the scrollable range set by
    /// [`GuideManager::update_initial_range`] and tightened by the data.
    pub fn start_time(&self) -> i64 {
        self.start_utc_millis
    }

    /// Returns the end of the scrollable range.
    pub fn end_time(&self) -> i64 {
        self.end_utc_millis
    }

    /// Returns how far the viewport has scrolled from the range start.
    pub fn shifted_time(&self) -> i64 {
        self.from_utc_millis - self.start_utc_millis
    }

    /// Update the initial time range to manage. This is the time window
    /// where the scroll starts.
    pub fn update_initial_range(&mut self, start_utc_millis: i64, end_utc_millis: i64) {
        self.start_utc_millis = start_utc_millis;
        if end_utc_millis > self.end_utc_millis {
            self.end_utc_millis = end_utc_millis;
        }
        self.set_time_range(start_utc_millis, end_utc_millis);
    }

    /// Jumps the viewport to a specific time.
    ///
    /// Returns true if the time was shifted; false if no change was
    /// triggered because the viewport was already there. A false result
    /// means no scroll will settle later, so a caller that defers focus
    /// moves until scrolling completes must move focus directly.
    pub fn jump_to(&mut self, time_millis: i64) -> bool {
        let time_shift = time_millis - self.from_utc_millis;
        self.shift_time(time_shift);
        time_shift != 0
    }

    /// Shifts the visible time window by the given delta, clamped so the
    /// window stays inside the scrollable range. Width is preserved; the
    /// left clamp is applied first.
    pub fn shift_time(&mut self, time_millis_to_scroll: i64) {
        let mut from_utc_millis = self.from_utc_millis + time_millis_to_scroll;
        let mut to_utc_millis = self.to_utc_millis + time_millis_to_scroll;
        // We tried to scroll before the initial start time
        if from_utc_millis < self.start_utc_millis {
            to_utc_millis += self.start_utc_millis - from_utc_millis;
            from_utc_millis = self.start_utc_millis;
        }
        // We tried to scroll over the initial end time
        if to_utc_millis > self.end_utc_millis {
            from_utc_millis -= to_utc_millis - self.end_utc_millis;
            to_utc_millis = self.end_utc_millis;
        }
        self.set_time_range(from_utc_millis, to_utc_millis);
    }

    fn set_time_range(&mut self, from_utc_millis: i64, to_utc_millis: i64) {
        if self.from_utc_millis != from_utc_millis || self.to_utc_millis != to_utc_millis {
            self.from_utc_millis = from_utc_millis;
            self.to_utc_millis = to_utc_millis;
            self.notify_time_range_updated();
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Returns the channel at the given index of the currently managed
    /// channels, or None if out of bounds.
    pub fn channel(&self, channel_index: usize) -> Option<&Channel> {
        self.channels.get(channel_index)
    }

    pub fn channel_index(&self, channel_id: &ChannelId) -> Option<usize> {
        self.channels.iter().position(|c| &c.id == channel_id)
    }

    /// Returns the number of schedules within the currently managed time
    /// range for a given channel.
    pub fn schedules_count(&self, channel_id: &ChannelId) -> usize {
        self.entries_by_channel
            .get(channel_id)
            .map_or(0, |entries| entries.len())
    }

    /// Returns the entry at `index` in the given channel's reconciled list.
    /// The returned entry can be a gap between programmes.
    pub fn schedule(&self, channel_id: &ChannelId, index: usize) -> Option<&Schedule<T>> {
        self.entries_by_channel
            .get(channel_id)?
            .get(index)
    }

    /// Returns the index of the entry at `time`, or None if not found.
    pub fn program_index_at_time(&self, channel_id: &ChannelId, time_millis: i64) -> Option<usize> {
        self.entries_by_channel.get(channel_id)?.iter().position(
            |entry| entry.starts_at_millis <= time_millis && time_millis < entry.ends_at_millis,
        )
    }

    /// Returns the programme playing now on the given channel (or the first
    /// channel when none is given).
    pub fn current_program(&self, channel_id: Option<&ChannelId>) -> Option<&Schedule<T>> {
        self.current_program_at(channel_id, Utc::now().timestamp_millis())
    }

    /// Returns the entry considered "current" at `now`: the scan keeps the
    /// last entry that has already started and returns early when that entry
    /// is still running. With a reconciled list this is the entry containing
    /// `now`; with stale data the last past-started entry wins.
    pub fn current_program_at(
        &self,
        channel_id: Option<&ChannelId>,
        now_millis: i64,
    ) -> Option<&Schedule<T>> {
        let first_channel = self.channels.first()?;
        let channel_id = channel_id.unwrap_or(&first_channel.id);
        let entries = self.entries_by_channel.get(channel_id)?;
        let mut best_match: Option<&Schedule<T>> = None;
        for schedule in entries {
            if schedule.starts_at_millis < now_millis {
                best_match = Some(schedule);
                if schedule.ends_at_millis > now_millis {
                    return Some(schedule);
                }
            }
        }
        best_match
    }

    /// Replaces all managed data, reconciles it against the display day and
    /// notifies listeners.
    pub fn set_data(
        &mut self,
        new_channels: Vec<Channel>,
        new_channel_entries: HashMap<ChannelId, Vec<Schedule<T>>>,
        selected_date: NaiveDate,
        timezone: Tz,
    ) {
        let viewport_width = self.to_utc_millis - self.from_utc_millis;
        let window = TimelineWindow::for_date(selected_date, timezone, &self.config);
        let outcome = reconcile(
            &new_channels,
            new_channel_entries,
            window,
            &self.config,
            self.from_utc_millis,
            self.to_utc_millis,
        );
        self.channels = new_channels;
        self.entries_by_channel = outcome.entries_by_channel;
        self.start_utc_millis = outcome.start_utc_millis;
        self.end_utc_millis = outcome.end_utc_millis;
        self.set_time_range(
            self.start_utc_millis,
            self.start_utc_millis + viewport_width,
        );
        self.notify_schedules_updated();
    }

    /// Registers a listener; returns the handle used to remove it.
    pub fn add_listener(&mut self, listener: Rc<dyn GuideListener>) -> ListenerHandle {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, listener));
        ListenerHandle(id)
    }

    pub fn remove_listener(&mut self, handle: ListenerHandle) {
        self.listeners.retain(|(id, _)| *id != handle.0);
    }

    fn notify_time_range_updated(&self) {
        for (_, listener) in &self.listeners {
            listener.on_time_range_updated();
        }
    }

    fn notify_schedules_updated(&self) {
        for (_, listener) in &self.listeners {
            listener.on_schedules_updated();
        }
    }
}

impl<T: Clone> GuideManager<T> {
    /// Replaces a programme in the entries based on the ID of the supplied
    /// programme. Since IDs should be unique, only the first match is
    /// replaced. Only the display fields change; the reconciled times stay.
    ///
    /// Returns the resulting programme of the replacement, or None if no
    /// replacement happened.
    pub fn update_program(&mut self, program: Schedule<T>) -> Option<Schedule<T>> {
        for entries in self.entries_by_channel.values_mut() {
            if let Some(index) = entries.iter().position(|entry| entry.id == program.id) {
                let existing = &mut entries[index];
                if existing.original_times != program.original_times {
                    log::warn!(
                        "Different times found when updating program with ID: {}. Replacement will happen, but times will not be changed.",
                        program.id
                    );
                }
                existing.is_clickable = program.is_clickable;
                existing.display_title = program.display_title;
                existing.program = program.program;
                return Some(existing.clone());
            }
        }
        None
    }
}
