//! Held-key focus acceleration.
//!
//! Some platforms repeat held directional keys too slowly to traverse a long
//! channel list. Once a key has been held past a threshold, extra synthetic
//! focus advances are scheduled between the native repeats, spread over the
//! observed repeat interval. Any new key event cancels the advances still
//! pending.

use crate::config::GuideConfig;
use crate::services::navigation::VerticalDirection;
use crate::services::scheduling::{DelayScheduler, GuideTask, TaskHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
}

/// A directional key event as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub action: KeyAction,
    /// The vertical direction of the key, or None for any other key.
    pub direction: Option<VerticalDirection>,
    /// When this event was generated.
    pub event_time_ms: i64,
    /// When the key was first pressed.
    pub down_time_ms: i64,
    /// Number of native repeats so far for a held key.
    pub repeat_count: u32,
    pub is_canceled: bool,
}

impl KeyEvent {
    /// How long the key has been held at this event.
    pub fn hold_duration_ms(&self) -> i64 {
        self.event_time_ms - self.down_time_ms
    }
}

/// State machine making focus change faster over time while a directional
/// key stays held.
#[derive(Debug)]
pub struct RepeatedKeyAccelerator {
    thresholds_ms: [i64; 2],
    max_skipped: [usize; 2],
    pending: Vec<TaskHandle>,
    focus_accelerated: bool,
    repeated_key_interval_ms: i64,
}

impl RepeatedKeyAccelerator {
    pub fn new(config: &GuideConfig) -> Self {
        RepeatedKeyAccelerator {
            thresholds_ms: config.fast_focus_thresholds_ms,
            max_skipped: config.max_skipped_rows,
            pending: Vec::new(),
            focus_accelerated: false,
            repeated_key_interval_ms: 0,
        }
    }

    /// Whether focus movement is currently accelerated. The rendering layer
    /// uses this to keep the focused row near a fixed screen position while
    /// rows fly by.
    pub fn is_focus_accelerated(&self) -> bool {
        self.focus_accelerated
    }

    /// Feed a key event through the accelerator. Synthetic
    /// [`GuideTask::MoveFocus`] advances are scheduled when the key has been
    /// held long enough; pending advances are cancelled first on every
    /// event.
    pub fn on_key_event(&mut self, event: &KeyEvent, scheduler: &mut dyn DelayScheduler) {
        self.cancel_pending(scheduler);
        let direction = match event.direction {
            Some(direction) => direction,
            None => return,
        };

        let duration = event.hold_duration_ms();
        if duration < self.thresholds_ms[0] || event.is_canceled {
            self.focus_accelerated = false;
            return;
        }

        let mut skipped_count = self.max_skipped[0];
        for i in 1..self.thresholds_ms.len() {
            if self.thresholds_ms[i] < duration {
                skipped_count = self.max_skipped[i];
            } else {
                break;
            }
        }

        match event.action {
            KeyAction::Down => {
                self.repeated_key_interval_ms = duration / i64::from(event.repeat_count.max(1));
                self.focus_accelerated = true;
            }
            KeyAction::Up => {
                // The advances below still run after release; without the
                // catch-up the focused row would stop short of the position
                // the held key was aiming for.
                self.focus_accelerated = false;
            }
        }

        for i in 0..skipped_count {
            let delay = self.repeated_key_interval_ms * i as i64 / (skipped_count as i64 + 1);
            self.pending
                .push(scheduler.schedule(delay, GuideTask::MoveFocus(direction)));
        }
    }

    /// Cancel all pending synthetic advances.
    pub fn cancel_pending(&mut self, scheduler: &mut dyn DelayScheduler) {
        for handle in self.pending.drain(..) {
            scheduler.cancel(handle);
        }
    }
}
