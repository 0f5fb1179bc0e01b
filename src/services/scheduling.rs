//! Delayed-callback scheduling.
//!
//! The guide never spawns threads or timers itself. Time-based behavior
//! (synthetic focus advances, the "now" indicator tick) is expressed against
//! the [`DelayScheduler`] trait; the embedding platform implements it on its
//! own event loop and cancels tasks deterministically on teardown.

use crate::services::navigation::VerticalDirection;

/// Handle identifying a scheduled task, used for cancellation.
pub type TaskHandle = u64;

/// A callback the guide wants executed after a delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideTask {
    /// Perform one single-step focus move in the given direction.
    MoveFocus(VerticalDirection),
    /// Re-read the wall clock and reposition the "now" indicator.
    RefreshNowIndicator,
}

/// Posts delayed callbacks onto the embedding platform's event loop.
///
/// Implementations must execute each task at most once and must drop a task
/// when it is cancelled before firing.
pub trait DelayScheduler {
    fn schedule(&mut self, delay_ms: i64, task: GuideTask) -> TaskHandle;
    fn cancel(&mut self, handle: TaskHandle);
}

/// In-memory scheduler for testing and development.
///
/// Tasks are held with their due times and released in due order when time
/// is advanced manually.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now_ms: i64,
    next_handle: TaskHandle,
    queue: Vec<(TaskHandle, i64, GuideTask)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> i64 {
        self.now_ms
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Advance the clock and return the tasks that came due, ordered by due
    /// time.
    pub fn advance(&mut self, delta_ms: i64) -> Vec<GuideTask> {
        self.now_ms += delta_ms;
        let now = self.now_ms;
        let mut due: Vec<(TaskHandle, i64, GuideTask)> = Vec::new();
        self.queue.retain(|entry| {
            if entry.1 <= now {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|entry| entry.1);
        due.into_iter().map(|entry| entry.2).collect()
    }
}

impl DelayScheduler for ManualScheduler {
    fn schedule(&mut self, delay_ms: i64, task: GuideTask) -> TaskHandle {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.queue.push((handle, self.now_ms + delay_ms, task));
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) {
        self.queue.retain(|entry| entry.0 != handle);
    }
}

/// Repeating tick driving the "now" indicator refresh.
///
/// The tick is cancelled on pause/teardown and restarted on resume. A
/// pending tick is always cancelled before a new one is scheduled, so a
/// stop/start pair can never leave two ticks in flight.
#[derive(Debug)]
pub struct NowIndicatorTicker {
    interval_ms: i64,
    token: Option<TaskHandle>,
}

impl NowIndicatorTicker {
    pub fn new(interval_ms: i64) -> Self {
        NowIndicatorTicker {
            interval_ms,
            token: None,
        }
    }

    /// Start ticking; the first refresh fires immediately.
    pub fn start(&mut self, scheduler: &mut dyn DelayScheduler) {
        self.stop(scheduler);
        self.token = Some(scheduler.schedule(0, GuideTask::RefreshNowIndicator));
    }

    /// Re-arm after a tick has fired. Call from the task execution site.
    pub fn on_tick(&mut self, scheduler: &mut dyn DelayScheduler) {
        self.stop(scheduler);
        self.token = Some(scheduler.schedule(self.interval_ms, GuideTask::RefreshNowIndicator));
    }

    /// Cancel the pending tick, if any.
    pub fn stop(&mut self, scheduler: &mut dyn DelayScheduler) {
        if let Some(token) = self.token.take() {
            scheduler.cancel(token);
        }
    }

    pub fn is_running(&self) -> bool {
        self.token.is_some()
    }
}
