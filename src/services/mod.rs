//! Service layer for the guide core.
//!
//! This module contains the reconciliation engine, the guide manager that
//! owns viewport and schedule state, the focus/navigation logic driven by
//! directional input, and the scheduling primitives used for delayed
//! callbacks.

pub mod focus;
pub mod manager;
pub mod navigation;
pub mod reconcile;
pub mod repeat_key;
pub mod scheduling;
pub mod timeline;

pub use focus::{select_focus_target, FocusCandidate, FocusTracker};
pub use manager::{GuideListener, GuideManager, ListenerHandle};
pub use navigation::{horizontal_focus_search, vertical_move};
pub use reconcile::{reconcile, ReconcileOutcome};
pub use scheduling::{DelayScheduler, ManualScheduler, NowIndicatorTicker};
pub use timeline::best_programme_jump_target;

#[cfg(test)]
mod reconcile_tests;
