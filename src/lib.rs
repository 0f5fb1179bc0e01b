//! # EPG Rust Core
//!
//! Engine for an "electronic program guide" grid: a scrollable table of TV
//! channels against time, with a horizontally scrolling viewport and
//! directional-pad focus navigation.
//!
//! This crate contains only the algorithmic core. A rendering layer (TV app,
//! TUI, web frontend) feeds it raw schedule data and input events, and reads
//! back the visible window, per-channel entries and focus decisions. No
//! drawing, image loading or platform lifecycle code lives here.
//!
//! ## Features
//!
//! - **Timeline reconciliation**: normalizes raw, possibly overlapping or
//!   gapped schedule feeds into contiguous, minimum-duration-respecting
//!   per-channel timelines clipped to a display day
//! - **Viewport control**: a bounded, fixed-width visible time window with
//!   shift/jump operations and change notifications
//! - **Focus navigation**: geometric best-candidate selection for vertical
//!   movement, viewport-aware horizontal movement, wraparound, and a
//!   held-key accelerator
//! - **Presentation queries**: timeline-row alignment, "now" indicator
//!   offset, time-of-day filtering and scroll restoration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: identifier newtypes and the consolidated public surface
//! - [`config`]: guide tunables with TOML loading
//! - [`models`]: entities and value types (schedules, channels, time
//!   windows, pixel geometry, feed parsing)
//! - [`services`]: the reconciliation engine, the guide manager, focus and
//!   navigation logic, and the scheduling primitives

pub mod api;
pub mod config;
pub mod models;
pub mod services;
