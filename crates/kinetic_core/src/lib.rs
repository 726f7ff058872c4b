//! Kinetic Core
//!
//! The host environment the animation toolkit rides on:
//!
//! - **Clock**: a virtual millisecond clock advanced by the event loop
//! - **Timers**: cancellable delay and interval timers
//! - **Frames**: per-frame callbacks scheduled before the next refresh
//! - **Visibility**: threshold-based observation of laid-out regions
//! - **Viewport**: scroll and resize notifications with measured positions
//! - **Task handles**: every registration is owned and released on drop
//!
//! Everything runs on one execution context. Callbacks are deferred and run
//! from [`HostScheduler::advance`], [`HostScheduler::scroll_to`] or
//! [`HostScheduler::resize`].

pub mod events;
pub mod geometry;
pub mod host;
pub mod task;

pub use events::{IntersectionEntry, Viewport, ViewportEvent, ViewportEventKind};
pub use geometry::{Point, Rect, Size};
pub use host::{
    FrameId, HostHandle, HostScheduler, ListenerId, ObserverId, RegionId, TimerId, MIN_INTERVAL_MS,
};
pub use task::{Task, TaskHandle};
