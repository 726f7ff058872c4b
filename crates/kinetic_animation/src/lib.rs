//! Kinetic Animation
//!
//! Viewport-triggered motion primitives for dashboard pages:
//!
//! - **Visibility trigger**: one-shot latch when a region is first seen
//! - **Counter**: eased count-up to a target value
//! - **Typewriter**: character-by-character text reveal
//! - **Fade-in view**: directional entrance transition
//! - **Parallax**: scroll-linked offset
//! - **Morphing**: cyclic content switcher
//! - **Staggered list**: sequential item reveal
//! - **Scroll progress**: reading-position indicator
//!
//! Components ride on a [`kinetic_core::HostHandle`] and own every
//! registration they make. Dropping a component cancels all of its pending
//! work.
//!
//! # Example
//!
//! ```ignore
//! use kinetic_animation::{Counter, CounterConfig};
//! use kinetic_core::{HostScheduler, Rect};
//! use std::time::Duration;
//!
//! let host = HostScheduler::new();
//! let card = host.insert_region(Rect::new(0.0, 120.0, 320.0, 160.0));
//! let headcount = Counter::mount(&host.handle(), Some(card), CounterConfig::new(1250))?;
//!
//! while host.advance(Duration::from_millis(16)) {}
//! assert_eq!(headcount.value(), 1250);
//! ```

pub mod counter;
pub mod easing;
pub mod error;
pub mod fade_in;
pub mod morph;
pub mod parallax;
pub mod presentation;
pub mod scroll_progress;
pub mod stagger;
pub mod style;
pub mod typewriter;
pub mod visibility;

pub use counter::{counter_value, Counter, CounterConfig};
pub use easing::Easing;
pub use error::{AnimationError, Result};
pub use fade_in::{FadeDirection, FadeInConfig, FadeInView};
pub use morph::{MorphConfig, Morphing};
pub use parallax::{parallax_offset, Parallax, ParallaxConfig};
pub use presentation::Presentation;
pub use scroll_progress::{scroll_fraction, ScrollProgress};
pub use stagger::{StaggerConfig, StaggerOrder, StaggeredList};
pub use style::{Accent, GlowStyle, Intensity, Rgba};
pub use typewriter::{RevealPhase, Typewriter, TypewriterConfig};
pub use visibility::{TriggerConfig, VisibilityTrigger};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock component state, recovering from a poisoned mutex
pub(crate) fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
