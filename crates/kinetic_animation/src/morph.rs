//! Cyclic content switcher
//!
//! Shows one item of a fixed sequence at a time and advances to the next on
//! a repeating interval, wrapping around indefinitely.

use crate::error::{AnimationError, Result};
use crate::lock;
use crate::presentation::Presentation;
use kinetic_core::{HostHandle, TaskHandle};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

pub const DEFAULT_MORPH_INTERVAL_MS: u32 = 3000;

/// Scale applied to slots that are not active
pub const INACTIVE_SCALE: f32 = 0.95;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphConfig {
    pub interval_ms: u32,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_MORPH_INTERVAL_MS,
        }
    }
}

impl MorphConfig {
    pub fn new(interval_ms: u32) -> Self {
        Self { interval_ms }
    }
}

struct CycleState {
    active: usize,
    len: usize,
    cycles: u64,
}

/// Cycles through `items`, one active at a time
pub struct Morphing<T> {
    items: Vec<T>,
    state: Arc<Mutex<CycleState>>,
    _interval: TaskHandle,
}

impl<T> Morphing<T> {
    pub fn mount(host: &HostHandle, items: Vec<T>, config: MorphConfig) -> Result<Self> {
        if items.is_empty() {
            return Err(AnimationError::EmptySequence);
        }
        if config.interval_ms == 0 {
            return Err(AnimationError::ZeroInterval);
        }

        let state = Arc::new(Mutex::new(CycleState {
            active: 0,
            len: items.len(),
            cycles: 0,
        }));

        let weak = Arc::downgrade(&state);
        let interval = host.set_interval(config.interval_ms, move || {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let mut state = lock(&state);
            state.active = (state.active + 1) % state.len;
            if state.active == 0 {
                state.cycles += 1;
            }
            trace!("morphing: active slot {}", state.active);
        });
        debug!(
            "morphing: cycling {} items every {}ms",
            items.len(),
            config.interval_ms
        );

        Ok(Self {
            items,
            state,
            _interval: interval,
        })
    }

    pub fn active_index(&self) -> usize {
        lock(&self.state).active
    }

    pub fn active(&self) -> &T {
        &self.items[self.active_index()]
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Completed passes through the whole sequence
    pub fn cycles(&self) -> u64 {
        lock(&self.state).cycles
    }

    /// Presentation for slot `index`: full for the active slot, faded and shrunk otherwise
    pub fn slot_presentation(&self, index: usize) -> Presentation {
        if index == self.active_index() {
            Presentation::IDENTITY
        } else {
            Presentation {
                opacity: 0.0,
                scale: INACTIVE_SCALE,
                ..Presentation::IDENTITY
            }
        }
    }

    pub fn presentations(&self) -> Vec<Presentation> {
        (0..self.items.len())
            .map(|index| self.slot_presentation(index))
            .collect()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Morphing<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Morphing")
            .field("active", &self.active())
            .field("len", &self.items.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinetic_core::HostScheduler;
    use std::time::Duration;

    #[test]
    fn test_cycles_through_items() {
        let host = HostScheduler::new();
        let shapes = Morphing::mount(
            &host.handle(),
            vec!["circle", "square", "triangle"],
            MorphConfig::default(),
        )
        .unwrap();

        let mut seen = vec![shapes.active_index()];
        for _ in 0..3 {
            host.advance(Duration::from_millis(3000));
            seen.push(shapes.active_index());
        }
        assert_eq!(seen, vec![0, 1, 2, 0]);
        assert_eq!(*shapes.active(), "circle");
        assert_eq!(shapes.cycles(), 1);
    }

    #[test]
    fn test_single_item_stays_active() {
        let host = HostScheduler::new();
        let single = Morphing::mount(&host.handle(), vec![7], MorphConfig::new(100)).unwrap();
        for _ in 0..10 {
            host.advance(Duration::from_millis(100));
            assert_eq!(single.active_index(), 0);
        }
    }

    #[test]
    fn test_slot_presentations() {
        let host = HostScheduler::new();
        let morph = Morphing::mount(&host.handle(), vec!['a', 'b'], MorphConfig::new(10)).unwrap();
        host.advance(Duration::from_millis(10));

        let slots = morph.presentations();
        assert_eq!(slots[1], Presentation::IDENTITY);
        assert_eq!(slots[0].opacity, 0.0);
        assert_eq!(slots[0].scale, INACTIVE_SCALE);
    }

    #[test]
    fn test_rejects_bad_config() {
        let host = HostScheduler::new();
        assert_eq!(
            Morphing::<u8>::mount(&host.handle(), Vec::new(), MorphConfig::default()).err(),
            Some(AnimationError::EmptySequence)
        );
        assert_eq!(
            Morphing::mount(&host.handle(), vec![1], MorphConfig::new(0)).err(),
            Some(AnimationError::ZeroInterval)
        );
        assert_eq!(host.registration_count(), 0);
    }

    #[test]
    fn test_drop_stops_interval() {
        let host = HostScheduler::new();
        let morph = Morphing::mount(&host.handle(), vec![1, 2], MorphConfig::new(50)).unwrap();
        assert_eq!(host.timer_count(), 1);
        drop(morph);
        assert_eq!(host.timer_count(), 0);
        assert!(!host.advance(Duration::from_millis(500)));
    }
}
