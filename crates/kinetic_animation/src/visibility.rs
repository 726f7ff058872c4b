//! One-shot visibility trigger
//!
//! Watches a region and fires its callback the first time the region's
//! visible fraction reaches the threshold. After firing, the observation is
//! released immediately, so later scrolling never re-fires it.

use crate::error::{AnimationError, Result};
use crate::lock;
use kinetic_core::{HostHandle, IntersectionEntry, RegionId, TaskHandle};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Fraction of the region that must be on screen before triggering
pub const DEFAULT_THRESHOLD: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    pub threshold: f32,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl TriggerConfig {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn validate(&self) -> Result<()> {
        if (0.0..=1.0).contains(&self.threshold) {
            Ok(())
        } else {
            Err(AnimationError::InvalidThreshold(self.threshold))
        }
    }
}

struct TriggerState {
    triggered: bool,
    observer: Option<TaskHandle>,
}

/// Latch that flips once when its target becomes visible
///
/// Dropping the trigger releases the observation if it has not fired yet.
pub struct VisibilityTrigger {
    state: Arc<Mutex<TriggerState>>,
}

impl VisibilityTrigger {
    /// Start observing `target`
    ///
    /// A `None` target is never observed and never fires.
    pub fn observe<F>(
        host: &HostHandle,
        target: Option<RegionId>,
        config: TriggerConfig,
        on_visible: F,
    ) -> Result<Self>
    where
        F: FnOnce(&IntersectionEntry) + Send + 'static,
    {
        config.validate()?;

        let state = Arc::new(Mutex::new(TriggerState {
            triggered: false,
            observer: None,
        }));

        let Some(target) = target else {
            debug!("visibility trigger: no target, observation skipped");
            return Ok(Self { state });
        };

        let weak = Arc::downgrade(&state);
        let mut on_visible = Some(on_visible);
        let observer = host.observe(target, config.threshold, move |entry| {
            if !entry.is_intersecting {
                return;
            }
            let Some(state) = weak.upgrade() else {
                return;
            };
            let observer = {
                let mut state = lock(&state);
                if state.triggered {
                    return;
                }
                state.triggered = true;
                state.observer.take()
            };
            drop(observer);

            debug!(
                "visibility trigger: {:?} fired at {:.0}ms (ratio {:.2})",
                entry.target, entry.time_ms, entry.ratio
            );
            if let Some(callback) = on_visible.take() {
                callback(entry);
            }
        });

        lock(&state).observer = Some(observer);
        Ok(Self { state })
    }

    /// Whether the target has been seen
    pub fn is_triggered(&self) -> bool {
        lock(&self.state).triggered
    }

    /// Whether the observation is still registered with the host
    pub fn is_observing(&self) -> bool {
        lock(&self.state)
            .observer
            .as_ref()
            .is_some_and(TaskHandle::is_pending)
    }

    /// Stop observing without firing
    pub fn disconnect(&self) {
        let observer = lock(&self.state).observer.take();
        drop(observer);
    }
}

impl std::fmt::Debug for VisibilityTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityTrigger")
            .field("triggered", &self.is_triggered())
            .field("observing", &self.is_observing())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinetic_core::{HostScheduler, Rect};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn frame(host: &HostScheduler) {
        host.advance(Duration::from_millis(16));
    }

    #[test]
    fn test_fires_once_on_repeated_visibility() {
        let host = HostScheduler::new();
        host.set_document_height(4000.0);
        let region = host.insert_region(Rect::new(0.0, 1200.0, 400.0, 200.0));
        let fired = Arc::new(AtomicUsize::new(0));

        let count = fired.clone();
        let trigger = VisibilityTrigger::observe(
            &host.handle(),
            Some(region),
            TriggerConfig::default(),
            move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            },
        )
        .unwrap();

        frame(&host);
        assert!(!trigger.is_triggered());
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        for _ in 0..3 {
            host.scroll_to(0.0, 1000.0);
            frame(&host);
            host.scroll_to(0.0, 0.0);
            frame(&host);
        }

        assert!(trigger.is_triggered());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!trigger.is_observing());
        assert_eq!(host.observer_count(), 0);
    }

    #[test]
    fn test_threshold_must_be_reached() {
        let host = HostScheduler::new();
        host.set_document_height(4000.0);
        // 1000px tall, only 200px on screen at scroll 0: ratio 0.2
        let region = host.insert_region(Rect::new(0.0, 600.0, 400.0, 1000.0));

        let trigger = VisibilityTrigger::observe(
            &host.handle(),
            Some(region),
            TriggerConfig::new(0.5),
            |_| {},
        )
        .unwrap();

        frame(&host);
        assert!(!trigger.is_triggered());

        host.scroll_to(0.0, 400.0);
        frame(&host);
        assert!(trigger.is_triggered());
    }

    #[test]
    fn test_missing_target_is_skipped() {
        let host = HostScheduler::new();
        let trigger =
            VisibilityTrigger::observe(&host.handle(), None, TriggerConfig::default(), |_| {
                panic!("must not fire")
            })
            .unwrap();

        frame(&host);
        assert!(!trigger.is_triggered());
        assert_eq!(host.registration_count(), 0);
    }

    #[test]
    fn test_drop_before_visible_releases_observer() {
        let host = HostScheduler::new();
        let region = host.insert_region(Rect::new(0.0, 0.0, 10.0, 10.0));
        let trigger = VisibilityTrigger::observe(
            &host.handle(),
            Some(region),
            TriggerConfig::default(),
            |_| panic!("must not fire"),
        )
        .unwrap();

        assert_eq!(host.observer_count(), 1);
        drop(trigger);
        assert_eq!(host.observer_count(), 0);
        frame(&host);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let host = HostScheduler::new();
        let result =
            VisibilityTrigger::observe(&host.handle(), None, TriggerConfig::new(1.5), |_| {});
        assert_eq!(result.err(), Some(AnimationError::InvalidThreshold(1.5)));
    }
}
