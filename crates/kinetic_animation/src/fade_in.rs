//! Entrance transition for a wrapped element
//!
//! The element starts transparent and displaced, then fades and slides into
//! place once its region is first seen.

use crate::easing::Easing;
use crate::error::{AnimationError, Result};
use crate::lock;
use crate::presentation::Presentation;
use crate::visibility::{TriggerConfig, VisibilityTrigger};
use kinetic_core::{HostHandle, RegionId, TaskHandle};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::debug;

pub const DEFAULT_FADE_DURATION_MS: u32 = 700;
pub const DEFAULT_FADE_DISTANCE: f32 = 32.0;

/// Direction the element travels while entering
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FadeDirection {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl FadeDirection {
    /// Hidden displacement for a travel distance
    ///
    /// Moving up means starting below, so `Up` yields a positive y offset.
    pub fn hidden_offset(self, distance: f32) -> (f32, f32) {
        match self {
            FadeDirection::Up => (0.0, distance),
            FadeDirection::Down => (0.0, -distance),
            FadeDirection::Left => (distance, 0.0),
            FadeDirection::Right => (-distance, 0.0),
        }
    }
}

impl FromStr for FadeDirection {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "up" => Ok(FadeDirection::Up),
            "down" => Ok(FadeDirection::Down),
            "left" => Ok(FadeDirection::Left),
            "right" => Ok(FadeDirection::Right),
            _ => Err(AnimationError::unknown(
                "direction",
                s,
                "up, down, left, right",
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeInConfig {
    pub direction: FadeDirection,
    /// Wait after the trigger before the transition starts
    pub delay_ms: u32,
    pub duration_ms: u32,
    pub distance: f32,
    pub easing: Easing,
    pub trigger: TriggerConfig,
}

impl Default for FadeInConfig {
    fn default() -> Self {
        Self {
            direction: FadeDirection::Up,
            delay_ms: 0,
            duration_ms: DEFAULT_FADE_DURATION_MS,
            distance: DEFAULT_FADE_DISTANCE,
            easing: Easing::EaseOut,
            trigger: TriggerConfig::default(),
        }
    }
}

impl FadeInConfig {
    pub fn new(direction: FadeDirection) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }

    pub fn delay_ms(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn duration_ms(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn distance(mut self, distance: f32) -> Self {
        self.distance = distance;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.trigger.threshold = threshold;
        self
    }

    fn hidden(&self) -> Presentation {
        let (dx, dy) = self.direction.hidden_offset(self.distance);
        Presentation::hidden(dx, dy)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum FadePhase {
    Hidden,
    Delayed,
    Shown { start_ms: f64 },
}

struct FadeState {
    phase: FadePhase,
    delay: Option<TaskHandle>,
}

/// Wrapper that fades its content in when scrolled into view
pub struct FadeInView {
    host: HostHandle,
    config: FadeInConfig,
    state: Arc<Mutex<FadeState>>,
    trigger: VisibilityTrigger,
}

impl FadeInView {
    pub fn mount(
        host: &HostHandle,
        target: Option<RegionId>,
        config: FadeInConfig,
    ) -> Result<Self> {
        let state = Arc::new(Mutex::new(FadeState {
            phase: FadePhase::Hidden,
            delay: None,
        }));

        let weak = Arc::downgrade(&state);
        let timers = host.clone();
        let delay_ms = config.delay_ms;
        let trigger = VisibilityTrigger::observe(host, target, config.trigger, move |entry| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let mut guard = lock(&state);
            if guard.phase != FadePhase::Hidden {
                return;
            }
            if delay_ms == 0 {
                guard.phase = FadePhase::Shown {
                    start_ms: entry.time_ms,
                };
                debug!("fade-in: shown at {:.0}ms", entry.time_ms);
                return;
            }

            guard.phase = FadePhase::Delayed;
            let delayed = Arc::downgrade(&state);
            let clock = timers.clone();
            guard.delay = Some(timers.set_timeout(delay_ms, move || {
                let Some(state) = delayed.upgrade() else {
                    return;
                };
                let start_ms = clock.now_ms().unwrap_or_default();
                let mut guard = lock(&state);
                guard.phase = FadePhase::Shown { start_ms };
                guard.delay = None;
                debug!("fade-in: shown at {:.0}ms after delay", start_ms);
            }));
        })?;

        Ok(Self {
            host: host.clone(),
            config,
            state,
            trigger,
        })
    }

    /// Whether the entrance has started
    pub fn is_visible(&self) -> bool {
        matches!(lock(&self.state).phase, FadePhase::Shown { .. })
    }

    pub fn is_triggered(&self) -> bool {
        self.trigger.is_triggered()
    }

    /// Transition progress after easing, 0.0 while hidden
    pub fn progress(&self) -> f32 {
        let FadePhase::Shown { start_ms } = lock(&self.state).phase else {
            return 0.0;
        };
        if self.config.duration_ms == 0 {
            return 1.0;
        }
        let now_ms = self.host.now_ms().unwrap_or(start_ms);
        let t = (now_ms - start_ms) / f64::from(self.config.duration_ms);
        self.config.easing.apply(t) as f32
    }

    /// Whether the entrance transition has fully played
    pub fn is_settled(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Opacity and offset to render at the current host time
    pub fn presentation(&self) -> Presentation {
        self.config
            .hidden()
            .lerp(&Presentation::IDENTITY, self.progress())
    }

    pub fn config(&self) -> &FadeInConfig {
        &self.config
    }
}

impl std::fmt::Debug for FadeInView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FadeInView")
            .field("direction", &self.config.direction)
            .field("visible", &self.is_visible())
            .field("progress", &self.progress())
            .finish()
    }
}
