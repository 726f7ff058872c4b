//! Staggered list entrance
//!
//! Items stay hidden until the list is first seen, then reveal one after
//! another. Each item gets its own timeout capturing its index, and writes
//! only its own flag.

use crate::error::Result;
use crate::lock;
use crate::presentation::Presentation;
use crate::visibility::{TriggerConfig, VisibilityTrigger};
use kinetic_core::{HostHandle, RegionId, TaskHandle};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, Weak};
use tracing::{debug, trace};

pub const DEFAULT_STAGGER_DELAY_MS: u32 = 100;
pub const DEFAULT_STAGGER_DISTANCE: f32 = 16.0;

/// Order in which items reveal
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StaggerOrder {
    /// First to last
    #[default]
    Forward,
    /// Last to first
    Reverse,
    /// Center outward
    FromCenter,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaggerConfig {
    /// Delay between consecutive items (ms)
    pub delay_ms: u32,
    pub order: StaggerOrder,
    /// Cap the stagger step so items past N reveal together
    pub limit: Option<usize>,
    /// Vertical offset of a hidden item
    pub distance: f32,
    pub trigger: TriggerConfig,
}

impl Default for StaggerConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_STAGGER_DELAY_MS,
            order: StaggerOrder::Forward,
            limit: None,
            distance: DEFAULT_STAGGER_DISTANCE,
            trigger: TriggerConfig::default(),
        }
    }
}

impl StaggerConfig {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            ..Self::default()
        }
    }

    pub fn reverse(mut self) -> Self {
        self.order = StaggerOrder::Reverse;
        self
    }

    pub fn from_center(mut self) -> Self {
        self.order = StaggerOrder::FromCenter;
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.trigger.threshold = threshold;
        self
    }

    /// Delay after the trigger before item `index` of `total` reveals
    pub fn delay_for_index(&self, index: usize, total: usize) -> u32 {
        let step = match self.order {
            StaggerOrder::Forward => index,
            StaggerOrder::Reverse => total.saturating_sub(1).saturating_sub(index),
            StaggerOrder::FromCenter => {
                let center = total / 2;
                center.abs_diff(index)
            }
        };
        let step = self.limit.map_or(step, |limit| step.min(limit));
        let step = u32::try_from(step).unwrap_or(u32::MAX);
        self.delay_ms.saturating_mul(step)
    }
}

struct StaggerState {
    flags: Vec<bool>,
    reveals: Vec<TaskHandle>,
}

/// List whose items enter one after another
pub struct StaggeredList {
    config: StaggerConfig,
    state: Arc<Mutex<StaggerState>>,
    trigger: VisibilityTrigger,
}

impl StaggeredList {
    pub fn mount(
        host: &HostHandle,
        target: Option<RegionId>,
        item_count: usize,
        config: StaggerConfig,
    ) -> Result<Self> {
        let state = Arc::new(Mutex::new(StaggerState {
            flags: vec![false; item_count],
            reveals: Vec::new(),
        }));

        let weak = Arc::downgrade(&state);
        let timers = host.clone();
        let schedule = config.clone();
        let trigger = VisibilityTrigger::observe(host, target, config.trigger, move |_| {
            if let Some(state) = weak.upgrade() {
                schedule_reveals(&timers, &state, &schedule);
            }
        })?;

        Ok(Self {
            config,
            state,
            trigger,
        })
    }

    pub fn is_triggered(&self) -> bool {
        self.trigger.is_triggered()
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        lock(&self.state).flags.get(index).copied().unwrap_or(false)
    }

    /// Snapshot of every item's flag
    pub fn flags(&self) -> Vec<bool> {
        lock(&self.state).flags.clone()
    }

    pub fn revealed_count(&self) -> usize {
        lock(&self.state).flags.iter().filter(|&&shown| shown).count()
    }

    pub fn len(&self) -> usize {
        lock(&self.state).flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_complete(&self) -> bool {
        lock(&self.state).flags.iter().all(|&shown| shown)
    }

    /// Resize the flag buffer
    ///
    /// Scheduled reveals are kept. Reveals for indices that no longer exist
    /// are ignored, and items added after the trigger stay hidden.
    pub fn set_item_count(&self, item_count: usize) {
        lock(&self.state).flags.resize(item_count, false);
    }

    pub fn item_presentation(&self, index: usize) -> Presentation {
        if self.is_revealed(index) {
            Presentation::IDENTITY
        } else {
            Presentation::hidden(0.0, self.config.distance)
        }
    }

    pub fn presentations(&self) -> Vec<Presentation> {
        let hidden = Presentation::hidden(0.0, self.config.distance);
        lock(&self.state)
            .flags
            .iter()
            .map(|&shown| if shown { Presentation::IDENTITY } else { hidden })
            .collect()
    }

    pub fn config(&self) -> &StaggerConfig {
        &self.config
    }
}

impl std::fmt::Debug for StaggeredList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaggeredList")
            .field("flags", &self.flags())
            .field("triggered", &self.is_triggered())
            .finish()
    }
}

fn schedule_reveals(host: &HostHandle, state: &Arc<Mutex<StaggerState>>, config: &StaggerConfig) {
    let total = lock(state).flags.len();
    let reveals: Vec<TaskHandle> = (0..total)
        .map(|index| {
            let delay = config.delay_for_index(index, total);
            reveal_after(host, Arc::downgrade(state), index, delay)
        })
        .collect();
    debug!("stagger: {} reveals scheduled", reveals.len());

    let stale = std::mem::replace(&mut lock(state).reveals, reveals);
    drop(stale);
}

fn reveal_after(
    host: &HostHandle,
    state: Weak<Mutex<StaggerState>>,
    index: usize,
    delay: u32,
) -> TaskHandle {
    host.set_timeout(delay, move || {
        let Some(state) = state.upgrade() else {
            return;
        };
        let mut state = lock(&state);
        if let Some(flag) = state.flags.get_mut(index) {
            *flag = true;
            trace!("stagger: item {} revealed", index);
        }
    })
}
