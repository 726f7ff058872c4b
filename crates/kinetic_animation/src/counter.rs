//! Animated numeric counter
//!
//! Counts from 0 up to a target once its region becomes visible, easing out
//! with a quartic curve. The value advances on host frames, each frame
//! requesting the next until the run completes.

use crate::easing::Easing;
use crate::error::Result;
use crate::lock;
use crate::visibility::{TriggerConfig, VisibilityTrigger};
use kinetic_core::{HostHandle, RegionId, TaskHandle};
use kinetic_i18n::{format_integer, Locale};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

pub const DEFAULT_COUNTER_DURATION_MS: u32 = 2000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// Final value; unsigned, so a negative target cannot be expressed
    pub end: u64,
    pub duration_ms: u32,
    pub prefix: String,
    pub suffix: String,
    pub trigger: TriggerConfig,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            end: 0,
            duration_ms: DEFAULT_COUNTER_DURATION_MS,
            prefix: String::new(),
            suffix: String::new(),
            trigger: TriggerConfig::default(),
        }
    }
}

impl CounterConfig {
    pub fn new(end: u64) -> Self {
        Self {
            end,
            ..Self::default()
        }
    }

    pub fn duration_ms(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.trigger.threshold = threshold;
        self
    }
}

/// Displayed value `elapsed_ms` into a run
///
/// `floor(end * (1 - (1 - p)^4))` with `p = clamp(elapsed / duration, 0, 1)`.
/// Reaches exactly `end` at `p = 1`; a zero duration is complete at once.
pub fn counter_value(end: u64, elapsed_ms: f64, duration_ms: u32) -> u64 {
    let progress = counter_progress(elapsed_ms, duration_ms);
    if progress >= 1.0 {
        return end;
    }
    let eased = Easing::EaseOutQuart.apply(progress);
    ((end as f64 * eased).floor() as u64).min(end)
}

fn counter_progress(elapsed_ms: f64, duration_ms: u32) -> f64 {
    if duration_ms == 0 {
        return 1.0;
    }
    (elapsed_ms / f64::from(duration_ms)).clamp(0.0, 1.0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum RunPhase {
    Waiting,
    Running { start_ms: f64 },
    Complete,
}

struct CounterState {
    end: u64,
    duration_ms: u32,
    phase: RunPhase,
    value: u64,
    progress: f64,
    frame: Option<TaskHandle>,
    on_complete: Option<Box<dyn FnOnce() + Send>>,
}

/// Number that counts up when scrolled into view
pub struct Counter {
    config: CounterConfig,
    state: Arc<Mutex<CounterState>>,
    trigger: VisibilityTrigger,
}

impl Counter {
    /// Mount the counter over `target`; it starts at 0 and waits to be seen
    pub fn mount(
        host: &HostHandle,
        target: Option<RegionId>,
        config: CounterConfig,
    ) -> Result<Self> {
        let state = Arc::new(Mutex::new(CounterState {
            end: config.end,
            duration_ms: config.duration_ms,
            phase: RunPhase::Waiting,
            value: 0,
            progress: 0.0,
            frame: None,
            on_complete: None,
        }));

        let weak = Arc::downgrade(&state);
        let frames = host.clone();
        let trigger = VisibilityTrigger::observe(host, target, config.trigger, move |entry| {
            if let Some(state) = weak.upgrade() {
                start(&frames, &state, entry.time_ms);
            }
        })?;

        Ok(Self {
            config,
            state,
            trigger,
        })
    }

    /// Run `callback` once when the count reaches its end value
    pub fn set_on_complete<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = lock(&self.state);
        if state.phase != RunPhase::Complete {
            state.on_complete = Some(Box::new(callback));
        }
    }

    pub fn value(&self) -> u64 {
        lock(&self.state).value
    }

    /// Normalized run progress, 0.0 until triggered
    pub fn progress(&self) -> f64 {
        lock(&self.state).progress
    }

    pub fn has_started(&self) -> bool {
        lock(&self.state).phase != RunPhase::Waiting
    }

    pub fn is_running(&self) -> bool {
        matches!(lock(&self.state).phase, RunPhase::Running { .. })
    }

    pub fn is_complete(&self) -> bool {
        lock(&self.state).phase == RunPhase::Complete
    }

    pub fn is_triggered(&self) -> bool {
        self.trigger.is_triggered()
    }

    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    /// Current value with locale grouping, prefix and suffix
    pub fn display(&self, locale: Locale) -> String {
        format!(
            "{}{}{}",
            self.config.prefix,
            format_integer(self.value(), locale),
            self.config.suffix
        )
    }
}

impl std::fmt::Debug for Counter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Counter")
            .field("end", &self.config.end)
            .field("value", &self.value())
            .field("complete", &self.is_complete())
            .finish()
    }
}

fn start(host: &HostHandle, state: &Arc<Mutex<CounterState>>, now_ms: f64) {
    let completion = {
        let mut guard = lock(state);
        if guard.phase != RunPhase::Waiting {
            return;
        }
        if guard.end == 0 || guard.duration_ms == 0 {
            guard.value = guard.end;
            guard.progress = 1.0;
            guard.phase = RunPhase::Complete;
            debug!("counter: completed immediately at {}", guard.end);
            guard.on_complete.take()
        } else {
            guard.phase = RunPhase::Running { start_ms: now_ms };
            guard.frame = Some(request_step(host, state));
            debug!(
                "counter: counting to {} over {}ms",
                guard.end, guard.duration_ms
            );
            None
        }
    };

    if let Some(callback) = completion {
        callback();
    }
}

fn request_step(host: &HostHandle, state: &Arc<Mutex<CounterState>>) -> TaskHandle {
    let weak = Arc::downgrade(state);
    let next = host.clone();
    host.request_frame(move |timestamp| {
        if let Some(state) = weak.upgrade() {
            step(&next, &state, timestamp);
        }
    })
}

fn step(host: &HostHandle, state: &Arc<Mutex<CounterState>>, timestamp: f64) {
    let completion = {
        let mut guard = lock(state);
        let RunPhase::Running { start_ms } = guard.phase else {
            return;
        };
        let elapsed = timestamp - start_ms;
        guard.progress = counter_progress(elapsed, guard.duration_ms);
        guard.value = counter_value(guard.end, elapsed, guard.duration_ms);
        trace!("counter: {} at {:.0}ms", guard.value, elapsed);

        if guard.progress >= 1.0 {
            guard.phase = RunPhase::Complete;
            guard.frame = None;
            debug!("counter: reached {}", guard.end);
            guard.on_complete.take()
        } else {
            guard.frame = Some(request_step(host, state));
            None
        }
    };

    if let Some(callback) = completion {
        callback();
    }
}
