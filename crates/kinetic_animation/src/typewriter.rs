//! Character-by-character text reveal
//!
//! Reveals one character per `speed_ms` through chained timeouts. The
//! visible text is always a prefix of the source, counted in Unicode scalar
//! values.

use crate::lock;
use kinetic_core::{HostHandle, TaskHandle};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

pub const DEFAULT_TYPE_SPEED_MS: u32 = 50;
pub const DEFAULT_CURSOR: char = '|';

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypewriterConfig {
    pub text: String,
    /// Delay between characters
    pub speed_ms: u32,
    pub cursor: char,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            speed_ms: DEFAULT_TYPE_SPEED_MS,
            cursor: DEFAULT_CURSOR,
        }
    }
}

impl TypewriterConfig {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn speed_ms(mut self, speed_ms: u32) -> Self {
        self.speed_ms = speed_ms;
        self
    }

    pub fn cursor(mut self, cursor: char) -> Self {
        self.cursor = cursor;
        self
    }
}

/// Where a reveal run stands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealPhase {
    /// Nothing revealed yet
    Idle,
    Revealing,
    /// Whole text visible
    Done,
}

type CompletionCallback = Box<dyn FnMut() + Send>;

struct RevealState {
    chars: Vec<char>,
    cursor: usize,
    output: String,
    speed_ms: u32,
    pending: Option<TaskHandle>,
    on_complete: Option<CompletionCallback>,
}

impl RevealState {
    fn phase(&self) -> RevealPhase {
        if self.cursor >= self.chars.len() {
            RevealPhase::Done
        } else if self.cursor == 0 {
            RevealPhase::Idle
        } else {
            RevealPhase::Revealing
        }
    }
}

/// Text that types itself out
pub struct Typewriter {
    host: HostHandle,
    cursor_glyph: char,
    state: Arc<Mutex<RevealState>>,
}

impl Typewriter {
    /// Mount and start revealing immediately
    pub fn mount(host: &HostHandle, config: TypewriterConfig) -> Self {
        Self::mount_inner(host, config, None)
    }

    /// Mount with a callback run once per completed reveal
    ///
    /// For empty text the callback runs before this returns.
    pub fn mount_with_completion<F>(
        host: &HostHandle,
        config: TypewriterConfig,
        on_complete: F,
    ) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        Self::mount_inner(host, config, Some(Box::new(on_complete)))
    }

    fn mount_inner(
        host: &HostHandle,
        config: TypewriterConfig,
        on_complete: Option<CompletionCallback>,
    ) -> Self {
        let state = Arc::new(Mutex::new(RevealState {
            chars: Vec::new(),
            cursor: 0,
            output: String::new(),
            speed_ms: config.speed_ms,
            pending: None,
            on_complete,
        }));
        let typewriter = Self {
            host: host.clone(),
            cursor_glyph: config.cursor,
            state,
        };
        typewriter.set_text(&config.text);
        typewriter
    }

    /// Replace the source text and restart the reveal from the beginning
    ///
    /// Any scheduled reveal for the previous text is cancelled first.
    pub fn set_text(&self, text: &str) {
        let (stale, finished) = {
            let mut state = lock(&self.state);
            let stale = state.pending.take();
            state.chars = text.chars().collect();
            state.cursor = 0;
            state.output.clear();
            let finished = state.chars.is_empty();
            if !finished {
                state.pending = Some(schedule_reveal(&self.host, &self.state, state.speed_ms));
            }
            debug!("typewriter: revealing {} chars", state.chars.len());
            (stale, finished)
        };
        drop(stale);

        if finished {
            fire_completion(&self.state);
        }
    }

    /// Change the per-character delay, continuing from the current position
    pub fn set_speed(&self, speed_ms: u32) {
        let stale = {
            let mut state = lock(&self.state);
            state.speed_ms = speed_ms;
            if state.phase() == RevealPhase::Done {
                return;
            }
            let stale = state.pending.take();
            state.pending = Some(schedule_reveal(&self.host, &self.state, speed_ms));
            stale
        };
        drop(stale);
    }

    /// Revealed prefix, without the cursor
    pub fn output(&self) -> String {
        lock(&self.state).output.clone()
    }

    /// Revealed prefix followed by the cursor glyph
    pub fn render(&self) -> String {
        let state = lock(&self.state);
        let mut rendered = String::with_capacity(state.output.len() + self.cursor_glyph.len_utf8());
        rendered.push_str(&state.output);
        rendered.push(self.cursor_glyph);
        rendered
    }

    pub fn phase(&self) -> RevealPhase {
        lock(&self.state).phase()
    }

    pub fn is_done(&self) -> bool {
        self.phase() == RevealPhase::Done
    }

    /// Number of characters revealed so far
    pub fn cursor_index(&self) -> usize {
        lock(&self.state).cursor
    }

    pub fn len(&self) -> usize {
        lock(&self.state).chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Typewriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("Typewriter")
            .field("output", &state.output)
            .field("cursor", &state.cursor)
            .field("len", &state.chars.len())
            .finish()
    }
}

fn schedule_reveal(
    host: &HostHandle,
    state: &Arc<Mutex<RevealState>>,
    speed_ms: u32,
) -> TaskHandle {
    let weak = Arc::downgrade(state);
    let next = host.clone();
    host.set_timeout(speed_ms, move || {
        if let Some(state) = weak.upgrade() {
            reveal_next(&next, &state);
        }
    })
}

fn reveal_next(host: &HostHandle, state: &Arc<Mutex<RevealState>>) {
    let finished = {
        let mut guard = lock(state);
        let Some(&ch) = guard.chars.get(guard.cursor) else {
            return;
        };
        guard.output.push(ch);
        guard.cursor += 1;
        trace!("typewriter: {}/{}", guard.cursor, guard.chars.len());

        if guard.cursor == guard.chars.len() {
            guard.pending = None;
            true
        } else {
            let speed_ms = guard.speed_ms;
            guard.pending = Some(schedule_reveal(host, state, speed_ms));
            false
        }
    };

    if finished {
        debug!("typewriter: reveal complete");
        fire_completion(state);
    }
}

fn fire_completion(state: &Arc<Mutex<RevealState>>) {
    let callback = lock(state).on_complete.take();
    if let Some(mut callback) = callback {
        callback();
        let mut guard = lock(state);
        if guard.on_complete.is_none() {
            guard.on_complete = Some(callback);
        }
    }
}
