//! Host environment scheduler
//!
//! Owns every timer, frame callback, visibility observation and viewport
//! listener registered by animation components, and drives them from a
//! single clock. Components never talk to the scheduler directly; they get a
//! [`HostHandle`] (weak) and receive a [`TaskHandle`] for each registration.
//!
//! One call to [`HostScheduler::advance`] runs, in order:
//!
//! 1. every timer whose due time falls inside the advanced window, in due-time
//!    order, with the clock set to the timer's due time
//! 2. every frame callback requested before the frame phase began
//! 3. visibility evaluation for every observation
//!
//! Callbacks always run with the scheduler lock released, so they are free to
//! register or cancel other tasks. A task cancelled by an earlier callback in
//! the same pass never runs.
//!
//! # Example
//!
//! ```rust
//! use kinetic_core::HostScheduler;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let host = HostScheduler::new();
//! let fired = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&fired);
//! let _timer = host.handle().set_timeout(50, move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! host.advance(Duration::from_millis(49));
//! assert_eq!(fired.load(Ordering::SeqCst), 0);
//! host.advance(Duration::from_millis(1));
//! assert_eq!(fired.load(Ordering::SeqCst), 1);
//! ```

use crate::events::{IntersectionEntry, Viewport, ViewportEvent, ViewportEventKind};
use crate::geometry::Rect;
use crate::task::{Task, TaskHandle};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::{Duration, Instant};

new_key_type! {
    /// Handle to a registered delay or interval timer
    pub struct TimerId;
    /// Handle to a pending frame callback
    pub struct FrameId;
    /// Handle to a visibility observation
    pub struct ObserverId;
    /// Handle to a viewport event listener
    pub struct ListenerId;
    /// Handle to a layout region registered by the rendering layer
    pub struct RegionId;
}

/// Shortest period an interval timer may repeat at
pub const MIN_INTERVAL_MS: f64 = 1.0;

pub type TimeoutCallback = Box<dyn FnOnce() + Send>;
pub type IntervalCallback = Box<dyn FnMut() + Send>;
pub type FrameCallback = Box<dyn FnOnce(f64) + Send>;
pub type IntersectionCallback = Box<dyn FnMut(&IntersectionEntry) + Send>;
pub type ViewportCallback = Box<dyn FnMut(&ViewportEvent) + Send>;

enum TimerCallback {
    Once(TimeoutCallback),
    Repeat(IntervalCallback),
}

struct TimerEntry {
    due_ms: f64,
    period_ms: Option<f64>,
    seq: u64,
    /// Taken out while a repeating callback runs
    callback: Option<TimerCallback>,
}

struct FrameEntry {
    seq: u64,
    callback: FrameCallback,
}

struct Observation {
    target: RegionId,
    threshold: f32,
    /// Last delivered state, `None` until the first evaluation
    last_intersecting: Option<bool>,
    callback: Option<IntersectionCallback>,
}

struct Listener {
    kind: ViewportEventKind,
    callback: Option<ViewportCallback>,
}

struct HostInner {
    now_ms: f64,
    last_instant: Instant,
    next_seq: u64,
    timers: SlotMap<TimerId, TimerEntry>,
    frames: SlotMap<FrameId, FrameEntry>,
    observers: SlotMap<ObserverId, Observation>,
    listeners: SlotMap<ListenerId, Listener>,
    regions: SlotMap<RegionId, Rect>,
    viewport: Viewport,
}

impl HostInner {
    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

fn lock(inner: &Mutex<HostInner>) -> MutexGuard<'_, HostInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Pull the scroll position back inside the document; true if it moved
fn clamp_scroll(viewport: &mut Viewport) -> bool {
    let max_y = viewport.max_scroll_y();
    if viewport.scroll_y <= max_y {
        return false;
    }
    viewport.scroll_y = max_y;
    true
}

fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs() as f64 * 1000.0 + f64::from(duration.subsec_nanos()) / 1_000_000.0
}

/// The host environment that owns and drives all scheduled work
///
/// Held by whatever plays the role of the event loop (the CLI simulator, a
/// platform shell, a test). Components receive a [`HostHandle`] instead.
pub struct HostScheduler {
    inner: Arc<Mutex<HostInner>>,
}

impl HostScheduler {
    pub fn new() -> Self {
        Self::with_viewport(Viewport::default())
    }

    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HostInner {
                now_ms: 0.0,
                last_instant: Instant::now(),
                next_seq: 0,
                timers: SlotMap::with_key(),
                frames: SlotMap::with_key(),
                observers: SlotMap::with_key(),
                listeners: SlotMap::with_key(),
                regions: SlotMap::with_key(),
                viewport,
            })),
        }
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> HostHandle {
        HostHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HostInner> {
        lock(&self.inner)
    }

    /// Current host clock (ms)
    pub fn now_ms(&self) -> f64 {
        self.lock().now_ms
    }

    /// Advance the clock by wall-clock time elapsed since the previous tick
    ///
    /// Returns true if timers or frame callbacks are still pending.
    pub fn tick(&self) -> bool {
        let elapsed = self.lock().last_instant.elapsed();
        self.advance(elapsed)
    }

    /// Advance the clock by `dt`, running everything that becomes due
    ///
    /// Returns true if timers or frame callbacks are still pending.
    pub fn advance(&self, dt: Duration) -> bool {
        let target_ms = {
            let mut inner = self.lock();
            inner.last_instant = Instant::now();
            inner.now_ms + duration_ms(dt)
        };

        self.run_timers(target_ms);
        self.run_frames(target_ms);
        self.evaluate_observers();

        self.has_pending_work()
    }

    fn run_timers(&self, target_ms: f64) {
        loop {
            let (id, callback) = {
                let mut inner = self.lock();
                let due = inner
                    .timers
                    .iter()
                    .filter(|(_, timer)| timer.callback.is_some() && timer.due_ms <= target_ms)
                    .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)))
                    .map(|(id, timer)| (id, timer.due_ms, timer.period_ms.is_some()));

                let Some((id, due_ms, repeating)) = due else {
                    break;
                };

                inner.now_ms = inner.now_ms.max(due_ms);
                let callback = if repeating {
                    inner.timers.get_mut(id).and_then(|timer| timer.callback.take())
                } else {
                    inner.timers.remove(id).and_then(|timer| timer.callback)
                };
                (id, callback)
            };

            match callback {
                Some(TimerCallback::Once(callback)) => {
                    tracing::trace!("host: timeout {:?} fired", id);
                    callback();
                }
                Some(TimerCallback::Repeat(mut callback)) => {
                    tracing::trace!("host: interval {:?} fired", id);
                    callback();

                    let mut inner = self.lock();
                    let seq = inner.bump_seq();
                    if let Some(timer) = inner.timers.get_mut(id) {
                        timer.due_ms += timer.period_ms.unwrap_or(MIN_INTERVAL_MS);
                        timer.seq = seq;
                        timer.callback = Some(TimerCallback::Repeat(callback));
                    } else {
                        // Cancelled from inside its own callback
                        drop(inner);
                        drop(callback);
                    }
                }
                None => {}
            }
        }
    }

    fn run_frames(&self, now_ms: f64) {
        let batch: SmallVec<[FrameId; 16]> = {
            let mut inner = self.lock();
            inner.now_ms = inner.now_ms.max(now_ms);
            let mut pending: SmallVec<[(u64, FrameId); 16]> = inner
                .frames
                .iter()
                .map(|(id, frame)| (frame.seq, id))
                .collect();
            pending.sort_unstable_by_key(|(seq, _)| *seq);
            pending.into_iter().map(|(_, id)| id).collect()
        };

        let timestamp = self.now_ms();
        for id in batch {
            let frame = self.lock().frames.remove(id);
            if let Some(frame) = frame {
                (frame.callback)(timestamp);
            }
        }
    }

    fn evaluate_observers(&self) {
        let deliveries: Vec<(ObserverId, IntersectionEntry)> = {
            let mut inner = self.lock();
            let visible = inner.viewport.visible_rect();
            let time_ms = inner.now_ms;
            let HostInner {
                observers, regions, ..
            } = &mut *inner;

            let deliveries = observers
                .iter_mut()
                .filter_map(|(id, observation)| {
                    let ratio = regions
                        .get(observation.target)
                        .map(|region| region.visible_fraction(&visible))
                        .unwrap_or(0.0);
                    let is_intersecting = ratio > 0.0 && ratio >= observation.threshold;
                    if observation.last_intersecting == Some(is_intersecting) {
                        return None;
                    }
                    observation.last_intersecting = Some(is_intersecting);
                    Some((
                        id,
                        IntersectionEntry {
                            target: observation.target,
                            ratio,
                            is_intersecting,
                            time_ms,
                        },
                    ))
                })
                .collect();
            deliveries
        };

        for (id, entry) in deliveries {
            let callback = self
                .lock()
                .observers
                .get_mut(id)
                .and_then(|observation| observation.callback.take());
            let Some(mut callback) = callback else {
                continue;
            };

            tracing::trace!(
                "host: observer {:?} ratio={:.3} intersecting={}",
                id,
                entry.ratio,
                entry.is_intersecting
            );
            callback(&entry);

            let mut inner = self.lock();
            if let Some(observation) = inner.observers.get_mut(id) {
                observation.callback = Some(callback);
            } else {
                drop(inner);
                drop(callback);
            }
        }
    }

    fn dispatch_viewport(&self, kind: ViewportEventKind) {
        let (event, targets) = {
            let inner = self.lock();
            let targets: SmallVec<[ListenerId; 8]> = inner
                .listeners
                .iter()
                .filter(|(_, listener)| listener.kind == kind)
                .map(|(id, _)| id)
                .collect();
            (inner.viewport.event(kind), targets)
        };

        for id in targets {
            let callback = self
                .lock()
                .listeners
                .get_mut(id)
                .and_then(|listener| listener.callback.take());
            let Some(mut callback) = callback else {
                continue;
            };

            callback(&event);

            let mut inner = self.lock();
            if let Some(listener) = inner.listeners.get_mut(id) {
                listener.callback = Some(callback);
            } else {
                drop(inner);
                drop(callback);
            }
        }
    }

    // =========================================================================
    // Viewport and Regions (driven by the rendering layer)
    // =========================================================================

    pub fn viewport(&self) -> Viewport {
        self.lock().viewport
    }

    /// Scroll the viewport and notify scroll listeners
    ///
    /// Visibility is re-evaluated on the next `advance`/`tick`.
    pub fn scroll_to(&self, x: f32, y: f32) {
        {
            let mut inner = self.lock();
            let max_y = inner.viewport.max_scroll_y();
            inner.viewport.scroll_x = x.max(0.0);
            inner.viewport.scroll_y = y.clamp(0.0, max_y);
        }
        self.dispatch_viewport(ViewportEventKind::Scroll);
    }

    /// Resize the viewport and notify resize listeners
    ///
    /// Scroll listeners are notified first when the new size clamps the
    /// scroll position.
    pub fn resize(&self, width: f32, height: f32) {
        let clamped = {
            let mut inner = self.lock();
            inner.viewport.size.width = width.max(0.0);
            inner.viewport.size.height = height.max(0.0);
            clamp_scroll(&mut inner.viewport)
        };
        if clamped {
            self.dispatch_viewport(ViewportEventKind::Scroll);
        }
        self.dispatch_viewport(ViewportEventKind::Resize);
    }

    /// Change the document height, notifying scroll listeners if the
    /// scroll position had to be clamped
    pub fn set_document_height(&self, height: f32) {
        let clamped = {
            let mut inner = self.lock();
            inner.viewport.document_height = height.max(0.0);
            clamp_scroll(&mut inner.viewport)
        };
        if clamped {
            self.dispatch_viewport(ViewportEventKind::Scroll);
        }
    }

    /// Register a laid-out region (document coordinates)
    pub fn insert_region(&self, rect: Rect) -> RegionId {
        self.lock().regions.insert(rect)
    }

    /// Update a region after layout; returns false if it no longer exists
    pub fn set_region(&self, id: RegionId, rect: Rect) -> bool {
        match self.lock().regions.get_mut(id) {
            Some(region) => {
                *region = rect;
                true
            }
            None => false,
        }
    }

    pub fn remove_region(&self, id: RegionId) -> Option<Rect> {
        self.lock().regions.remove(id)
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Check if any timers or frame callbacks are still pending
    pub fn has_pending_work(&self) -> bool {
        let inner = self.lock();
        !inner.timers.is_empty() || !inner.frames.is_empty()
    }

    pub fn timer_count(&self) -> usize {
        self.lock().timers.len()
    }

    pub fn frame_count(&self) -> usize {
        self.lock().frames.len()
    }

    pub fn observer_count(&self) -> usize {
        self.lock().observers.len()
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Total number of live registrations of any kind
    pub fn registration_count(&self) -> usize {
        let inner = self.lock();
        inner.timers.len() + inner.frames.len() + inner.observers.len() + inner.listeners.len()
    }
}

impl Default for HostScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the host scheduler
///
/// Passed to components that need to register work. It won't keep the
/// scheduler alive; registering against a dropped scheduler returns an inert
/// [`TaskHandle`] whose `is_pending()` is false.
#[derive(Clone)]
pub struct HostHandle {
    inner: Weak<Mutex<HostInner>>,
}

impl HostHandle {
    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub fn now_ms(&self) -> Option<f64> {
        self.inner.upgrade().map(|inner| lock(&inner).now_ms)
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.inner.upgrade().map(|inner| lock(&inner).viewport)
    }

    pub fn region(&self, id: RegionId) -> Option<Rect> {
        self.inner
            .upgrade()
            .and_then(|inner| lock(&inner).regions.get(id).copied())
    }

    fn register<K, F>(&self, insert: F) -> K
    where
        K: slotmap::Key,
        F: FnOnce(&mut HostInner) -> K,
    {
        match self.inner.upgrade() {
            Some(inner) => {
                let mut guard = lock(&inner);
                insert(&mut guard)
            }
            None => K::null(),
        }
    }

    /// Run `callback` once, `delay_ms` from now
    pub fn set_timeout<F>(&self, delay_ms: u32, callback: F) -> TaskHandle
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.register(|inner| {
            let seq = inner.bump_seq();
            let due_ms = inner.now_ms + f64::from(delay_ms);
            inner.timers.insert(TimerEntry {
                due_ms,
                period_ms: None,
                seq,
                callback: Some(TimerCallback::Once(Box::new(callback))),
            })
        });
        tracing::trace!("host: timeout {:?} scheduled in {}ms", id, delay_ms);
        TaskHandle::new(self.clone(), Task::Timer(id))
    }

    /// Run `callback` every `period_ms`, first run one period from now
    pub fn set_interval<F>(&self, period_ms: u32, callback: F) -> TaskHandle
    where
        F: FnMut() + Send + 'static,
    {
        let period_ms = f64::from(period_ms).max(MIN_INTERVAL_MS);
        let id = self.register(|inner| {
            let seq = inner.bump_seq();
            let due_ms = inner.now_ms + period_ms;
            inner.timers.insert(TimerEntry {
                due_ms,
                period_ms: Some(period_ms),
                seq,
                callback: Some(TimerCallback::Repeat(Box::new(callback))),
            })
        });
        tracing::trace!("host: interval {:?} every {}ms", id, period_ms);
        TaskHandle::new(self.clone(), Task::Timer(id))
    }

    /// Run `callback` with the frame timestamp before the next display refresh
    pub fn request_frame<F>(&self, callback: F) -> TaskHandle
    where
        F: FnOnce(f64) + Send + 'static,
    {
        let id = self.register(|inner| {
            let seq = inner.bump_seq();
            inner.frames.insert(FrameEntry {
                seq,
                callback: Box::new(callback),
            })
        });
        TaskHandle::new(self.clone(), Task::Frame(id))
    }

    /// Observe how much of `target` is inside the viewport
    ///
    /// The callback receives an entry on the first evaluation and then on
    /// every change of `is_intersecting`.
    pub fn observe<F>(&self, target: RegionId, threshold: f32, callback: F) -> TaskHandle
    where
        F: FnMut(&IntersectionEntry) + Send + 'static,
    {
        let threshold = threshold.clamp(0.0, 1.0);
        let id = self.register(|inner| {
            inner.observers.insert(Observation {
                target,
                threshold,
                last_intersecting: None,
                callback: Some(Box::new(callback)),
            })
        });
        tracing::trace!("host: observing {:?} at threshold {}", target, threshold);
        TaskHandle::new(self.clone(), Task::Observer(id))
    }

    /// Listen for scroll or resize notifications
    pub fn subscribe<F>(&self, kind: ViewportEventKind, callback: F) -> TaskHandle
    where
        F: FnMut(&ViewportEvent) + Send + 'static,
    {
        let id = self.register(|inner| {
            inner.listeners.insert(Listener {
                kind,
                callback: Some(Box::new(callback)),
            })
        });
        TaskHandle::new(self.clone(), Task::Listener(id))
    }

    /// Check whether a registration is still live
    pub fn is_pending(&self, task: Task) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        let inner = lock(&inner);
        match task {
            Task::Timer(id) => inner.timers.contains_key(id),
            Task::Frame(id) => inner.frames.contains_key(id),
            Task::Observer(id) => inner.observers.contains_key(id),
            Task::Listener(id) => inner.listeners.contains_key(id),
        }
    }

    /// Deregister a task; no-op if it already ran or was cancelled
    ///
    /// Removed callbacks are dropped after the lock is released, since their
    /// captures may own other task handles.
    pub(crate) fn cancel(&self, task: Task) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        let mut guard = lock(&inner);
        match task {
            Task::Timer(id) => {
                let removed = guard.timers.remove(id);
                drop(guard);
                if removed.is_some() {
                    tracing::trace!("host: timer {:?} cancelled", id);
                }
            }
            Task::Frame(id) => {
                let removed = guard.frames.remove(id);
                drop(guard);
                drop(removed);
            }
            Task::Observer(id) => {
                let removed = guard.observers.remove(id);
                drop(guard);
                if removed.is_some() {
                    tracing::trace!("host: observer {:?} disconnected", id);
                }
            }
            Task::Listener(id) => {
                let removed = guard.listeners.remove(id);
                drop(guard);
                drop(removed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_timeout_fires_once_at_due_time() {
        let host = HostScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let handle = host.handle().set_timeout(100, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(handle.is_pending());
        host.advance(ms(99));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        host.advance(ms(1));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!handle.is_pending());
        host.advance(ms(1000));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_timers_fire_in_due_order_with_clock_at_due_time() {
        let host = HostScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for (delay, label) in [(30u32, "c"), (10, "a"), (20, "b"), (10, "a2")] {
            let log = Arc::clone(&log);
            let handle = host.handle();
            let clock = host.handle();
            handles.push(handle.set_timeout(delay, move || {
                log.lock()
                    .unwrap()
                    .push((label, clock.now_ms().unwrap_or(-1.0)));
            }));
        }

        host.advance(ms(100));
        assert_eq!(
            *log.lock().unwrap(),
            vec![("a", 10.0), ("a2", 10.0), ("b", 20.0), ("c", 30.0)]
        );
        assert_eq!(host.now_ms(), 100.0);
    }

    #[test]
    fn test_interval_repeats_until_cancelled() {
        let host = HostScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let handle = host.handle().set_interval(100, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        host.advance(ms(350));
        assert_eq!(fired.load(Ordering::SeqCst), 3);

        handle.cancel();
        host.advance(ms(1000));
        assert_eq!(fired.load(Ordering::SeqCst), 3);
        assert_eq!(host.timer_count(), 0);
    }

    #[test]
    fn test_dropping_handle_cancels() {
        let host = HostScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        {
            let counter = Arc::clone(&fired);
            let _handle = host.handle().set_timeout(10, move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(host.registration_count(), 0);
        host.advance(ms(100));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_frame_requested_inside_frame_runs_next_advance() {
        let host = HostScheduler::new();
        let stamps = Arc::new(Mutex::new(Vec::new()));
        let slot: Arc<Mutex<Option<TaskHandle>>> = Arc::new(Mutex::new(None));

        let handle = host.handle();
        let inner_stamps = Arc::clone(&stamps);
        let inner_slot = Arc::clone(&slot);
        let first = host.handle().request_frame(move |ts| {
            inner_stamps.lock().unwrap().push(ts);
            let stamps = Arc::clone(&inner_stamps);
            let next = handle.request_frame(move |ts| stamps.lock().unwrap().push(ts));
            *inner_slot.lock().unwrap() = Some(next);
        });

        host.advance(ms(16));
        assert_eq!(*stamps.lock().unwrap(), vec![16.0]);
        assert!(!first.is_pending());

        host.advance(ms(16));
        assert_eq!(*stamps.lock().unwrap(), vec![16.0, 32.0]);
        assert!(!host.has_pending_work());
    }

    #[test]
    fn test_observer_reports_initial_state_and_changes() {
        let host = HostScheduler::with_viewport(Viewport::new(800.0, 600.0));
        host.set_document_height(3000.0);
        let region = host.insert_region(Rect::new(0.0, 1000.0, 800.0, 200.0));

        let entries = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&entries);
        let _observer = host.handle().observe(region, 0.5, move |entry| {
            log.lock().unwrap().push(entry.is_intersecting);
        });

        host.advance(ms(0));
        assert_eq!(*entries.lock().unwrap(), vec![false]);

        // 25% visible: below threshold, no state change
        host.scroll_to(0.0, 450.0);
        host.advance(ms(0));
        assert_eq!(*entries.lock().unwrap(), vec![false]);

        host.scroll_to(0.0, 600.0);
        host.advance(ms(0));
        assert_eq!(*entries.lock().unwrap(), vec![false, true]);

        host.scroll_to(0.0, 0.0);
        host.advance(ms(0));
        assert_eq!(*entries.lock().unwrap(), vec![false, true, false]);
    }

    #[test]
    fn test_cancel_during_pass_suppresses_later_callback() {
        let host = HostScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let victim: Arc<Mutex<Option<TaskHandle>>> = Arc::new(Mutex::new(None));

        let slot = Arc::clone(&victim);
        let _killer = host.handle().set_timeout(10, move || {
            slot.lock().unwrap().take();
        });
        let counter = Arc::clone(&fired);
        *victim.lock().unwrap() = Some(host.handle().set_timeout(10, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        host.advance(ms(20));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_scroll_listeners_receive_measured_position() {
        let host = HostScheduler::with_viewport(Viewport::new(800.0, 600.0));
        host.set_document_height(2000.0);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let _listener = host
            .handle()
            .subscribe(ViewportEventKind::Scroll, move |event| {
                log.lock().unwrap().push(event.scroll_y);
            });

        host.scroll_to(0.0, 120.0);
        host.scroll_to(0.0, 5000.0);
        host.resize(800.0, 500.0);
        assert_eq!(*seen.lock().unwrap(), vec![120.0, 1400.0]);
    }

    #[test]
    fn test_clamping_scroll_notifies_scroll_listeners() {
        let host = HostScheduler::with_viewport(Viewport::new(800.0, 600.0));
        host.set_document_height(2000.0);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let scrolls = Arc::clone(&seen);
        let _scroll = host
            .handle()
            .subscribe(ViewportEventKind::Scroll, move |event| {
                scrolls.lock().unwrap().push(("scroll", event.scroll_y));
            });
        let resizes = Arc::clone(&seen);
        let _resize = host
            .handle()
            .subscribe(ViewportEventKind::Resize, move |event| {
                resizes.lock().unwrap().push(("resize", event.scroll_y));
            });

        host.scroll_to(0.0, 1200.0);
        host.resize(800.0, 1600.0);
        assert_eq!(host.viewport().scroll_y, 400.0);

        host.set_document_height(1800.0);
        assert_eq!(host.viewport().scroll_y, 200.0);

        // no clamp, no scroll event
        host.set_document_height(3000.0);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                ("scroll", 1200.0),
                ("scroll", 400.0),
                ("resize", 400.0),
                ("scroll", 200.0),
            ]
        );
    }

    #[test]
    fn test_dead_host_returns_inert_handles() {
        let handle = {
            let host = HostScheduler::new();
            host.handle()
        };

        assert!(!handle.is_alive());
        let task = handle.set_timeout(10, || {});
        assert!(!task.is_pending());
        assert_eq!(handle.now_ms(), None);
    }
}
