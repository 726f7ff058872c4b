//! Owned task handles
//!
//! Every registration with the host (timer, frame callback, visibility
//! observation, viewport listener) is represented by exactly one
//! [`TaskHandle`]. Dropping the handle deregisters the task, so a component
//! that owns its handles cannot leak scheduled callbacks past its own drop.

use crate::host::{FrameId, HostHandle, ListenerId, ObserverId, TimerId};

/// Identity of one host registration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Task {
    Timer(TimerId),
    Frame(FrameId),
    Observer(ObserverId),
    Listener(ListenerId),
}

/// Exclusive owner of a host registration
///
/// Cancels the registration when dropped. A handle whose task already ran
/// (one-shot timers, frame callbacks) is inert and dropping it is a no-op.
#[must_use = "dropping a TaskHandle cancels the task immediately"]
pub struct TaskHandle {
    host: HostHandle,
    task: Task,
}

impl TaskHandle {
    pub(crate) fn new(host: HostHandle, task: Task) -> Self {
        Self { host, task }
    }

    pub fn task(&self) -> Task {
        self.task
    }

    /// Check whether the task is still registered with a live host
    pub fn is_pending(&self) -> bool {
        self.host.is_pending(self.task)
    }

    /// Deregister the task now
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.host.cancel(self.task);
    }
}

impl std::fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("task", &self.task)
            .field("pending", &self.is_pending())
            .finish()
    }
}
