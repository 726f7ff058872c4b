//! Scroll-linked vertical offset

use crate::error::{AnimationError, Result};
use crate::lock;
use crate::presentation::Presentation;
use kinetic_core::{HostHandle, TaskHandle, ViewportEventKind};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::trace;

pub const DEFAULT_PARALLAX_SPEED: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    /// Multiplier on scroll position; 0 pins the layer, 1 moves it with the page
    pub speed: f32,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_PARALLAX_SPEED,
        }
    }
}

impl ParallaxConfig {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }
}

/// Offset for a scroll position: the layer drifts against the scroll
pub fn parallax_offset(speed: f32, scroll_y: f32) -> f32 {
    -speed * scroll_y
}

/// Layer whose vertical offset follows the page scroll
///
/// Recomputed on every scroll event from the position carried in the event.
pub struct Parallax {
    speed: f32,
    offset: Arc<Mutex<f32>>,
    _listener: TaskHandle,
}

impl Parallax {
    pub fn mount(host: &HostHandle, config: ParallaxConfig) -> Result<Self> {
        let speed = config.speed;
        if !speed.is_finite() {
            return Err(AnimationError::InvalidSpeed(speed));
        }

        let initial = host
            .viewport()
            .map(|viewport| parallax_offset(speed, viewport.scroll_y))
            .unwrap_or_default();
        let offset = Arc::new(Mutex::new(initial));

        let weak = Arc::downgrade(&offset);
        let listener = host.subscribe(ViewportEventKind::Scroll, move |event| {
            if let Some(offset) = weak.upgrade() {
                let value = parallax_offset(speed, event.scroll_y);
                *lock(&offset) = value;
                trace!("parallax: offset {:.1} at scroll {:.1}", value, event.scroll_y);
            }
        });

        Ok(Self {
            speed,
            offset,
            _listener: listener,
        })
    }

    pub fn offset(&self) -> f32 {
        *lock(&self.offset)
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn presentation(&self) -> Presentation {
        Presentation::translated(0.0, self.offset())
    }
}

impl std::fmt::Debug for Parallax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parallax")
            .field("speed", &self.speed)
            .field("offset", &self.offset())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinetic_core::HostScheduler;

    #[test]
    fn test_offset_tracks_scroll() {
        let host = HostScheduler::new();
        host.set_document_height(5000.0);
        let layer = Parallax::mount(&host.handle(), ParallaxConfig::default()).unwrap();
        assert_eq!(layer.offset(), 0.0);

        host.scroll_to(0.0, 400.0);
        assert_eq!(layer.offset(), -200.0);

        host.scroll_to(0.0, 100.0);
        assert_eq!(layer.offset(), -50.0);
        assert_eq!(layer.presentation().translate_y, -50.0);
    }

    #[test]
    fn test_initial_offset_uses_mount_scroll() {
        let host = HostScheduler::new();
        host.set_document_height(5000.0);
        host.scroll_to(0.0, 1000.0);
        let layer = Parallax::mount(&host.handle(), ParallaxConfig::new(0.2)).unwrap();
        assert_eq!(layer.offset(), -200.0);
    }

    #[test]
    fn test_offset_follows_clamped_scroll_after_resize() {
        let host = HostScheduler::new();
        host.set_document_height(2000.0);
        let layer = Parallax::mount(&host.handle(), ParallaxConfig::default()).unwrap();

        host.scroll_to(0.0, 1200.0);
        assert_eq!(layer.offset(), -600.0);

        host.resize(1280.0, 1600.0);
        assert_eq!(host.viewport().scroll_y, 400.0);
        assert_eq!(layer.offset(), -200.0);
    }

    #[test]
    fn test_rejects_non_finite_speed() {
        let host = HostScheduler::new();
        assert!(matches!(
            Parallax::mount(&host.handle(), ParallaxConfig::new(f32::NAN)),
            Err(AnimationError::InvalidSpeed(_))
        ));
    }

    #[test]
    fn test_unmount_removes_listener() {
        let host = HostScheduler::new();
        let layer = Parallax::mount(&host.handle(), ParallaxConfig::default()).unwrap();
        assert_eq!(host.listener_count(), 1);
        drop(layer);
        assert_eq!(host.listener_count(), 0);
        host.scroll_to(0.0, 10.0);
    }
}
