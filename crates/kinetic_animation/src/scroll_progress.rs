//! Reading-progress indicator

use crate::lock;
use kinetic_core::{HostHandle, TaskHandle, ViewportEvent, ViewportEventKind};
use std::sync::{Arc, Mutex};

/// How far through the document the viewport has scrolled (0.0 to 1.0)
///
/// A document that fits in the viewport reports 0.0.
pub fn scroll_fraction(scroll_y: f32, viewport_height: f32, document_height: f32) -> f32 {
    let scrollable = document_height - viewport_height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    (scroll_y / scrollable).clamp(0.0, 1.0)
}

fn event_fraction(event: &ViewportEvent) -> f32 {
    scroll_fraction(event.scroll_y, event.viewport.height, event.document_height)
}

/// Tracks scroll position relative to the scrollable height
pub struct ScrollProgress {
    fraction: Arc<Mutex<f32>>,
    _scroll: TaskHandle,
    _resize: TaskHandle,
}

impl ScrollProgress {
    pub fn mount(host: &HostHandle) -> Self {
        let initial = host
            .viewport()
            .map(|viewport| {
                scroll_fraction(viewport.scroll_y, viewport.size.height, viewport.document_height)
            })
            .unwrap_or_default();
        let fraction = Arc::new(Mutex::new(initial));

        let listen = |kind| {
            let weak = Arc::downgrade(&fraction);
            host.subscribe(kind, move |event| {
                if let Some(fraction) = weak.upgrade() {
                    *lock(&fraction) = event_fraction(event);
                }
            })
        };
        let scroll = listen(ViewportEventKind::Scroll);
        let resize = listen(ViewportEventKind::Resize);

        Self {
            fraction,
            _scroll: scroll,
            _resize: resize,
        }
    }

    pub fn fraction(&self) -> f32 {
        *lock(&self.fraction)
    }

    /// Rounded percentage for display
    pub fn percent(&self) -> u8 {
        (self.fraction() * 100.0).round() as u8
    }
}

impl std::fmt::Debug for ScrollProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollProgress")
            .field("fraction", &self.fraction())
            .finish()
    }
}
