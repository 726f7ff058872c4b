//! Event payloads delivered by the host to registered callbacks

use crate::geometry::{Rect, Size};
use crate::host::RegionId;

/// Result of evaluating one visibility observation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    /// Observed region
    pub target: RegionId,
    /// Fraction of the region inside the viewport (0.0 to 1.0)
    pub ratio: f32,
    /// Whether the ratio satisfies the observation threshold
    pub is_intersecting: bool,
    /// Host clock at evaluation time (ms)
    pub time_ms: f64,
}

/// Kind of viewport notification a listener subscribes to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewportEventKind {
    Scroll,
    Resize,
}

/// Measured viewport state delivered with every scroll/resize notification
///
/// Listeners read positions from the event instead of querying layout, which
/// keeps measurement out of the render path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportEvent {
    pub kind: ViewportEventKind,
    pub scroll_x: f32,
    pub scroll_y: f32,
    pub viewport: Size,
    pub document_height: f32,
}

/// Live viewport metrics tracked by the host
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub scroll_x: f32,
    pub scroll_y: f32,
    pub size: Size,
    pub document_height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            size: Size::new(width, height),
            document_height: height,
        }
    }

    /// Visible area in document coordinates
    pub fn visible_rect(&self) -> Rect {
        Rect::new(
            self.scroll_x,
            self.scroll_y,
            self.size.width,
            self.size.height,
        )
    }

    /// Maximum vertical scroll offset for the current document height
    pub fn max_scroll_y(&self) -> f32 {
        (self.document_height - self.size.height).max(0.0)
    }

    pub(crate) fn event(&self, kind: ViewportEventKind) -> ViewportEvent {
        ViewportEvent {
            kind,
            scroll_x: self.scroll_x,
            scroll_y: self.scroll_y,
            viewport: self.size,
            document_height: self.document_height,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}
