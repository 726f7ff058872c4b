//! Visual state handed to the rendering layer

/// Opacity and transform the renderer applies to a wrapped element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Presentation {
    pub opacity: f32,
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
}

impl Presentation {
    /// Fully visible, untransformed
    pub const IDENTITY: Presentation = Presentation {
        opacity: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    /// Transparent and displaced by `(dx, dy)`
    pub const fn hidden(dx: f32, dy: f32) -> Self {
        Presentation {
            opacity: 0.0,
            translate_x: dx,
            translate_y: dy,
            scale: 1.0,
        }
    }

    pub const fn translated(dx: f32, dy: f32) -> Self {
        Presentation {
            opacity: 1.0,
            translate_x: dx,
            translate_y: dy,
            scale: 1.0,
        }
    }

    /// Linearly interpolate every channel by `t` (0.0 to 1.0)
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Presentation {
            opacity: mix(self.opacity, other.opacity),
            translate_x: mix(self.translate_x, other.translate_x),
            translate_y: mix(self.translate_y, other.translate_y),
            scale: mix(self.scale, other.scale),
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.opacity <= 0.0
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self::IDENTITY
    }
}
