//! Glow styles for highlighted cards
//!
//! Accent and intensity are closed sets. Strings from configuration are
//! parsed strictly so a typo is an error rather than an unstyled card.

use crate::error::AnimationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// RGBA color with components in 0.0 to 1.0
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    fn channel(value: f32) -> u8 {
        (value.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {:.2})",
            Self::channel(self.r),
            Self::channel(self.g),
            Self::channel(self.b),
            self.a
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    #[default]
    Blue,
    Purple,
    Green,
    Orange,
    Pink,
    Teal,
}

impl Accent {
    pub const ALL: [Accent; 6] = [
        Accent::Blue,
        Accent::Purple,
        Accent::Green,
        Accent::Orange,
        Accent::Pink,
        Accent::Teal,
    ];

    pub fn color(self) -> Rgba {
        match self {
            Accent::Blue => Rgba::rgb8(59, 130, 246),
            Accent::Purple => Rgba::rgb8(168, 85, 247),
            Accent::Green => Rgba::rgb8(34, 197, 94),
            Accent::Orange => Rgba::rgb8(249, 115, 22),
            Accent::Pink => Rgba::rgb8(236, 72, 153),
            Accent::Teal => Rgba::rgb8(20, 184, 166),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Accent::Blue => "blue",
            Accent::Purple => "purple",
            Accent::Green => "green",
            Accent::Orange => "orange",
            Accent::Pink => "pink",
            Accent::Teal => "teal",
        }
    }
}

impl FromStr for Accent {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Accent::ALL
            .into_iter()
            .find(|accent| accent.name() == s)
            .ok_or_else(|| {
                AnimationError::unknown("accent", s, "blue, purple, green, orange, pink, teal")
            })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    #[default]
    Medium,
    High,
}

impl FromStr for Intensity {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Intensity::Low),
            "medium" => Ok(Intensity::Medium),
            "high" => Ok(Intensity::High),
            _ => Err(AnimationError::unknown("intensity", s, "low, medium, high")),
        }
    }
}

/// Shadow descriptor handed to the renderer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlowStyle {
    pub color: Rgba,
    pub blur_radius: f32,
    pub spread: f32,
    pub opacity: f32,
}

impl GlowStyle {
    pub fn new(accent: Accent, intensity: Intensity) -> Self {
        let (blur_radius, spread, opacity) = match intensity {
            Intensity::Low => (12.0, 0.0, 0.2),
            Intensity::Medium => (24.0, 2.0, 0.35),
            Intensity::High => (40.0, 6.0, 0.5),
        };
        Self {
            color: accent.color().with_alpha(opacity),
            blur_radius,
            spread,
            opacity,
        }
    }

    /// Parse both options, failing on the first unrecognized value
    pub fn parse(accent: &str, intensity: &str) -> Result<Self, AnimationError> {
        Ok(Self::new(accent.parse()?, intensity.parse()?))
    }

    /// CSS `box-shadow` value
    pub fn box_shadow(&self) -> String {
        format!(
            "0 0 {}px {}px {}",
            self.blur_radius, self.spread, self.color
        )
    }
}

impl Default for GlowStyle {
    fn default() -> Self {
        Self::new(Accent::default(), Intensity::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_accent_round_trips_by_name() {
        for accent in Accent::ALL {
            assert_eq!(accent.name().parse::<Accent>(), Ok(accent));
        }
    }

    #[test]
    fn test_unknown_values_rejected() {
        assert!(matches!(
            GlowStyle::parse("magenta", "high"),
            Err(AnimationError::UnknownVariant { kind: "accent", .. })
        ));
        assert!(matches!(
            GlowStyle::parse("blue", "extreme"),
            Err(AnimationError::UnknownVariant { kind: "intensity", .. })
        ));
    }

    #[test]
    fn test_intensity_scales_glow() {
        let low = GlowStyle::new(Accent::Teal, Intensity::Low);
        let high = GlowStyle::new(Accent::Teal, Intensity::High);
        assert!(high.blur_radius > low.blur_radius);
        assert!(high.opacity > low.opacity);
        assert_eq!(low.color.a, low.opacity);
    }

    #[test]
    fn test_box_shadow() {
        let glow = GlowStyle::parse("blue", "medium").unwrap();
        assert_eq!(glow.box_shadow(), "0 0 24px 2px rgba(59, 130, 246, 0.35)");
    }
}
