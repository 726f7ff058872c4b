//! Easing curves
//!
//! Each curve maps normalized progress `t` in `[0, 1]` to eased progress.
//! Inputs outside the range are clamped, so `apply(0) == 0` and
//! `apply(1) == 1` for every curve.

use crate::error::AnimationError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    /// Cubic ease-in
    EaseIn,
    /// Cubic ease-out
    #[default]
    EaseOut,
    /// Cubic ease-in-out
    EaseInOut,
    /// `1 - (1 - t)^4`: fast start, long deceleration
    EaseOutQuart,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
        }
    }
}

impl FromStr for Easing {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Easing::Linear),
            "ease-in" => Ok(Easing::EaseIn),
            "ease-out" => Ok(Easing::EaseOut),
            "ease-in-out" => Ok(Easing::EaseInOut),
            "ease-out-quart" => Ok(Easing::EaseOutQuart),
            _ => Err(AnimationError::unknown(
                "easing",
                s,
                "linear, ease-in, ease-out, ease-in-out, ease-out-quart",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::EaseOutQuart,
    ];

    #[test]
    fn test_endpoints_are_fixed() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{:?}", easing);
            assert_eq!(easing.apply(1.0), 1.0, "{:?}", easing);
            assert_eq!(easing.apply(-3.0), 0.0, "{:?}", easing);
            assert_eq!(easing.apply(7.0), 1.0, "{:?}", easing);
        }
    }

    #[test]
    fn test_curves_are_monotonic() {
        for easing in ALL {
            let mut last = 0.0;
            for step in 0..=100 {
                let value = easing.apply(step as f64 / 100.0);
                assert!(value >= last, "{:?} decreased at step {}", easing, step);
                last = value;
            }
        }
    }

    #[test]
    fn test_ease_out_quart_midpoint() {
        assert_eq!(Easing::EaseOutQuart.apply(0.5), 0.9375);
    }

    #[test]
    fn test_parse() {
        assert_eq!("ease-out-quart".parse::<Easing>(), Ok(Easing::EaseOutQuart));
        assert!("bounce".parse::<Easing>().is_err());
    }
}
