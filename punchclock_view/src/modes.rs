// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Inclusive bounds for the zoom factor of a [`crate::TimeView`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomLimits {
    /// Smallest allowed zoom factor.
    pub min: f64,
    /// Largest allowed zoom factor.
    pub max: f64,
}

impl ZoomLimits {
    /// Creates limits, swapping the bounds if they are given out of order.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Clamps `zoom` into these limits.
    ///
    /// Non-finite input falls back to [`ZoomLimits::min`].
    #[must_use]
    pub fn clamp(self, zoom: f64) -> f64 {
        if zoom.is_finite() {
            zoom.clamp(self.min, self.max)
        } else {
            self.min
        }
    }
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self { min: 0.8, max: 3.0 }
    }
}

/// Snapping applied when converting a pixel position back into a time.
///
/// Interval snapping rounds to the nearest `origin + k * step`, so the grid is
/// anchored at the day start rather than at midnight.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Snap {
    /// Times are returned as-is.
    #[default]
    None,
    /// Round to the nearest multiple of `step` seconds counted from `origin`.
    Interval {
        /// Time the grid is anchored at, in seconds.
        origin: f64,
        /// Grid step in seconds. Non-positive steps disable snapping.
        step: f64,
    },
}

impl Snap {
    /// Applies this snap to a time in seconds.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Self::Interval { origin, step } if step > 0.0 => {
                ((t - origin) / step).round() * step + origin
            }
            _ => t,
        }
    }

    /// Rounds a duration to a whole number of steps.
    ///
    /// Used for relative drags where the origin does not matter.
    #[must_use]
    pub fn apply_delta(self, seconds: f64) -> f64 {
        match self {
            Self::Interval { step, .. } if step > 0.0 => (seconds / step).round() * step,
            _ => seconds,
        }
    }
}
