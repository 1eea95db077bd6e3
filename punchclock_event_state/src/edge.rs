// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damped edge auto-scroll.
//!
//! While a drag is held within [`EdgeScroll::edge`] pixels of either side of the
//! time area, every move nudges the view in that direction. The nudge grows
//! with how far past the edge band the pointer is and is scaled by
//! [`EdgeScroll::damping`] so it stays slow enough to control.

/// Edge band size and damping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeScroll {
    /// Width of the band at each edge, in pixels.
    pub edge: f64,
    /// Fraction of the overshoot converted into pan per move.
    pub damping: f64,
}

impl Default for EdgeScroll {
    fn default() -> Self {
        Self {
            edge: 18.0,
            damping: 0.03,
        }
    }
}

/// Result of [`EdgeScroll::nudge`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeNudge {
    /// Pointer position pulled back inside the band.
    pub x: f64,
    /// Seconds to add to the pan offset; negative scrolls back in time.
    pub pan_seconds: f64,
}

impl EdgeNudge {
    /// Whether the pointer was inside an edge band.
    pub fn is_active(&self) -> bool {
        self.pan_seconds != 0.0
    }
}

impl EdgeScroll {
    /// Computes the nudge for pointer `x` in a span `width` pixels wide.
    pub fn nudge(&self, x: f64, width: f64, sec_per_px: f64) -> EdgeNudge {
        let right = width - self.edge;
        if x < self.edge {
            EdgeNudge {
                x: self.edge,
                pan_seconds: -(self.edge - x) * self.damping * sec_per_px,
            }
        } else if x > right {
            EdgeNudge {
                x: right,
                pan_seconds: (x - right) * self.damping * sec_per_px,
            }
        } else {
            EdgeNudge { x, pan_seconds: 0.0 }
        }
    }
}
