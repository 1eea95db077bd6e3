// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=punchclock_imaging --heading-base-level=0

//! Punchclock Imaging: backend-agnostic draw IR for timeline rendering.
//!
//! This crate defines a small, plain-old-data imaging intermediate
//! representation and the trait for surfaces that consume it. It sits between
//! the timeline engine, which turns state into geometry, and whatever actually
//! puts pixels on screen (a 2D canvas, a GPU scene, a test recorder).
//!
//! # Core concepts
//!
//! - **Geometry**: [`PointF`], [`RectF`] and [`RoundedRectF`] in `f32`
//!   layer-local CSS pixels.
//! - **Operations**: [`StateOp`] scopes clips and opacity; [`DrawOp`] produces
//!   pixels with an explicit [`Color`]. Both combine into [`ImagingOp`].
//! - **Display lists**: a [`DisplayList`] is one layer's complete frame. It is
//!   rebuilt from scratch on every redraw and never patched in place.
//! - **Surfaces**: [`Surface`] receives a list through [`present`], which
//!   always begins by clearing, so presenting the same list twice leaves the
//!   surface in the same state.
//! - **Text metrics**: [`TextMetrics`] is the one question geometry needs to
//!   ask a text engine. [`ApproxTextMetrics`] answers it without one.
//!
//! # Example
//!
//! ```rust
//! use punchclock_imaging::{Color, DisplayList, DrawOp, PointF, RectF, StateOp, Surface, present};
//!
//! let mut list = DisplayList::new(200.0, 40.0);
//! list.fill_rect(RectF::new(0.0, 0.0, 200.0, 40.0), Color::BLACK);
//! list.with_clip(RectF::new(10.0, 0.0, 190.0, 40.0), |list| {
//!     list.line(PointF::new(0.0, 20.0), PointF::new(200.0, 20.0), Color::WHITE, 1.0);
//! });
//!
//! #[derive(Default)]
//! struct Count(usize);
//! impl Surface for Count {
//!     fn begin(&mut self, _: f32, _: f32) {
//!         self.0 = 0;
//!     }
//!     fn state(&mut self, _: &StateOp) {}
//!     fn draw(&mut self, _: &DrawOp) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let mut surface = Count::default();
//! present(&list, &mut surface);
//! present(&list, &mut surface);
//! assert_eq!(surface.0, 2);
//! ```

#![no_std]

extern crate alloc;

mod display_list;
mod text;

use alloc::string::String;

pub use display_list::{DisplayList, present};
pub use peniko::Color;
pub use text::{ApproxTextMetrics, TextAlign, TextBaseline, TextExtent, TextMetrics, TextStyle};

/// A point in f32 coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct PointF {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl PointF {
    /// Create a point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Convert to kurbo's point type.
    #[inline]
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(f64::from(self.x), f64::from(self.y))
    }
}

impl From<(f32, f32)> for PointF {
    #[inline]
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// A simple axis-aligned rectangle in f32 coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RectF {
    /// Minimum X coordinate.
    pub x0: f32,
    /// Minimum Y coordinate.
    pub y0: f32,
    /// Maximum X coordinate.
    pub x1: f32,
    /// Maximum Y coordinate.
    pub y1: f32,
}

impl RectF {
    /// Create a new rectangle from min/max corners.
    #[inline]
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Create a rectangle from an origin and a size.
    #[inline]
    pub fn from_origin_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Width of the rectangle.
    #[inline]
    pub fn width(self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the rectangle.
    #[inline]
    pub fn height(self) -> f32 {
        self.y1 - self.y0
    }

    /// Convert to kurbo's rectangle type.
    #[inline]
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.x0),
            f64::from(self.y0),
            f64::from(self.x1),
            f64::from(self.y1),
        )
    }

    /// Convert from kurbo's rectangle type, narrowing to `f32`.
    #[inline]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "layer coordinates are CSS pixels well inside f32 range"
    )]
    pub fn from_kurbo(rect: kurbo::Rect) -> Self {
        Self::new(rect.x0 as f32, rect.y0 as f32, rect.x1 as f32, rect.y1 as f32)
    }
}

/// An axis-aligned rounded rectangle with a uniform corner radius.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RoundedRectF {
    /// The underlying axis-aligned rectangle.
    pub rect: RectF,
    /// Corner radius.
    pub radius: f32,
}

impl RoundedRectF {
    /// Create a rounded rectangle.
    ///
    /// The radius is capped at half the shorter side, so narrow bars come out
    /// as pills rather than overlapping arcs.
    #[inline]
    pub fn new(rect: RectF, radius: f32) -> Self {
        let cap = (rect.width().min(rect.height()) * 0.5).max(0.0);
        Self {
            rect,
            radius: radius.clamp(0.0, cap),
        }
    }

    /// Convert to kurbo's rounded-rect type.
    #[inline]
    pub fn to_kurbo(self) -> kurbo::RoundedRect {
        kurbo::RoundedRect::from_rect(self.rect.to_kurbo(), f64::from(self.radius))
    }
}

/// Layer parameters for [`StateOp::PushLayer`].
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct LayerOp {
    /// Optional rectangular clip.
    pub clip: Option<RectF>,
    /// Optional group opacity in `0..=1`.
    pub opacity: Option<f32>,
}

/// State operations that scope subsequent drawing.
#[derive(Clone, Debug, PartialEq)]
pub enum StateOp {
    /// Push a layer. Layers must be well-nested.
    PushLayer(LayerOp),
    /// Pop the most recently pushed layer.
    PopLayer,
}

/// Draw operations that produce pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill an axis-aligned rectangle.
    FillRect {
        /// Rectangle to fill.
        rect: RectF,
        /// Fill color.
        color: Color,
    },
    /// Fill a rounded rectangle.
    FillRoundedRect {
        /// Shape to fill.
        shape: RoundedRectF,
        /// Fill color.
        color: Color,
    },
    /// Stroke a rounded rectangle outline.
    StrokeRoundedRect {
        /// Shape to stroke.
        shape: RoundedRectF,
        /// Stroke color.
        color: Color,
        /// Stroke width.
        width: f32,
    },
    /// Stroke a straight line.
    Line {
        /// Start point.
        from: PointF,
        /// End point.
        to: PointF,
        /// Stroke color.
        color: Color,
        /// Stroke width.
        width: f32,
    },
    /// Fill a circle.
    FillCircle {
        /// Center point.
        center: PointF,
        /// Radius.
        radius: f32,
        /// Fill color.
        color: Color,
    },
    /// Fill a triangle.
    FillTriangle {
        /// Corner points.
        points: [PointF; 3],
        /// Fill color.
        color: Color,
    },
    /// Draw a single line of text.
    Text {
        /// Text to draw.
        text: String,
        /// Anchor point; see [`TextStyle`] for alignment.
        origin: PointF,
        /// Font size, weight, and alignment.
        style: TextStyle,
        /// Text color.
        color: Color,
    },
}

impl DrawOp {
    /// The color this operation paints with.
    pub fn color(&self) -> Color {
        match self {
            Self::FillRect { color, .. }
            | Self::FillRoundedRect { color, .. }
            | Self::StrokeRoundedRect { color, .. }
            | Self::Line { color, .. }
            | Self::FillCircle { color, .. }
            | Self::FillTriangle { color, .. }
            | Self::Text { color, .. } => *color,
        }
    }
}

/// A state or draw operation, in list order.
#[derive(Clone, Debug, PartialEq)]
pub enum ImagingOp {
    /// State operation.
    State(StateOp),
    /// Draw operation.
    Draw(DrawOp),
}

/// Something that can consume a [`DisplayList`].
///
/// Implementations translate ops into their own drawing API. [`present`]
/// drives the calls; surfaces do not need to track list boundaries.
pub trait Surface {
    /// Start a new frame of the given size, discarding previous contents.
    fn begin(&mut self, width: f32, height: f32);

    /// Apply a state operation.
    fn state(&mut self, op: &StateOp);

    /// Apply a draw operation.
    fn draw(&mut self, op: &DrawOp);

    /// Finish the frame.
    fn end(&mut self) {}
}
