// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;

use crate::{
    Color, DrawOp, ImagingOp, LayerOp, PointF, RectF, RoundedRectF, StateOp, Surface, TextStyle,
};

/// One layer's complete frame: a size plus an ordered list of ops.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct DisplayList {
    width: f32,
    height: f32,
    ops: Vec<ImagingOp>,
    depth: u32,
}

impl DisplayList {
    /// Creates an empty list for a layer of the given size.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            depth: 0,
        }
    }

    /// Layer width in CSS pixels.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Layer height in CSS pixels.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Operations in order.
    pub fn ops(&self) -> &[ImagingOp] {
        &self.ops
    }

    /// Iterates only the draw operations.
    pub fn draws(&self) -> impl Iterator<Item = &DrawOp> + '_ {
        self.ops.iter().filter_map(|op| match op {
            ImagingOp::Draw(d) => Some(d),
            ImagingOp::State(_) => None,
        })
    }

    /// Iterates the text strings drawn by this list.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.draws().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Returns `true` if no operations were recorded.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Appends a state operation.
    pub fn state(&mut self, op: StateOp) {
        match op {
            StateOp::PushLayer(_) => self.depth += 1,
            StateOp::PopLayer => self.depth = self.depth.saturating_sub(1),
        }
        self.ops.push(ImagingOp::State(op));
    }

    /// Appends a draw operation.
    pub fn draw(&mut self, op: DrawOp) {
        self.ops.push(ImagingOp::Draw(op));
    }

    /// Runs `f` inside a layer, popping it afterwards.
    pub fn with_layer<R>(&mut self, layer: LayerOp, f: impl FnOnce(&mut Self) -> R) -> R {
        self.state(StateOp::PushLayer(layer));
        let out = f(self);
        self.state(StateOp::PopLayer);
        out
    }

    /// Runs `f` inside a rectangular clip.
    pub fn with_clip<R>(&mut self, clip: RectF, f: impl FnOnce(&mut Self) -> R) -> R {
        self.with_layer(
            LayerOp {
                clip: Some(clip),
                opacity: None,
            },
            f,
        )
    }

    /// Runs `f` with a group opacity.
    pub fn with_opacity<R>(&mut self, opacity: f32, f: impl FnOnce(&mut Self) -> R) -> R {
        self.with_layer(
            LayerOp {
                clip: None,
                opacity: Some(opacity),
            },
            f,
        )
    }

    /// Fills a rectangle.
    pub fn fill_rect(&mut self, rect: RectF, color: Color) {
        self.draw(DrawOp::FillRect { rect, color });
    }

    /// Fills a rounded rectangle.
    pub fn fill_rounded_rect(&mut self, rect: RectF, radius: f32, color: Color) {
        self.draw(DrawOp::FillRoundedRect {
            shape: RoundedRectF::new(rect, radius),
            color,
        });
    }

    /// Strokes a rounded rectangle outline.
    pub fn stroke_rounded_rect(&mut self, rect: RectF, radius: f32, color: Color, width: f32) {
        self.draw(DrawOp::StrokeRoundedRect {
            shape: RoundedRectF::new(rect, radius),
            color,
            width,
        });
    }

    /// Strokes a straight line.
    pub fn line(&mut self, from: PointF, to: PointF, color: Color, width: f32) {
        self.draw(DrawOp::Line {
            from,
            to,
            color,
            width,
        });
    }

    /// Fills a circle.
    pub fn fill_circle(&mut self, center: PointF, radius: f32, color: Color) {
        self.draw(DrawOp::FillCircle {
            center,
            radius,
            color,
        });
    }

    /// Fills a triangle.
    pub fn fill_triangle(&mut self, points: [PointF; 3], color: Color) {
        self.draw(DrawOp::FillTriangle { points, color });
    }

    /// Draws a line of text.
    pub fn text(
        &mut self,
        text: impl Into<String>,
        origin: PointF,
        style: TextStyle,
        color: Color,
    ) {
        self.draw(DrawOp::Text {
            text: text.into(),
            origin,
            style,
            color,
        });
    }

    /// Returns `true` if every pushed layer has been popped.
    pub fn is_balanced(&self) -> bool {
        self.depth == 0
    }
}

/// Presents `list` on `surface`.
///
/// The surface is cleared first, and any layers left open by the list are
/// closed afterwards, so the result only depends on the list.
pub fn present<S: Surface + ?Sized>(list: &DisplayList, surface: &mut S) {
    surface.begin(list.width, list.height);
    for op in &list.ops {
        match op {
            ImagingOp::State(op) => surface.state(op),
            ImagingOp::Draw(op) => surface.draw(op),
        }
    }
    for _ in 0..list.depth {
        surface.state(&StateOp::PopLayer);
    }
    surface.end();
}
