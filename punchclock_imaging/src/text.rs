// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Horizontal alignment of text relative to its origin.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// Origin is the left edge.
    #[default]
    Left,
    /// Origin is the horizontal center.
    Center,
    /// Origin is the right edge.
    Right,
}

/// Vertical alignment of text relative to its origin.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum TextBaseline {
    /// Origin is the top of the em box.
    #[default]
    Top,
    /// Origin is the vertical middle of the em box.
    Middle,
    /// Origin is the alphabetic baseline.
    Alphabetic,
}

/// Font size, weight, and alignment for a text draw.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in CSS pixels.
    pub size: f32,
    /// CSS font weight, `100..=900`.
    pub weight: u16,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Vertical alignment.
    pub baseline: TextBaseline,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 14.0,
            weight: 400,
            align: TextAlign::Left,
            baseline: TextBaseline::Top,
        }
    }
}

impl TextStyle {
    /// Returns a copy with a different size.
    #[must_use]
    pub fn with_size(self, size: f32) -> Self {
        Self { size, ..self }
    }

    /// Returns a copy with a different weight.
    #[must_use]
    pub fn with_weight(self, weight: u16) -> Self {
        Self { weight, ..self }
    }

    /// Returns a copy with different alignment.
    #[must_use]
    pub fn aligned(self, align: TextAlign, baseline: TextBaseline) -> Self {
        Self {
            align,
            baseline,
            ..self
        }
    }
}

/// Measured extent of a line of text.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct TextExtent {
    /// Advance width.
    pub width: f32,
    /// Distance from the baseline to the top of the glyphs.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the glyphs.
    pub descent: f32,
}

impl TextExtent {
    /// Ink height, `ascent + descent`.
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }
}

/// Text measurement supplied by the host's text engine.
pub trait TextMetrics {
    /// Measures `text` set in `style`.
    fn measure(&self, text: &str, style: &TextStyle) -> TextExtent;
}

/// Fixed-advance approximation used in tests and headless runs.
///
/// Every character is `advance_em` of the font size wide; weight is ignored.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ApproxTextMetrics {
    /// Per-character advance as a fraction of the font size.
    pub advance_em: f32,
    /// Ascent as a fraction of the font size.
    pub ascent_em: f32,
    /// Descent as a fraction of the font size.
    pub descent_em: f32,
}

impl Default for ApproxTextMetrics {
    fn default() -> Self {
        Self {
            advance_em: 0.6,
            ascent_em: 0.75,
            descent_em: 0.2,
        }
    }
}

impl TextMetrics for ApproxTextMetrics {
    fn measure(&self, text: &str, style: &TextStyle) -> TextExtent {
        let chars = text.chars().count() as f32;
        TextExtent {
            width: chars * self.advance_em * style.size,
            ascent: self.ascent_em * style.size,
            descent: self.descent_em * style.size,
        }
    }
}
