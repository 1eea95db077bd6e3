// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer sizes and hit geometry.
//!
//! The widget is three stacked layers sharing one horizontal time axis:
//!
//! - the *main* layer, full width, holding the label column on the left and the
//!   session rows to its right; the first row is left empty for the header,
//! - the *ruler* layer above it, spanning the time area only,
//! - the *overlay* layer on top of the time area.
//!
//! Pointer positions handed to the engine are local to the layer they hit.

use kurbo::{Point, Rect, Size};
use punchclock_view::TimeView;

use crate::config::LayoutConfig;

/// Size of the host's widget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Full widget width, label column included.
    pub width: f64,
    /// Height available to the main layer; it grows past this with more tracks.
    pub height: f64,
    /// Height of the ruler layer.
    pub ruler_height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 320.0,
            ruler_height: 32.0,
        }
    }
}

/// Resolved layer geometry for one track count and label width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    /// Full widget width.
    pub width: f64,
    /// Label column width.
    pub label_width: f64,
    /// Width of the time area, the ruler and the overlay.
    pub time_width: f64,
    /// Track row height.
    pub row_height: f64,
    /// Height of the main layer.
    pub main_height: f64,
    /// Height of the ruler layer.
    pub ruler_height: f64,
    /// Number of displayed tracks.
    pub track_count: usize,
}

impl Layout {
    /// Lays out `track_count` rows inside `viewport`.
    #[must_use]
    pub fn new(viewport: Viewport, label_width: f64, row_height: f64, track_count: usize) -> Self {
        let rows = row_height + row_height * track_count as f64;
        Self {
            width: viewport.width,
            label_width,
            time_width: (viewport.width - label_width).max(1.0),
            row_height,
            main_height: rows.max(viewport.height),
            ruler_height: viewport.ruler_height,
            track_count,
        }
    }

    /// Top of row `index`.
    #[must_use]
    pub fn row_top(&self, index: usize) -> f64 {
        self.row_height + self.row_height * index as f64
    }

    /// Row under main-layer `y`, if it holds a track.
    #[must_use]
    pub fn row_at(&self, y: f64) -> Option<usize> {
        let row = ((y - self.row_height) / self.row_height).floor();
        if row < 0.0 || !row.is_finite() {
            return None;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "row is a non-negative whole number"
        )]
        let row = row as usize;
        (row < self.track_count).then_some(row)
    }

    /// Whether main-layer `x` is on the label column's resize strip.
    #[must_use]
    pub fn in_gutter(&self, x: f64, gutter_width: f64) -> bool {
        self.label_width - gutter_width < x && x < self.label_width
    }

    /// Converts a main-layer `x` into time-area pixels.
    #[must_use]
    pub fn time_x(&self, main_x: f64) -> f64 {
        main_x - self.label_width
    }

    /// The marker cap drawn at ruler `x`.
    #[must_use]
    pub fn cap_rect(&self, x: f64, config: &LayoutConfig) -> Rect {
        let y = self.ruler_height - config.cap_height - config.cap_bottom;
        Rect::from_origin_size(
            (x - config.cap_width * 0.5, y),
            (config.cap_width, config.cap_height),
        )
    }

    /// Hover bounds of a session entry on row `index`, in main-layer pixels.
    ///
    /// Entries are at least one snap interval wide so singletons can be hit.
    pub(crate) fn session_bounds(
        &self,
        view: &TimeView,
        config: &LayoutConfig,
        index: usize,
        (start, end): (f64, f64),
        interval: f64,
    ) -> Rect {
        let vs = view.visible_start();
        let spp = view.sec_per_px();
        let x1 = self.label_width + ((start - vs) / spp).max(0.0);
        let x2 = self.label_width + ((end - vs) / spp).max(0.0);
        let width = (interval / spp).max(x2 - x1);
        let y = self.row_top(index) + config.bar_top;
        Rect::from_origin_size((x1, y), (width, config.bar_height))
    }
}

/// Centers of the start and end resize handles on a range's bounds.
pub(crate) fn handle_centers(bounds: Rect, config: &LayoutConfig) -> [Point; 2] {
    let inset = config.handle_radius + config.handle_inset;
    let y = bounds.center().y;
    [Point::new(bounds.x0 + inset, y), Point::new(bounds.x1 - inset, y)]
}

/// Whether `p` lies in `rect`, edges included.
pub(crate) fn contains_inclusive(rect: Rect, p: Point) -> bool {
    rect.x0 <= p.x && p.x <= rect.x1 && rect.y0 <= p.y && p.y <= rect.y1
}

/// How a camera frame is fitted into its element box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FitMode {
    /// Letterboxed, fully visible.
    Contain,
    /// Cropped to fill the box.
    #[default]
    Cover,
    /// Scaled to the box ignoring aspect ratio.
    Stretch,
}

/// A camera frame shown next to the timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraImage {
    /// Camera identity, sent with markers.
    pub id: String,
    /// Size of the element box, in the coordinates pointer events use.
    pub size: Size,
    /// Intrinsic size of the frame, once loaded.
    pub natural: Option<Size>,
}

impl CameraImage {
    /// A camera whose frame has not loaded yet.
    pub fn new(id: impl Into<String>, size: Size) -> Self {
        Self {
            id: id.into(),
            size,
            natural: None,
        }
    }

    /// Sets the intrinsic frame size.
    #[must_use]
    pub fn with_natural(mut self, natural: Size) -> Self {
        self.natural = Some(natural);
        self
    }

    /// Whether a frame has loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.natural.is_some_and(|n| n.width > 0.0 && n.height > 0.0)
    }

    /// The rectangle the frame is drawn into, in element coordinates.
    #[must_use]
    pub fn draw_box(&self, fit: FitMode) -> Rect {
        let full = self.size.to_rect();
        let Some(natural) = self.natural.filter(|n| n.width > 0.0 && n.height > 0.0) else {
            return full;
        };
        if fit == FitMode::Stretch || self.size.width <= 0.0 || self.size.height <= 0.0 {
            return full;
        }
        let image_ar = natural.width / natural.height;
        let box_ar = self.size.width / self.size.height;
        // Contain fits the longer side; cover fills the shorter one.
        let fit_width = (image_ar > box_ar) == (fit == FitMode::Contain);
        let draw = if fit_width {
            Size::new(self.size.width, self.size.width / image_ar)
        } else {
            Size::new(self.size.height * image_ar, self.size.height)
        };
        let origin = Point::new(
            (self.size.width - draw.width) * 0.5,
            (self.size.height - draw.height) * 0.5,
        );
        Rect::from_origin_size(origin, draw)
    }

    /// Maps an element-local point to `0..=1` frame coordinates.
    #[must_use]
    pub fn normalize(&self, pos: Point, fit: FitMode) -> Point {
        let b = self.draw_box(fit);
        let norm = |v: f64, origin: f64, len: f64| {
            if len > 0.0 {
                ((v - origin) / len).clamp(0.0, 1.0)
            } else {
                0.0
            }
        };
        Point::new(norm(pos.x, b.x0, b.width()), norm(pos.y, b.y0, b.height()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(tracks: usize) -> Layout {
        Layout::new(Viewport::default(), 200.0, 32.0, tracks)
    }

    #[test]
    fn rows_start_below_the_header() {
        let l = layout(3);
        assert_eq!(l.row_top(0), 32.0);
        assert_eq!(l.row_at(10.0), None);
        assert_eq!(l.row_at(32.0), Some(0));
        assert_eq!(l.row_at(127.9), Some(2));
        assert_eq!(l.row_at(128.0), None);
    }

    #[test]
    fn main_layer_grows_with_tracks() {
        assert_eq!(layout(2).main_height, 320.0);
        assert_eq!(layout(20).main_height, 32.0 * 21.0);
        assert_eq!(layout(0).time_width, 600.0);
    }

    #[test]
    fn gutter_is_exclusive() {
        let l = layout(1);
        assert!(l.in_gutter(198.0, 4.0));
        assert!(!l.in_gutter(196.0, 4.0));
        assert!(!l.in_gutter(200.0, 4.0));
    }

    #[test]
    fn cap_sits_above_the_bottom() {
        let l = layout(1);
        let cap = l.cap_rect(100.0, &LayoutConfig::default());
        assert_eq!(cap, Rect::new(90.0, 18.0, 110.0, 28.0));
    }

    #[test]
    fn session_bounds_have_a_minimum_width() {
        let l = layout(2);
        let view = TimeView::new(0.0..600.0, l.time_width);
        let cfg = LayoutConfig::default();
        // One second per pixel.
        let b = l.session_bounds(&view, &cfg, 1, (100.0, 100.0), 60.0);
        assert_eq!(b, Rect::new(300.0, 72.0, 360.0, 86.0));
        let b = l.session_bounds(&view, &cfg, 0, (100.0, 400.0), 60.0);
        assert_eq!(b.width(), 300.0);

        let [left, right] = handle_centers(b, &cfg);
        assert_eq!(left, Point::new(306.0, 47.0));
        assert_eq!(right, Point::new(594.0, 47.0));
        assert!(contains_inclusive(b, Point::new(600.0, 54.0)));
    }

    #[test]
    fn fit_modes_map_the_frame() {
        // 16:9 frame in a square box.
        let cam = CameraImage::new("c", Size::new(100.0, 100.0)).with_natural(Size::new(160.0, 90.0));

        let contain = cam.draw_box(FitMode::Contain);
        assert_eq!(contain.width(), 100.0);
        assert!((contain.y0 - 21.875).abs() < 1e-9);

        let cover = cam.draw_box(FitMode::Cover);
        assert_eq!(cover.height(), 100.0);
        assert!((cover.width() - 1600.0 / 9.0).abs() < 1e-9);

        assert_eq!(cam.draw_box(FitMode::Stretch), Rect::new(0.0, 0.0, 100.0, 100.0));

        let p = cam.normalize(Point::new(50.0, 0.0), FitMode::Contain);
        assert_eq!(p, Point::new(0.5, 0.0));
        let p = cam.normalize(Point::new(50.0, 50.0), FitMode::Cover);
        assert!((p.x - 0.5).abs() < 1e-9 && (p.y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn unloaded_frames_use_the_box() {
        let cam = CameraImage::new("c", Size::new(40.0, 20.0));
        assert!(!cam.is_loaded());
        assert_eq!(cam.normalize(Point::new(10.0, 30.0), FitMode::Cover), Point::new(0.25, 1.0));
    }
}
