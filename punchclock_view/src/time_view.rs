// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::Range;

use kurbo::Point;

use crate::modes::{Snap, ZoomLimits};

/// Horizontal viewport over a window of seconds.
///
/// `TimeView` maps the buffered time window onto `0..width` pixels. At zoom
/// `1.0` the whole window fits the width exactly; larger zoom factors show a
/// narrower slice selected by the pan offset.
///
/// The pan offset is measured in seconds from the buffered start and is kept
/// clamped so that `visible_start()` lies in
/// `[window.start, window.end - sec_per_px() * width]`. When the visible span is
/// wider than the window (zoom below `1.0`) the view pins to the window start.
#[derive(Clone, Debug)]
pub struct TimeView {
    window: Range<f64>,
    width: f64,
    zoom: f64,
    pan: f64,
    limits: ZoomLimits,
    snap: Snap,
}

impl TimeView {
    /// Creates a view over the buffered `window` drawn into `width` pixels.
    ///
    /// - Initial zoom is `1.0` (clamped into the default [`ZoomLimits`]).
    /// - Initial pan is zero, so the visible start is `window.start`.
    /// - Widths that are not strictly positive are treated as one pixel.
    #[must_use]
    pub fn new(window: Range<f64>, width: f64) -> Self {
        let limits = ZoomLimits::default();
        Self {
            window: normalize_window(window),
            width: sanitize_width(width),
            zoom: limits.clamp(1.0),
            pan: 0.0,
            limits,
            snap: Snap::None,
        }
    }

    /// Returns the buffered window in seconds.
    #[must_use]
    pub fn window(&self) -> Range<f64> {
        self.window.clone()
    }

    /// Replaces the buffered window and re-clamps the pan offset.
    pub fn set_window(&mut self, window: Range<f64>) {
        self.window = normalize_window(window);
        self.clamp_pan();
    }

    /// Returns the raster width in pixels.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Sets the raster width in pixels and re-clamps the pan offset.
    pub fn set_width(&mut self, width: f64) {
        self.width = sanitize_width(width);
        self.clamp_pan();
    }

    /// Returns the current zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Returns the configured zoom limits.
    #[must_use]
    pub fn zoom_limits(&self) -> ZoomLimits {
        self.limits
    }

    /// Sets new zoom limits and clamps the current zoom into them.
    pub fn set_zoom_limits(&mut self, limits: ZoomLimits) {
        self.limits = ZoomLimits::new(limits.min, limits.max);
        self.set_zoom(self.zoom);
    }

    /// Sets the zoom factor, clamping it into the configured limits.
    ///
    /// The pan offset is re-clamped afterwards since the visible span changed.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = self.limits.clamp(zoom);
        self.clamp_pan();
    }

    /// Returns the snapping used by [`TimeView::pixel_to_time_snapped`].
    #[must_use]
    pub fn snap(&self) -> Snap {
        self.snap
    }

    /// Sets the snapping used by [`TimeView::pixel_to_time_snapped`].
    pub fn set_snap(&mut self, snap: Snap) {
        self.snap = snap;
    }

    /// Returns the pan offset in seconds from the buffered start.
    #[must_use]
    pub fn pan_offset(&self) -> f64 {
        self.pan
    }

    /// Sets the pan offset in seconds and clamps it.
    ///
    /// Returns `true` when clamping changed the requested value, so callers
    /// holding their own copy of the offset know to write the correction back.
    pub fn set_pan_offset(&mut self, seconds: f64) -> bool {
        self.pan = if seconds.is_finite() { seconds } else { 0.0 };
        let requested = self.pan;
        self.clamp_pan();
        self.pan != requested
    }

    /// Pans relative to an offset captured at drag start.
    ///
    /// `dx` is the horizontal pointer travel in pixels; dragging right moves the
    /// view back in time.
    pub fn pan_from(&mut self, anchor_offset: f64, dx: f64) -> bool {
        self.set_pan_offset(anchor_offset - dx * self.sec_per_px())
    }

    /// Pans by a number of seconds.
    pub fn pan_by_seconds(&mut self, seconds: f64) -> bool {
        if seconds == 0.0 {
            return false;
        }
        self.set_pan_offset(self.pan + seconds)
    }

    /// Start of the buffered window.
    #[must_use]
    pub fn buffered_start(&self) -> f64 {
        self.window.start
    }

    /// End of the buffered window.
    #[must_use]
    pub fn buffered_end(&self) -> f64 {
        self.window.end
    }

    /// Length of the buffered window in seconds.
    #[must_use]
    pub fn total_seconds(&self) -> f64 {
        self.window.end - self.window.start
    }

    /// Seconds covered by one pixel at the current zoom.
    #[must_use]
    pub fn sec_per_px(&self) -> f64 {
        self.total_seconds() / self.width / self.zoom
    }

    /// Seconds covered by the full width at the current zoom.
    #[must_use]
    pub fn visible_span(&self) -> f64 {
        self.sec_per_px() * self.width
    }

    /// First visible second.
    #[must_use]
    pub fn visible_start(&self) -> f64 {
        self.window.start + self.pan
    }

    /// Last visible second.
    #[must_use]
    pub fn visible_end(&self) -> f64 {
        self.visible_start() + self.visible_span()
    }

    /// Visible range of seconds.
    #[must_use]
    pub fn visible_range(&self) -> Range<f64> {
        self.visible_start()..self.visible_end()
    }

    /// Returns `true` if `t` lies within the visible range, ends included.
    #[must_use]
    pub fn is_visible(&self, t: f64) -> bool {
        t >= self.visible_start() && t <= self.visible_end()
    }

    /// Converts a time in seconds to a pixel position.
    #[must_use]
    pub fn time_to_pixel(&self, t: f64) -> f64 {
        (t - self.visible_start()) / self.sec_per_px()
    }

    /// Converts a pixel position to a time in seconds.
    #[must_use]
    pub fn pixel_to_time(&self, x: f64) -> f64 {
        self.visible_start() + x * self.sec_per_px()
    }

    /// Convenience conversion from a `Point`, using its X coordinate.
    #[must_use]
    pub fn point_to_time(&self, pt: Point) -> f64 {
        self.pixel_to_time(pt.x)
    }

    /// Converts a pixel position to a time and applies the configured snap.
    #[must_use]
    pub fn pixel_to_time_snapped(&self, x: f64) -> f64 {
        self.snap.apply(self.pixel_to_time(x))
    }

    /// Applies the configured snap to a time in seconds.
    #[must_use]
    pub fn snap_time(&self, t: f64) -> f64 {
        self.snap.apply(t)
    }

    /// Converts a horizontal pixel delta into whole snap steps of seconds.
    #[must_use]
    pub fn dx_to_snapped_seconds(&self, dx: f64) -> f64 {
        self.snap.apply_delta(dx * self.sec_per_px())
    }

    /// Clamps a time into the buffered window.
    #[must_use]
    pub fn clamp_to_window(&self, t: f64) -> f64 {
        t.clamp(self.window.start, self.window.end)
    }

    /// Zooms to `zoom` while keeping the time under pixel `x` fixed.
    ///
    /// The anchor can drift when the resulting pan has to be clamped.
    pub fn zoom_about_pixel(&mut self, x: f64, zoom: f64) {
        let anchor = self.pixel_to_time(x);
        self.zoom = self.limits.clamp(zoom);
        let start = anchor - x * self.sec_per_px();
        self.set_pan_offset(start - self.window.start);
    }

    /// Multiplies the zoom by `factor` about pixel `x`.
    pub fn zoom_by_about_pixel(&mut self, x: f64, factor: f64) {
        if factor <= 0.0 || !factor.is_finite() {
            return;
        }
        self.zoom_about_pixel(x, self.zoom * factor);
    }

    /// Pan offset that would place `t` at the horizontal center, clamped.
    #[must_use]
    pub fn centered_offset(&self, t: f64) -> f64 {
        let start = t - self.visible_span() * 0.5;
        self.clamped_offset(start - self.window.start)
    }

    /// Snapshot of the current state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> TimeViewDebugInfo {
        TimeViewDebugInfo {
            window: self.window.clone(),
            width: self.width,
            visible_range: self.visible_range(),
            sec_per_px: self.sec_per_px(),
            zoom: self.zoom,
            pan: self.pan,
            limits: self.limits,
            snap: self.snap,
        }
    }

    fn max_offset(&self) -> f64 {
        (self.total_seconds() - self.visible_span()).max(0.0)
    }

    fn clamped_offset(&self, offset: f64) -> f64 {
        offset.clamp(0.0, self.max_offset())
    }

    fn clamp_pan(&mut self) {
        self.pan = self.clamped_offset(self.pan);
    }
}

/// Debug snapshot of a [`TimeView`] state.
#[derive(Clone, Debug)]
pub struct TimeViewDebugInfo {
    /// Buffered window in seconds.
    pub window: Range<f64>,
    /// Raster width in pixels.
    pub width: f64,
    /// Seconds currently visible.
    pub visible_range: Range<f64>,
    /// Seconds per pixel at the current zoom.
    pub sec_per_px: f64,
    /// Current zoom factor.
    pub zoom: f64,
    /// Pan offset in seconds from the buffered start.
    pub pan: f64,
    /// Zoom limits.
    pub limits: ZoomLimits,
    /// Snap applied by snapped conversions.
    pub snap: Snap,
}

fn sanitize_width(width: f64) -> f64 {
    if width.is_finite() && width > 0.0 {
        width
    } else {
        1.0
    }
}

fn normalize_window(window: Range<f64>) -> Range<f64> {
    if window.end > window.start {
        window
    } else {
        // A degenerate window still needs a non-zero span for the math to hold.
        window.start..window.start + 1.0
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::{Snap, TimeView, ZoomLimits};

    const HOUR: f64 = 3600.0;

    fn workday() -> TimeView {
        // 08:00..18:00 with a 30 minute buffer on each side.
        TimeView::new(8.0 * HOUR - 1800.0..18.0 * HOUR + 1800.0, 1100.0)
    }

    #[test]
    fn zoom_one_fits_buffered_window() {
        let view = workday();
        assert_eq!(view.visible_start(), view.buffered_start());
        assert!((view.visible_end() - view.buffered_end()).abs() < 1e-9);
        assert!((view.sec_per_px() - 11.0 * HOUR / 1100.0).abs() < 1e-12);
    }

    #[test]
    fn pixel_time_roundtrip() {
        let mut view = workday();
        view.set_zoom(2.5);
        view.set_pan_offset(4321.0);

        for x in [0.0, 1.0, 333.3, 1099.0] {
            let back = view.time_to_pixel(view.pixel_to_time(x));
            assert!((back - x).abs() < 1e-9, "x={x} came back as {back}");
        }
    }

    #[test]
    fn zoom_is_clamped() {
        let mut view = workday();
        view.set_zoom(10.0);
        assert_eq!(view.zoom(), 3.0);
        view.set_zoom(0.1);
        assert_eq!(view.zoom(), 0.8);
        view.set_zoom(f64::NAN);
        assert_eq!(view.zoom(), 0.8);
    }

    #[test]
    fn pan_stays_inside_window_for_any_delta() {
        let mut view = workday();
        view.set_zoom(2.0);
        let deltas = [-1.0e9, 250.0, -13.5, 9999.0, 1.0e9, -0.5, 0.0, 77.7];
        let mut anchor = view.pan_offset();
        for dx in deltas {
            view.pan_from(anchor, dx);
            anchor = view.pan_offset();
            let max_start = view.buffered_end() - view.sec_per_px() * view.width();
            assert!(view.visible_start() >= view.buffered_start() - 1e-9);
            assert!(view.visible_start() <= max_start + 1e-9);
        }
    }

    #[test]
    fn pan_reports_correction() {
        let mut view = workday();
        view.set_zoom(2.0);
        assert!(!view.set_pan_offset(100.0));
        assert!(view.set_pan_offset(-5.0));
        assert_eq!(view.pan_offset(), 0.0);
        assert!(view.set_pan_offset(1.0e9));
        assert!((view.visible_end() - view.buffered_end()).abs() < 1e-6);
    }

    #[test]
    fn zoomed_out_view_pins_to_window_start() {
        let mut view = workday();
        view.set_zoom(0.8);
        view.set_pan_offset(500.0);
        assert_eq!(view.visible_start(), view.buffered_start());
        assert!(view.visible_end() > view.buffered_end());
    }

    #[test]
    fn zoom_about_pixel_keeps_anchor_time() {
        let mut view = workday();
        view.set_zoom(1.5);
        view.set_pan_offset(2.0 * HOUR);

        let x = 420.0;
        let before = view.pixel_to_time(x);
        view.zoom_by_about_pixel(x, 1.05);
        let after = view.pixel_to_time(x);
        assert!((before - after).abs() < 1e-6, "{before} != {after}");

        view.zoom_by_about_pixel(x, 0.95);
        assert!((view.pixel_to_time(x) - before).abs() < 1e-6);
    }

    #[test]
    fn snapping_is_anchored_at_origin() {
        let mut view = TimeView::new(0.0..100.0 * 60.0, 100.0);
        view.set_snap(Snap::Interval {
            origin: 7.0,
            step: 60.0,
        });
        // One pixel is one minute here.
        let t = view.pixel_to_time_snapped(10.2);
        assert_eq!(t, 607.0);
        assert_eq!(view.snap_time(36.0), 7.0);
        assert_eq!(view.snap_time(38.0), 67.0);
    }

    #[test]
    fn snapped_deltas_round_to_steps() {
        let mut view = TimeView::new(0.0..6000.0, 100.0);
        view.set_snap(Snap::Interval {
            origin: 0.0,
            step: 60.0,
        });
        assert_eq!(view.dx_to_snapped_seconds(1.4), 60.0);
        assert_eq!(view.dx_to_snapped_seconds(-2.6), -180.0);
        view.set_snap(Snap::None);
        assert_eq!(view.dx_to_snapped_seconds(1.5), 90.0);
    }

    #[test]
    fn centered_offset_is_clamped() {
        let mut view = workday();
        view.set_zoom(3.0);
        let offset = view.centered_offset(13.0 * HOUR);
        view.set_pan_offset(offset);
        let mid = (view.visible_start() + view.visible_end()) * 0.5;
        assert!((mid - 13.0 * HOUR).abs() < 1e-6);

        assert_eq!(view.centered_offset(0.0), 0.0);
    }

    #[test]
    fn limits_normalize_and_reclamp() {
        let mut view = workday();
        view.set_zoom(3.0);
        view.set_zoom_limits(ZoomLimits::new(2.0, 1.0));
        assert_eq!(view.zoom_limits(), ZoomLimits { min: 1.0, max: 2.0 });
        assert_eq!(view.zoom(), 2.0);
    }

    #[test]
    fn degenerate_inputs_stay_finite() {
        let view = TimeView::new(10.0..10.0, 0.0);
        assert_eq!(view.width(), 1.0);
        assert!(view.sec_per_px().is_finite());
        assert!(view.sec_per_px() > 0.0);
    }

    #[test]
    fn point_to_time_ignores_y() {
        let view = workday();
        let a = view.point_to_time(Point::new(100.0, 0.0));
        let b = view.point_to_time(Point::new(100.0, 999.0));
        assert_eq!(a, b);
        let info = view.debug_info();
        assert_eq!(info.width, 1100.0);
        assert_eq!(info.snap, Snap::None);
    }
}
