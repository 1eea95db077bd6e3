// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The ruler layer: hour bands, ticks, labels and the marker cap.

use punchclock_axis::LabelThinner;
use punchclock_imaging::{Color, DisplayList, TextAlign, TextBaseline, TextStyle};

use super::{Scene, pt, px, rect};
use crate::clock::ClockTime;

/// Height of the business and actual hour bands.
const BAND_HEIGHT: f64 = 2.0;
/// Horizontal spacing of the grip lines on the cap.
const GRIP_SPACING: f64 = 4.0;
/// Length of a grip line.
const GRIP_LENGTH: f64 = 4.0;

pub(super) fn draw(scene: &Scene<'_>) -> DisplayList {
    let theme = &scene.config.theme;
    let width = scene.layout.time_width;
    let height = scene.layout.ruler_height;
    let mut list = DisplayList::new(px(width), px(height));

    list.line(pt(0.0, 0.0), pt(width, 0.0), theme.border, 1.0);

    let times = scene.times;
    band(scene, &mut list, times.business_start, times.business_end, 1.0, theme.business_hours);
    band(scene, &mut list, times.actual_start, times.actual_end, 4.0, theme.actual_hours);

    ticks(scene, &mut list);

    if let Some(current) = times.current {
        cap(scene, &mut list, current);
    }
    list
}

fn band(
    scene: &Scene<'_>,
    list: &mut DisplayList,
    start: Option<ClockTime>,
    end: Option<ClockTime>,
    y: f64,
    color: Color,
) {
    let (Some(start), Some(end)) = (start, end) else {
        return;
    };
    let (start, end) = (start.as_f64(), end.as_f64());
    let x1 = if start < scene.view.visible_start() {
        0.0
    } else {
        scene.x_of(start)
    };
    let x2 = if end > scene.view.visible_end() {
        scene.layout.time_width
    } else {
        scene.x_of(end)
    };
    list.fill_rect(rect(x1, y, x2 - x1, BAND_HEIGHT), color);
}

fn ticks(scene: &Scene<'_>, list: &mut DisplayList) {
    let theme = &scene.config.theme;
    let width = scene.layout.time_width;
    let height = scene.layout.ruler_height;
    let ladder = scene.config.tick_policy().ladder(scene.view.sec_per_px());
    let mut thinner = LabelThinner::with_gap(width, scene.config.ruler.label_gap);
    let baseline = 2.0 + (height - 2.0).min(14.0);

    for tick in ladder.ticks(scene.view.visible_start(), scene.view.visible_end()) {
        list.line(
            pt(tick.x, 0.0),
            pt(tick.x, tick.height.min(height - 2.0)),
            theme.border,
            1.0,
        );

        let Some(level) = tick.label else {
            continue;
        };
        let text = tick.hh_mm().to_string();
        let style = TextStyle::default()
            .with_size((theme.ruler_font_size * level.font_scale()).floor())
            .aligned(TextAlign::Center, TextBaseline::Alphabetic);
        let half = f64::from(scene.metrics.measure(&text, &style).width) / 2.0;
        if !thinner.admit(tick.x - half, tick.x + half) {
            continue;
        }
        let color = if level.is_hour() {
            theme.time_labels_hours
        } else {
            theme.time_labels_minutes
        };
        list.text(text, pt(tick.x, baseline), style, color.multiply_alpha(level.alpha()));
    }
}

fn cap(scene: &Scene<'_>, list: &mut DisplayList, current: ClockTime) {
    let t = current.as_f64();
    if t < scene.view.visible_start() || t > scene.view.visible_end() {
        return;
    }
    let theme = &scene.config.theme;
    let cfg = &scene.config.layout;
    let x = scene.x_of(t);
    list.line(pt(x, 0.0), pt(x, scene.layout.ruler_height), theme.accent, 1.0);

    let bounds = scene.layout.cap_rect(x, cfg);
    let cap = rect(bounds.x0, bounds.y0, bounds.width(), bounds.height());
    list.fill_rounded_rect(cap, px(cfg.cap_radius), theme.accent);
    list.stroke_rounded_rect(cap, px(cfg.cap_radius), theme.accent, 1.0);

    let top = bounds.y0 + (bounds.height() - GRIP_LENGTH) / 2.0;
    for i in [-1.0, 0.0, 1.0] {
        let gx = x + i * GRIP_SPACING;
        list.line(pt(gx, top), pt(gx, top + GRIP_LENGTH), theme.cap_grip, 1.5);
    }
}
