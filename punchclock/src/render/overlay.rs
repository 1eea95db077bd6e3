// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The overlay layer: playhead line and marking badge.

use punchclock_imaging::{DisplayList, TextAlign, TextBaseline, TextStyle};

use super::{Scene, pt, px, rect};

/// Badge text shown while marking is armed or in progress.
const MARKING_BADGE: &str = "MARKING\u{2026} click & drag on a camera";

const BADGE_HEIGHT: f64 = 22.0;
const BADGE_PADDING: f64 = 10.0;
const BADGE_MARGIN: f64 = 10.0;

pub(super) fn draw(scene: &Scene<'_>) -> DisplayList {
    let theme = &scene.config.theme;
    let width = scene.layout.time_width;
    let height = scene.layout.main_height;
    let mut list = DisplayList::new(px(width), px(height));

    if let Some(current) = scene.times.current.map(|c| c.as_f64())
        && scene.view.is_visible(current)
    {
        let x = scene.x_of(current);
        list.line(pt(x, 0.0), pt(x, height), theme.marker, 0.75);
    }

    if scene.interaction.gesture.is_marking() {
        let style = TextStyle::default()
            .with_size(11.0)
            .with_weight(600)
            .aligned(TextAlign::Left, TextBaseline::Middle);
        let text_width = f64::from(scene.metrics.measure(MARKING_BADGE, &style).width);
        let badge_width = text_width + BADGE_PADDING * 2.0;
        let x0 = width - badge_width - BADGE_MARGIN;
        let y0 = BADGE_MARGIN;
        list.fill_rounded_rect(
            rect(x0, y0, badge_width, BADGE_HEIGHT),
            8.0,
            theme.marking_badge.multiply_alpha(0.92),
        );
        list.text(
            MARKING_BADGE,
            pt(x0 + BADGE_PADDING, y0 + BADGE_HEIGHT / 2.0),
            style,
            theme.marking_text,
        );
    }
    list
}
