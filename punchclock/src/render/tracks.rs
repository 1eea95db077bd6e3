// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The main layer: label column, session rows and the gutter line.

use punchclock_imaging::{Color, DisplayList, TextAlign, TextBaseline, TextStyle};
use punchclock_sessions::query::{all_before, is_in_range_end_inclusive, open_start_before};
use punchclock_sessions::{Paired, is_selected, is_selected_lenient, pair};

use super::{Scene, pt, px, rect};
use crate::clock::ClockTime;
use crate::interaction::{Gesture, Intents};
use crate::model::Track;

/// Left edge of a track name inside its label cell.
const NAME_X: f64 = 44.0;
/// Room kept free on the right of a clipped name.
const NAME_PAD: f64 = 10.0;
/// Distance from the bar to the tip of the selection caret.
const CARET_GAP: f64 = 8.0;
/// Smallest bar width that still gets a caret and handles.
const DECORATION_MIN: f64 = 22.0;

pub(super) fn draw(scene: &Scene<'_>) -> DisplayList {
    let layout = scene.layout;
    let theme = &scene.config.theme;
    let mut list = DisplayList::new(px(layout.width), px(layout.main_height));

    list.fill_rect(rect(0.0, 0.0, layout.width, layout.main_height), theme.background);
    list.fill_rect(rect(0.0, 0.0, layout.label_width, layout.main_height), theme.label_background);

    for (index, track) in scene.tracks.iter().enumerate() {
        let top = layout.row_top(index);
        label(scene, &mut list, track, index, top);
        row(scene, &mut list, track, top);
    }

    let resizing = scene.interaction.hover.intents.contains(Intents::LABEL_RESIZE)
        || matches!(scene.interaction.gesture, Gesture::ResizingGutter);
    let gutter = if resizing { theme.accent } else { theme.border };
    let x = layout.label_width - 1.0;
    list.line(pt(x, 0.0), pt(x, layout.main_height), gutter, 1.0);
    list
}

fn is_selected_track(scene: &Scene<'_>, track: &Track) -> bool {
    scene.selection.track_id == Some(track.id)
}

fn label(scene: &Scene<'_>, list: &mut DisplayList, track: &Track, index: usize, top: f64) {
    let theme = &scene.config.theme;
    let width = scene.layout.label_width;
    let height = scene.layout.row_height;
    let selected = is_selected_track(scene, track);
    let hovered = scene
        .interaction
        .hover
        .pointer
        .is_some_and(|p| p.x <= width && top <= p.y && p.y <= top + height);

    let (background, name_color, badge, ordinal_color) = if selected {
        (
            theme.label_background_selected,
            theme.text_selected,
            theme.ordinal_background_selected,
            theme.ordinal_text_selected,
        )
    } else if hovered {
        (
            theme.label_background_hover,
            theme.accent,
            theme.ordinal_background_hover,
            theme.ordinal_text_hover,
        )
    } else {
        (
            theme.label_background,
            theme.text,
            theme.ordinal_background,
            theme.ordinal_text,
        )
    };
    list.fill_rect(rect(-1.0, top, width, height), background);

    let style = TextStyle::default().with_size(theme.font_size);
    let extent = scene.metrics.measure(&track.name, &style);
    let text_height = f64::from(extent.height());
    let origin = pt(NAME_X, top + 8.0);
    if f64::from(extent.width) > width - NAME_X {
        let clip = rect(NAME_X, top + 8.0, width - NAME_X - NAME_PAD, text_height + 6.0);
        list.with_clip(clip, |l| l.text(track.name.clone(), origin, style, name_color));
    } else {
        list.text(track.name.clone(), origin, style, name_color);
    }

    list.fill_rounded_rect(rect(6.0, top + 6.0, 32.0, text_height + 6.0), 4.0, badge);
    let ordinal_style = TextStyle::default()
        .with_size(theme.font_size * 0.7)
        .aligned(TextAlign::Right, TextBaseline::Top);
    list.text(
        (index + 1).to_string(),
        pt(30.0, top + 10.0),
        ordinal_style,
        ordinal_color.multiply_alpha(0.8),
    );

    list.line(pt(0.0, top), pt(width, top), theme.border, 1.0);
    list.line(pt(0.0, top + height), pt(width, top + height), theme.border, 1.0);
}

fn row(scene: &Scene<'_>, list: &mut DisplayList, track: &Track, top: f64) {
    let theme = &scene.config.theme;
    let layout = scene.layout;
    let left = layout.label_width;
    let selected = is_selected_track(scene, track);

    if selected {
        list.fill_rect(rect(left, top, layout.time_width, layout.row_height), theme.selected_row);
        hints(scene, list, track, top);
    }

    let pairs = pair(&track.sessions, scene.pairs);
    for p in &pairs {
        session(scene, list, track, p, top, selected);
    }

    if selected {
        marker_dots(scene, list, track, top);
    }

    let right = left + layout.time_width;
    list.line(pt(left, top), pt(right, top), theme.border, 1.0);
    let bottom = top + layout.row_height;
    list.line(pt(left, bottom), pt(right, bottom), theme.border, 1.0);
}

/// Corner radius for a bar, halved down so narrow bars stay rounded.
fn fitted_radius(radius: f64, width: f64) -> f64 {
    if width < radius * 2.0 { width / 2.0 } else { radius }
}

fn hints(scene: &Scene<'_>, list: &mut DisplayList, track: &Track, top: f64) {
    let Some(current) = scene.times.current else {
        return;
    };
    let theme = &scene.config.theme;
    let cfg = &scene.config.layout;
    let left = scene.layout.label_width;
    let spp = scene.view.sec_per_px();
    let style = TextStyle::default().with_size(theme.font_size * 0.8);
    let color = theme.session_hint_text.multiply_alpha(0.8);

    let pairs = pair(&track.sessions, scene.pairs);
    if !is_in_range_end_inclusive(&pairs, current)
        && let Some(open) = open_start_before(&track.sessions, current, scene.pairs)
    {
        let x = left + scene.x_of(open.as_f64()).max(0.0);
        let y = top + cfg.bar_top;
        let width = ((current.as_f64() - open.as_f64()) / spp).max(1.0);
        let radius = fitted_radius(cfg.bar_radius, width);
        list.fill_rounded_rect(rect(x, y, width, cfg.bar_height), px(radius), theme.session_hint_background);

        if all_before(&track.sessions, current) {
            let text = format!("Press 'o' to {}", scene.hints.end_hint);
            let text_height = f64::from(scene.metrics.measure(&text, &style).height());
            let origin = pt(x + width + 4.0, y + (cfg.bar_height - text_height) / 2.0);
            list.text(text, origin, style, color);
        }
    }

    if track.sessions.is_empty() {
        let text = format!("Press 'i' to {}", scene.hints.start_hint);
        let text_height = f64::from(scene.metrics.measure(&text, &style).height());
        let x = left + scene.x_of(current.as_f64()).max(0.0) + 4.0;
        let origin = pt(x, top + (scene.layout.row_height - text_height) / 2.0);
        list.text(text, origin, style, color);
    }
}

fn session(
    scene: &Scene<'_>,
    list: &mut DisplayList,
    track: &Track,
    p: &Paired<'_, ClockTime>,
    top: f64,
    selected: bool,
) {
    let theme = &scene.config.theme;
    let cfg = &scene.config.layout;
    let layout = scene.layout;
    let single = p.is_singleton();

    let (start, end) = scene
        .interaction
        .gesture
        .resize_preview()
        .filter(|r| r.track == track.id && r.start == p.start && r.end == p.end)
        .and_then(|r| r.preview)
        .unwrap_or((p.start, p.end));
    let t1 = start.as_f64();
    let t2 = if single {
        t1 + f64::from(scene.times.interval)
    } else {
        end.as_f64()
    };
    let vs = scene.view.visible_start();
    if t2 < vs || t1 > vs + layout.time_width * scene.view.sec_per_px() {
        return;
    }

    let x1 = scene.x_of(t1).max(0.0);
    let x2 = scene.x_of(t2).min(layout.time_width);
    let width = (x2 - x1).max(1.0);
    let x = layout.label_width + x1;
    let y = top + cfg.bar_top;
    let height = cfg.bar_height;
    let radius = fitted_radius(if single { cfg.single_radius } else { cfg.bar_radius }, width);
    let bar = rect(x, y, width, height);
    let tagged = single && p.tag().is_some();

    let fill = match (selected, tagged) {
        (true, true) => theme.session_single_background,
        (true, false) => theme.session_range_background,
        (false, _) => theme.session_background,
    };
    list.fill_rounded_rect(bar, px(radius), fill);

    if scene.interaction.hover.session == Some((track.id, p.start, p.end)) {
        let border = match (selected, single) {
            (true, true) => theme.session_single_hover_border,
            (true, false) => theme.session_range_hover_border,
            (false, _) => theme.session_hover_border,
        };
        list.stroke_rounded_rect(bar, px(radius), border, 1.0);
    }

    if !selected || !(width > DECORATION_MIN || single) {
        return;
    }
    let keys = scene.selection.keys();
    let accent = if single {
        theme.session_single_selected_background
    } else {
        theme.session_range_selected_background
    };

    if is_selected_lenient(p, &keys, scene.pairs) {
        list.stroke_rounded_rect(
            rect(x - 4.0, y - 4.0, width + 8.0, height + 8.0),
            px(radius + 4.0),
            accent,
            1.0,
        );
        caret(list, x + width / 2.0, y + height + CARET_GAP - 1.0, accent, theme.background);
    }

    if !single && is_selected(p, &keys, scene.pairs) {
        let inset = cfg.handle_radius + cfg.handle_inset;
        let handle = accent.multiply_alpha(0.4);
        let cy = y + height / 2.0;
        list.fill_circle(pt(x + inset, cy), px(cfg.handle_radius), handle);
        list.fill_circle(pt(x + width - inset, cy), px(cfg.handle_radius), handle);
    }
}

/// Upward caret under a selected bar, outlined in the background color.
fn caret(list: &mut DisplayList, x: f64, y: f64, fill: Color, outline: Color) {
    list.fill_triangle([pt(x - 4.0, y), pt(x + 4.0, y), pt(x, y - 6.0)], fill);
    let corners = [pt(x - 5.0, y + 0.5), pt(x + 5.0, y + 0.5), pt(x, y - 6.5)];
    for (from, to) in corners.iter().zip(corners.iter().cycle().skip(1)) {
        list.line(*from, *to, outline, 1.5);
    }
}

fn marker_dots(scene: &Scene<'_>, list: &mut DisplayList, track: &Track, top: f64) {
    let theme = &scene.config.theme;
    let cfg = &scene.config.layout;
    let left = scene.layout.label_width;
    let right = left + scene.layout.time_width;
    let y = top + cfg.bar_top + cfg.bar_height / 2.0;
    let color = theme.marker_dot.multiply_alpha(0.95);
    for seconds in track.markers.iter().filter_map(|m| m.seconds()) {
        let x = left + scene.x_of(seconds).max(0.0);
        if x < left || x > right {
            continue;
        }
        list.fill_circle(pt(x, y), 2.5, color);
    }
}
