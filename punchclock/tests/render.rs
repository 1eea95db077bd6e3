// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame contents, checked through the display lists and a recording surface.

mod common;

use common::{Engine, build, engine, engine_with, range_selection, snapshot_with, t, times, track, tracks, ui};
use kurbo::Size;
use punchclock::testing::MemoryStore;
use punchclock::{CameraImage, FitMode, Frame, Selection, Theme, TrackId};
use punchclock_imaging::{ApproxTextMetrics, DisplayList, DrawOp, ImagingOp, StateOp};
use punchclock_imaging_ref::RecordingSurface;

fn render(timeline: &Engine) -> Frame {
    timeline.render(&ApproxTextMetrics::default())
}

fn texts(list: &DisplayList) -> Vec<&str> {
    list.texts().collect()
}

fn count(list: &DisplayList, pred: impl Fn(&DrawOp) -> bool) -> usize {
    list.draws().filter(|op| pred(op)).count()
}

#[test]
fn layers_are_sized_from_the_layout() {
    let (_, timeline) = engine();
    let frame = render(&timeline);
    assert_eq!((frame.main.width(), frame.main.height()), (1000.0, 200.0));
    assert_eq!((frame.ruler.width(), frame.ruler.height()), (750.0, 32.0));
    assert_eq!((frame.overlay.width(), frame.overlay.height()), (750.0, 200.0));
    assert!(frame.main.is_balanced());
    assert!(frame.ruler.is_balanced());
    assert!(frame.overlay.is_balanced());
}

#[test]
fn labels_show_names_and_ordinals() {
    let (_, timeline) = engine();
    let frame = render(&timeline);
    let main = texts(&frame.main);
    for expected in ["Ada", "1", "Grace", "2"] {
        assert!(main.contains(&expected), "missing {expected:?} in {main:?}");
    }
    assert!(!main.contains(&"Truck 7"));
}

#[test]
fn long_names_are_clipped_to_the_label_cell() {
    let long = "Bartholomew Montgomery-Featherstonehaugh";
    let (_, timeline) = engine_with(snapshot_with(
        times(),
        vec![track(1, "employees", long, Vec::new())],
        ui(Selection::default()),
    ));
    let frame = render(&timeline);
    let clip = frame.main.ops().iter().find_map(|op| match op {
        ImagingOp::State(StateOp::PushLayer(layer)) => layer.clip,
        _ => None,
    });
    let clip = clip.expect("long name should be clipped");
    assert_eq!(clip.x0, 44.0);
    assert_eq!(clip.width(), 250.0 - 54.0);
    assert!(frame.main.is_balanced());
}

#[test]
fn gutter_line_lights_up_on_hover() {
    let (_, mut timeline) = engine();
    let theme = Theme::default();
    let gutter = |frame: &Frame| {
        frame
            .main
            .draws()
            .filter_map(|op| match op {
                DrawOp::Line { color, .. } => Some(*color),
                _ => None,
            })
            .last()
    };
    assert_eq!(gutter(&render(&timeline)), Some(theme.border));
    timeline.pointer_move(punchclock::Layer::Main, kurbo::Point::new(248.0, 100.0));
    assert_eq!(gutter(&render(&timeline)), Some(theme.accent));
}

#[test]
fn selected_range_gets_caret_and_handles() {
    let (_, timeline) = engine_with(snapshot_with(times(), tracks(), ui(range_selection())));
    let frame = render(&timeline);
    assert_eq!(count(&frame.main, |op| matches!(op, DrawOp::FillTriangle { .. })), 1);
    assert_eq!(count(&frame.main, |op| matches!(op, DrawOp::FillCircle { .. })), 2);
}

#[test]
fn half_selected_range_gets_only_the_caret() {
    let selection = Selection {
        track_id: Some(TrackId(1)),
        session_keys: vec!["in@09:00:00".to_owned()],
    };
    let (_, timeline) = engine_with(snapshot_with(times(), tracks(), ui(selection)));
    let frame = render(&timeline);
    assert_eq!(count(&frame.main, |op| matches!(op, DrawOp::FillTriangle { .. })), 1);
    assert_eq!(count(&frame.main, |op| matches!(op, DrawOp::FillCircle { .. })), 0);
}

#[test]
fn unselected_tracks_use_the_plain_bar_color() {
    let (_, timeline) = engine_with(snapshot_with(times(), tracks(), ui(Selection::default())));
    let theme = Theme::default();
    let frame = render(&timeline);
    let bars: Vec<_> = frame
        .main
        .draws()
        .filter_map(|op| match op {
            DrawOp::FillRoundedRect { shape, color } if shape.rect.y0 == 40.0 => Some(*color),
            _ => None,
        })
        .collect();
    // Ada's row: the morning range and the open punch at 13:00 on the right edge.
    assert_eq!(bars, [theme.session_background, theme.session_background]);
}

#[test]
fn empty_selected_track_hints_at_the_start_key() {
    let (_, timeline) = engine_with(snapshot_with(times(), tracks(), ui(Selection::track(Some(TrackId(2))))));
    let frame = render(&timeline);
    assert!(texts(&frame.main).contains(&"Press 'i' to punch this employee in"));
}

#[test]
fn open_punch_hints_at_the_end_key() {
    let mut day = times();
    day.current = Some(t(14, 0));
    let (_, timeline) = engine_with(snapshot_with(day, tracks(), ui(Selection::track(Some(TrackId(1))))));
    let frame = render(&timeline);
    assert!(texts(&frame.main).contains(&"Press 'o' to punch this employee out"));
}

#[test]
fn no_hints_without_a_playhead() {
    let mut day = times();
    day.current = None;
    let (_, timeline) = engine_with(snapshot_with(day, tracks(), ui(Selection::track(Some(TrackId(2))))));
    let frame = render(&timeline);
    assert!(!texts(&frame.main).iter().any(|t| t.starts_with("Press")));
    assert!(frame.overlay.is_empty());
}

#[test]
fn marker_dots_follow_the_selected_track() {
    let mut all = tracks();
    all[0].markers = vec![common::marker(1, 36_000.0), common::marker(2, 80_000.0)];
    let (_, timeline) = engine_with(snapshot_with(times(), all, ui(Selection::track(Some(TrackId(1))))));
    let frame = render(&timeline);
    let dots: Vec<_> = frame
        .main
        .draws()
        .filter_map(|op| match op {
            DrawOp::FillCircle { center, radius, .. } if *radius == 2.5 => Some(center.x),
            _ => None,
        })
        .collect();
    // 10:00 is 300 px into the time area; the 22:13 marker is off screen.
    assert_eq!(dots, [550.0]);
}

#[test]
fn ruler_has_hour_labels_bands_and_cap() {
    let (_, timeline) = engine();
    let theme = Theme::default();
    let frame = render(&timeline);
    let labels = texts(&frame.ruler);
    for hour in ["09:00", "10:00", "11:00", "12:00"] {
        assert!(labels.contains(&hour), "missing {hour} in {labels:?}");
    }

    let business = frame.ruler.draws().find_map(|op| match op {
        DrawOp::FillRect { rect, color } if *color == theme.business_hours => Some(*rect),
        _ => None,
    });
    let business = business.expect("business band");
    // 09:00 is 150 px in; 17:00 is past the right edge.
    assert_eq!((business.x0, business.x1), (150.0, 750.0));

    let cap = count(&frame.ruler, |op| {
        matches!(op, DrawOp::FillRoundedRect { color, .. } if *color == theme.accent)
    });
    assert_eq!(cap, 1);
}

#[test]
fn overlay_draws_the_playhead_only_when_visible() {
    let (_, timeline) = engine();
    let frame = render(&timeline);
    let line = frame.overlay.draws().find_map(|op| match op {
        DrawOp::Line { from, .. } => Some(from.x),
        _ => None,
    });
    assert_eq!(line, Some(225.0));

    let mut patch = ui(Selection::default());
    patch.pan_offset_sec = Some(18_000.0);
    let (_, timeline) = engine_with(snapshot_with(times(), tracks(), patch));
    assert!(render(&timeline).overlay.is_empty());
}

#[test]
fn marking_shows_the_badge() {
    let (_, mut timeline) = build(
        snapshot_with(times(), tracks(), ui(Selection::track(Some(TrackId(1))))),
        MemoryStore::default(),
    );
    let camera = CameraImage::new("cam-1", Size::new(200.0, 100.0)).with_natural(Size::new(200.0, 100.0));
    timeline.set_cameras(vec![camera], FitMode::Contain);
    assert!(!texts(&render(&timeline).overlay).iter().any(|t| t.starts_with("MARKING")));
    assert!(timeline.start_marking());
    assert!(texts(&render(&timeline).overlay).iter().any(|t| t.starts_with("MARKING")));
}

#[test]
fn presenting_twice_records_the_same_ops() {
    let (_, timeline) = engine_with(snapshot_with(times(), tracks(), ui(range_selection())));
    let frame = render(&timeline);
    let mut main = RecordingSurface::new();
    let mut ruler = RecordingSurface::new();
    let mut overlay = RecordingSurface::new();

    frame.present(&mut main, &mut ruler, &mut overlay);
    let first = main.events().to_vec();
    frame.present(&mut main, &mut ruler, &mut overlay);

    assert_eq!(main.frames(), 2);
    assert_eq!(main.events(), first.as_slice());
    assert_eq!(ruler.size(), (750.0, 32.0));
    assert!(main.draws().all(|(_, state)| state.opacity == 1.0));
    // The same state renders to the same frame.
    assert_eq!(render(&timeline), frame);
}

#[test]
fn resize_preview_is_drawn_instead_of_the_stored_range() {
    let (_, mut timeline) = engine_with(snapshot_with(times(), tracks(), ui(range_selection())));
    let handle = kurbo::Point::new(common::main_x(t(12, 0)) - 6.0, common::BAR0_Y);
    timeline.pointer_down(punchclock::Layer::Main, handle);
    timeline.pointer_move(punchclock::Layer::Main, kurbo::Point::new(handle.x + 50.0, handle.y));

    let theme = Theme::default();
    let frame = render(&timeline);
    let bar = frame.main.draws().find_map(|op| match op {
        DrawOp::FillRoundedRect { shape, color } if *color == theme.session_range_background => Some(shape.rect),
        _ => None,
    });
    let bar = bar.expect("range bar");
    assert_eq!((bar.x0, bar.x1), (400.0, 900.0));
}
