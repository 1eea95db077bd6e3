// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer and keyboard gestures.
//!
//! Positions are layer-local: main-layer `x` includes the 250 px label
//! column, ruler `x` starts at the time area.

mod common;

use common::{BAR0_Y, ROW0, engine, engine_with, main_x, range_selection, snapshot_with, t, times, tracks, ui};
use cursor_icon::CursorIcon;
use kurbo::{Point, Size};
use punchclock::testing::Command;
use punchclock::{
    CameraImage, EngineEvent, FitMode, Gesture, Intents, Key, LABEL_WIDTH_KEY, Layer, MARKING_HINT, MarkingPhase,
    RangeUpdate, Selection, TrackId,
};
use serde_json::Value;

fn camera() -> CameraImage {
    CameraImage::new("cam-1", Size::new(200.0, 100.0)).with_natural(Size::new(400.0, 200.0))
}

#[test]
fn clicking_a_bar_selects_its_range() {
    let (_, mut timeline) = engine();
    let pos = Point::new(500.0, BAR0_Y);
    timeline.pointer_down(Layer::Main, pos);
    timeline.pointer_up(Layer::Main, pos);
    timeline.click(Layer::Main, pos);

    assert_eq!(timeline.ui().selection, range_selection());
    let events = timeline.drain_events();
    assert!(events.iter().any(|e| matches!(e, EngineEvent::Change(_))));
}

#[test]
fn hovering_a_bar_sets_intent_and_cursor() {
    let (_, mut timeline) = engine();
    timeline.pointer_move(Layer::Main, Point::new(main_x(t(10, 0)), BAR0_Y));
    let hover = timeline.interaction().hover;
    assert_eq!(hover.session, Some((TrackId(1), t(9, 0), t(12, 0))));
    assert!(hover.intents.contains(Intents::SESSION_OVER));
    assert_eq!(timeline.cursor(), CursorIcon::Pointer);

    // Bars of unselected tracks are not hoverable.
    timeline.pointer_move(Layer::Main, Point::new(main_x(t(10, 0)), BAR0_Y + 32.0));
    assert_eq!(timeline.interaction().hover.session, None);

    timeline.pointer_leave();
    assert_eq!(timeline.interaction().hover.pointer, None);
    assert_eq!(timeline.cursor(), CursorIcon::Default);
}

#[test]
fn clicking_a_label_toggles_track_selection() {
    let (_, mut timeline) = engine();
    let grace = Point::new(100.0, ROW0 + 32.0 + 10.0);
    timeline.click(Layer::Main, grace);
    assert_eq!(timeline.ui().selection.track_id, Some(TrackId(2)));
    assert_eq!(timeline.selected_track().map(|t| t.name.as_str()), Some("Grace"));

    timeline.click(Layer::Main, grace);
    assert_eq!(timeline.ui().selection.track_id, None);
    assert!(!timeline.toolbar().track_selected);
}

#[test]
fn clicking_empty_row_space_keeps_the_track() {
    let (_, mut timeline) = engine_with(snapshot_with(times(), tracks(), ui(range_selection())));
    timeline.click(Layer::Main, Point::new(main_x(t(12, 30)), BAR0_Y));
    assert_eq!(timeline.ui().selection, Selection::track(Some(TrackId(1))));
}

#[test]
fn ruler_click_after_a_pan_is_not_a_click() {
    let (_, mut timeline) = engine_with(snapshot_with(times(), tracks(), ui(range_selection())));
    timeline.pointer_down(Layer::Ruler, Point::new(400.0, 5.0));
    assert_eq!(timeline.cursor(), CursorIcon::Grabbing);
    timeline.pointer_move(Layer::Ruler, Point::new(300.0, 5.0));
    timeline.pointer_up(Layer::Ruler, Point::new(300.0, 5.0));
    timeline.click(Layer::Ruler, Point::new(300.0, 5.0));
    assert_eq!(timeline.ui().selection.session_keys.len(), 2);

    // A plain click on the ruler drops the range but keeps the track.
    timeline.pointer_down(Layer::Ruler, Point::new(300.0, 25.0));
    timeline.pointer_up(Layer::Ruler, Point::new(300.0, 25.0));
    timeline.click(Layer::Ruler, Point::new(300.0, 25.0));
    assert_eq!(timeline.ui().selection, Selection::track(Some(TrackId(1))));
}

#[test]
fn lower_ruler_half_does_not_pan() {
    let (_, mut timeline) = engine();
    timeline.pointer_down(Layer::Ruler, Point::new(600.0, 25.0));
    assert!(timeline.interaction().gesture.is_idle());
    timeline.pointer_move(Layer::Ruler, Point::new(500.0, 25.0));
    assert_eq!(timeline.ui().pan_offset_sec, 0.0);
}

#[test]
fn dragging_an_end_handle_resizes_the_range() {
    let (service, mut timeline) = engine_with(snapshot_with(times(), tracks(), ui(range_selection())));
    // The end handle sits 6 px inside the bar's right edge.
    let handle = Point::new(main_x(t(12, 0)) - 6.0, BAR0_Y);
    timeline.pointer_down(Layer::Main, handle);
    assert!(matches!(timeline.interaction().gesture, Gesture::ResizingSession(_)));
    assert_eq!(timeline.cursor(), CursorIcon::EwResize);

    // 50 px is 20 minutes at 24 s/px.
    let to = Point::new(handle.x + 50.0, BAR0_Y);
    timeline.pointer_move(Layer::Main, to);
    let preview = timeline
        .interaction()
        .gesture
        .resize_preview()
        .and_then(|r| r.preview);
    assert_eq!(preview, Some((t(9, 0), t(12, 20))));

    timeline.pointer_up(Layer::Main, to);
    assert!(timeline.interaction().gesture.is_idle());
    assert!(service.commands().contains(&Command::UpdateRange(
        TrackId(1),
        RangeUpdate {
            start_old: t(9, 0),
            end_old: t(12, 0),
            start_new: t(9, 0),
            end_new: t(12, 20),
        }
    )));
}

#[test]
fn start_handle_cannot_pass_the_end() {
    let (service, mut timeline) = engine_with(snapshot_with(times(), tracks(), ui(range_selection())));
    let handle = Point::new(main_x(t(9, 0)) + 6.0, BAR0_Y);
    timeline.pointer_down(Layer::Main, handle);
    let to = Point::new(main_x(t(12, 30)), BAR0_Y);
    timeline.pointer_move(Layer::Main, to);
    timeline.pointer_up(Layer::Main, to);
    assert!(service.commands().contains(&Command::UpdateRange(
        TrackId(1),
        RangeUpdate {
            start_old: t(9, 0),
            end_old: t(12, 0),
            start_new: t(11, 55),
            end_new: t(12, 0),
        }
    )));
}

#[test]
fn handle_press_without_movement_sends_nothing() {
    let (service, mut timeline) = engine_with(snapshot_with(times(), tracks(), ui(range_selection())));
    let handle = Point::new(main_x(t(12, 0)) - 6.0, BAR0_Y);
    timeline.pointer_down(Layer::Main, handle);
    timeline.pointer_up(Layer::Main, handle);
    assert!(
        !service
            .commands()
            .iter()
            .any(|c| matches!(c, Command::UpdateRange(..)))
    );
}

#[test]
fn cancel_abandons_a_resize() {
    let (service, mut timeline) = engine_with(snapshot_with(times(), tracks(), ui(range_selection())));
    let handle = Point::new(main_x(t(12, 0)) - 6.0, BAR0_Y);
    timeline.pointer_down(Layer::Main, handle);
    timeline.pointer_move(Layer::Main, Point::new(handle.x + 50.0, BAR0_Y));
    timeline.pointer_cancel();
    assert!(timeline.interaction().gesture.is_idle());
    timeline.pointer_up(Layer::Main, Point::new(handle.x + 50.0, BAR0_Y));
    assert!(
        !service
            .commands()
            .iter()
            .any(|c| matches!(c, Command::UpdateRange(..)))
    );
}

#[test]
fn dragging_the_cap_seeks_to_a_snapped_time() {
    let (service, mut timeline) = engine();
    // The cap is centered on 09:30, which is ruler x 225.
    timeline.pointer_move(Layer::Ruler, Point::new(225.0, 23.0));
    assert!(timeline.interaction().hover.intents.contains(Intents::MARKER_CAP));

    timeline.pointer_down(Layer::Ruler, Point::new(225.0, 23.0));
    assert!(matches!(timeline.interaction().gesture, Gesture::DraggingMarker { .. }));
    timeline.pointer_move(Layer::Ruler, Point::new(302.0, 23.0));
    timeline.pointer_up(Layer::Ruler, Point::new(302.0, 23.0));
    timeline.on_frame(0.0);

    let gotos: Vec<_> = service
        .commands()
        .into_iter()
        .filter_map(|c| match c {
            Command::Goto(time) => Some(time),
            _ => None,
        })
        .collect();
    assert_eq!(gotos, [t(10, 0)]);
}

#[test]
fn cap_drag_near_the_edge_scrolls_the_view() {
    let (service, mut timeline) = engine();
    timeline.pointer_down(Layer::Ruler, Point::new(225.0, 23.0));
    timeline.pointer_move(Layer::Ruler, Point::new(760.0, 23.0));
    assert!(timeline.ui().pan_offset_sec > 0.0);
    timeline.on_frame(0.0);
    // The time is taken at the edge, 732 px in, before the view moves.
    assert!(service.commands().contains(&Command::Goto(t(12, 55))));
}

#[test]
fn gutter_drag_resizes_and_persists_the_label_column() {
    let (_, mut timeline) = engine();
    timeline.pointer_move(Layer::Main, Point::new(248.0, 100.0));
    assert!(timeline.interaction().hover.intents.contains(Intents::LABEL_RESIZE));
    assert_eq!(timeline.cursor(), CursorIcon::EwResize);

    timeline.pointer_down(Layer::Main, Point::new(248.0, 100.0));
    timeline.pointer_move(Layer::Main, Point::new(180.0, 100.0));
    assert_eq!(timeline.label_width(), 180.0);
    assert_eq!(timeline.layout().time_width, 820.0);

    timeline.pointer_move(Layer::Main, Point::new(10.0, 100.0));
    timeline.pointer_up(Layer::Main, Point::new(10.0, 100.0));
    assert_eq!(timeline.label_width(), 80.0);
    assert_eq!(
        timeline.storage().inner().value("location:acme:hq", LABEL_WIDTH_KEY),
        Some(&Value::from(80.0))
    );
}

#[test]
fn marking_needs_a_loaded_camera() {
    let (_, mut timeline) = engine();
    assert!(!timeline.start_marking());
    assert!(
        timeline
            .drain_events()
            .contains(&EngineEvent::Hint(MARKING_HINT.to_owned()))
    );

    timeline.set_cameras(vec![CameraImage::new("cam-1", Size::new(200.0, 100.0))], FitMode::Cover);
    assert!(!timeline.can_mark());

    timeline.set_cameras(vec![camera()], FitMode::Cover);
    assert!(timeline.can_mark());
    assert!(timeline.start_marking());
    assert!(matches!(
        timeline.interaction().gesture,
        Gesture::Marking(MarkingPhase::Armed)
    ));
    assert_eq!(timeline.cursor(), CursorIcon::Crosshair);
}

#[test]
fn marking_a_region_sends_an_ellipse() {
    let (service, mut timeline) = engine();
    timeline.set_cameras(vec![camera()], FitMode::Cover);
    assert!(timeline.key(Key::Char('m')));

    timeline.pointer_down(Layer::Camera(0), Point::new(20.0, 10.0));
    timeline.pointer_move(Layer::Camera(0), Point::new(60.0, 50.0));
    timeline.pointer_up(Layer::Camera(0), Point::new(60.0, 50.0));
    assert!(timeline.interaction().gesture.is_idle());

    let Some(Command::AddMarker(track, marker)) = service.commands().pop() else {
        panic!("expected an AddMarker command");
    };
    assert_eq!(track, TrackId(1));
    assert_eq!(marker.camera_id, "cam-1");
    assert_eq!(marker.timestamp, t(9, 30));
    assert!((marker.cx - 0.2).abs() < 1e-9);
    assert!((marker.cy - 0.3).abs() < 1e-9);
    assert!((marker.rx - 0.1).abs() < 1e-9);
    assert!((marker.ry - 0.2).abs() < 1e-9);
}

#[test]
fn a_click_mark_gets_the_default_radius() {
    let (service, mut timeline) = engine();
    timeline.set_cameras(vec![camera()], FitMode::Cover);
    timeline.start_marking();
    timeline.pointer_down(Layer::Camera(0), Point::new(100.0, 50.0));
    timeline.pointer_up(Layer::Camera(0), Point::new(100.0, 50.0));

    let Some(Command::AddMarker(_, marker)) = service.commands().pop() else {
        panic!("expected an AddMarker command");
    };
    assert_eq!((marker.cx, marker.cy), (0.5, 0.5));
    assert_eq!((marker.rx, marker.ry), (0.05, 0.05));
}

#[test]
fn escape_or_a_press_elsewhere_disarms_marking() {
    let (service, mut timeline) = engine();
    timeline.set_cameras(vec![camera()], FitMode::Cover);

    timeline.start_marking();
    assert!(timeline.key(Key::Escape));
    assert!(timeline.interaction().gesture.is_idle());

    timeline.start_marking();
    timeline.pointer_down(Layer::Ruler, Point::new(400.0, 5.0));
    assert!(matches!(timeline.interaction().gesture, Gesture::Panning(_)));
    timeline.pointer_up(Layer::Ruler, Point::new(400.0, 5.0));

    timeline.start_marking();
    timeline.pointer_down(Layer::Camera(0), Point::new(20.0, 10.0));
    timeline.pointer_cancel();
    assert!(timeline.interaction().gesture.is_idle());
    assert!(
        !service
            .commands()
            .iter()
            .any(|c| matches!(c, Command::AddMarker(..)))
    );
}

#[test]
fn torn_window_cannot_mark() {
    let (_, mut timeline) = engine();
    timeline.set_cameras(vec![camera()], FitMode::Cover);
    timeline.handle_service_event(punchclock::ServiceEvent::Detached { torn: true });
    assert!(!timeline.start_marking());
}
