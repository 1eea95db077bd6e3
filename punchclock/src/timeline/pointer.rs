// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer input: gesture entry, updates and exit, hover, clicks and wheel.
//!
//! While a gesture is held the host keeps delivering positions local to the
//! layer that received the press, as pointer capture would.

use core::mem;

use kurbo::{Point, Rect};
use punchclock_event_state::drag::DragState;
use punchclock_sessions::{SessionKey, find_selected_range, pair};
use tracing::trace;

use super::Timeline;
use crate::clock::ClockTime;
use crate::interaction::{Gesture, Hover, Intents, Layer, MarkingPhase, SessionResize, Side};
use crate::layout::{contains_inclusive, handle_centers};
use crate::model::{Selection, Times, TrackId, UiPatch};
use crate::service::{RangeUpdate, TimelineService, optimistic};
use crate::storage::KeyValueStore;
use crate::sync::{Refresh, escalate};

impl<S: TimelineService, K: KeyValueStore> Timeline<S, K> {
    /// Handles a primary button press.
    pub fn pointer_down(&mut self, layer: Layer, pos: Point) {
        if let Gesture::Marking(MarkingPhase::Armed) = self.interaction.gesture {
            if let Layer::Camera(camera) = layer {
                self.begin_mark(camera, pos);
                return;
            }
            trace!("press outside the cameras, marking disarmed");
            self.set_gesture(Gesture::Idle);
        }
        if !self.interaction.gesture.is_idle() {
            return;
        }
        self.interaction.press.start(pos, layer);
        self.interaction.suppress_click = false;
        match layer {
            Layer::Ruler => self.ruler_down(pos),
            Layer::Main => self.main_down(pos),
            Layer::Camera(_) => {}
        }
    }

    /// Handles pointer movement, held or not.
    pub fn pointer_move(&mut self, layer: Layer, pos: Point) {
        self.interaction.press.update(pos);
        match self.interaction.gesture {
            Gesture::Idle => match layer {
                Layer::Main => self.update_main_hover(pos),
                Layer::Ruler => self.update_ruler_hover(pos),
                Layer::Camera(_) => {}
            },
            Gesture::Panning(drag) => {
                let (Some(&anchor), Some(offset)) = (drag.anchor(), drag.total_offset(pos)) else {
                    return;
                };
                self.view.pan_from(anchor, offset.x);
                self.set_ui_local(UiPatch::pan(self.view.pan_offset()));
                self.emit_change();
            }
            Gesture::DraggingMarker { grab_dx } => self.drag_marker(pos.x - grab_dx),
            Gesture::ResizingGutter => {
                self.label_width = self.config.layout.clamp_label_width(pos.x);
                self.persist_label_width();
                self.relayout();
            }
            Gesture::ResizingSession(drag) => self.drag_session_edge(drag, pos),
            Gesture::Marking(MarkingPhase::Dragging {
                camera,
                track,
                timestamp,
                start,
                ..
            }) => {
                let Some(image) = self.cameras.get(camera) else {
                    return;
                };
                if layer != Layer::Camera(camera) {
                    return;
                }
                let end = image.normalize(pos, self.fit);
                self.interaction.gesture = Gesture::Marking(MarkingPhase::Dragging {
                    camera,
                    track,
                    timestamp,
                    start,
                    end,
                });
                escalate(&mut self.refresh, Refresh::Repaint);
            }
            Gesture::Marking(MarkingPhase::Armed) => {}
        }
    }

    /// Handles a primary button release and commits the active gesture.
    pub fn pointer_up(&mut self, layer: Layer, pos: Point) {
        self.pointer_move(layer, pos);
        let moved = self.interaction.press.has_moved(self.config.drag.click_slop);
        self.interaction.press.end();
        let gesture = mem::take(&mut self.interaction.gesture);
        match gesture {
            Gesture::Idle => return,
            Gesture::Marking(MarkingPhase::Armed) => {
                self.interaction.gesture = gesture;
                return;
            }
            Gesture::Panning(_) | Gesture::DraggingMarker { .. } => {}
            Gesture::ResizingGutter => self.persist_label_width(),
            Gesture::ResizingSession(mut drag) => {
                if let Some(resize) = drag.end() {
                    self.commit_resize(resize);
                }
            }
            Gesture::Marking(MarkingPhase::Dragging {
                camera,
                track,
                timestamp,
                start,
                end,
            }) => self.finish_mark(camera, track, timestamp, start, end),
        }
        trace!(gesture = gesture.name(), moved, "gesture released");
        self.interaction.suppress_click = moved;
        escalate(&mut self.refresh, Refresh::Repaint);
    }

    /// Abandons the active gesture without committing it.
    pub fn pointer_cancel(&mut self) {
        self.interaction.press.end();
        self.interaction.suppress_click = false;
        if !self.interaction.gesture.is_idle() {
            self.set_gesture(Gesture::Idle);
        }
    }

    /// Clears hover state when the pointer leaves the widget.
    pub fn pointer_leave(&mut self) {
        if self.interaction.hover != Hover::default() {
            self.interaction.hover = Hover::default();
            escalate(&mut self.refresh, Refresh::Repaint);
        }
    }

    /// Handles a click, delivered after the matching release.
    pub fn click(&mut self, layer: Layer, pos: Point) {
        if mem::take(&mut self.interaction.suppress_click) || !self.interaction.gesture.is_idle() {
            return;
        }
        match layer {
            Layer::Main => self.main_click(pos),
            Layer::Ruler => self.clear_session_keys(),
            Layer::Camera(_) => {}
        }
    }

    /// Zooms about ruler position `pos`; positive `delta_y` zooms out.
    pub fn wheel(&mut self, pos: Point, delta_y: f64) {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return;
        }
        let factor = if delta_y > 0.0 {
            self.config.zoom.wheel_in
        } else {
            self.config.zoom.wheel_out
        };
        let before = self.view.zoom();
        self.view.zoom_by_about_pixel(pos.x, factor);
        if self.view.zoom() == before {
            return;
        }
        self.set_ui_local(UiPatch {
            zoom: Some(self.view.zoom()),
            pan_offset_sec: Some(self.view.pan_offset()),
            ..UiPatch::default()
        });
        self.emit_change();
    }

    /// Ruler `x` of the marker line, if the playhead is on screen.
    pub(super) fn marker_x(&self) -> Option<f64> {
        let current = self.times.current?.as_f64();
        self.view
            .is_visible(current)
            .then(|| self.view.time_to_pixel(current))
    }

    fn cap_rect(&self) -> Option<(f64, Rect)> {
        let x = self.marker_x()?;
        Some((x, self.layout.cap_rect(x, &self.config.layout)))
    }

    fn ruler_down(&mut self, pos: Point) {
        if let Some((x, _)) = self.cap_rect().filter(|(_, cap)| contains_inclusive(*cap, pos)) {
            self.set_gesture(Gesture::DraggingMarker { grab_dx: pos.x - x });
            return;
        }
        if pos.y <= self.layout.ruler_height * 0.5 {
            let mut drag = DragState::default();
            drag.start(pos, self.view.pan_offset());
            self.set_gesture(Gesture::Panning(drag));
        }
    }

    fn main_down(&mut self, pos: Point) {
        if self.layout.in_gutter(pos.x, self.config.layout.gutter_width) {
            self.set_gesture(Gesture::ResizingGutter);
            return;
        }
        if pos.x <= self.layout.label_width {
            return;
        }
        if let Some(resize) = self.handle_at(pos) {
            let mut drag = DragState::default();
            drag.start(pos, resize);
            self.set_gesture(Gesture::ResizingSession(drag));
        }
    }

    /// The resize handle of the selected range under `pos`.
    fn handle_at(&self, pos: Point) -> Option<SessionResize> {
        let index = self.selected_index()?;
        let track = self.selected_track()?;
        let keys = self.ui.selection.keys();
        if keys.len() < 2 {
            return None;
        }
        let pairs = pair(&track.sessions, &self.pairs);
        let range = find_selected_range(&pairs, &keys, &self.pairs)?;
        let bounds = self.layout.session_bounds(
            &self.view,
            &self.config.layout,
            index,
            (range.start.as_f64(), range.end.as_f64()),
            f64::from(self.times.interval),
        );
        let hit = self.config.layout.handle_hit_radius;
        let [left, right] = handle_centers(bounds, &self.config.layout);
        let side = if (pos - left).hypot() <= hit {
            Side::Start
        } else if (pos - right).hypot() <= hit {
            Side::End
        } else {
            return None;
        };
        Some(SessionResize {
            track: track.id,
            side,
            start: range.start,
            end: range.end,
            preview: None,
        })
    }

    fn drag_marker(&mut self, x: f64) {
        let nudge = self
            .config
            .edge_scroll()
            .nudge(x, self.layout.time_width, self.view.sec_per_px());
        let t = self
            .view
            .snap_time(self.view.clamp_to_window(self.view.pixel_to_time(nudge.x)));
        if nudge.is_active() {
            self.view.pan_by_seconds(nudge.pan_seconds);
            self.set_ui_local(UiPatch::pan(self.view.pan_offset()));
        }
        self.outbox.push_goto(ClockTime::from_secs_f64(t));
        escalate(&mut self.refresh, Refresh::Repaint);
        self.emit_change();
    }

    fn drag_session_edge(&mut self, mut drag: DragState<SessionResize>, pos: Point) {
        let Some(offset) = drag.total_offset(pos) else {
            return;
        };
        let nudge = self.config.edge_scroll().nudge(
            self.layout.time_x(pos.x),
            self.layout.time_width,
            self.view.sec_per_px(),
        );
        if nudge.is_active() {
            self.view.pan_by_seconds(nudge.pan_seconds);
            self.set_ui_local(UiPatch::pan(self.view.pan_offset()));
        }
        let delta = self.view.dx_to_snapped_seconds(offset.x);
        if let Some(resize) = drag.anchor_mut() {
            resize.preview = Some(resized_bounds(resize, delta, &self.times));
        }
        self.interaction.gesture = Gesture::ResizingSession(drag);
        escalate(&mut self.refresh, Refresh::Repaint);
        self.emit_change();
    }

    fn commit_resize(&mut self, resize: SessionResize) {
        let Some((start_new, end_new)) = resize.preview else {
            return;
        };
        if (start_new, end_new) == (resize.start, resize.end) {
            return;
        }
        let update = RangeUpdate {
            start_old: resize.start,
            end_old: resize.end,
            start_new,
            end_new,
        };
        optimistic("updateRange", self.service.update_range(resize.track, update));
        self.emit_change();
    }

    fn update_main_hover(&mut self, pos: Point) {
        let gutter = self.layout.in_gutter(pos.x, self.config.layout.gutter_width);
        let mut intents = Intents::empty();
        if gutter {
            intents |= Intents::LABEL_RESIZE;
        } else if pos.x < self.layout.label_width && self.layout.row_at(pos.y).is_some() {
            intents |= Intents::LABEL_OVER;
        }
        let session = self.session_at(pos);
        if session.is_some() {
            intents |= Intents::SESSION_OVER;
        }
        self.set_hover(Hover {
            pointer: Some(pos),
            session,
            intents,
        });
    }

    fn update_ruler_hover(&mut self, pos: Point) {
        let mut intents = Intents::empty();
        if self.cap_rect().is_some_and(|(_, cap)| contains_inclusive(cap, pos)) {
            intents |= Intents::MARKER_CAP;
        } else if pos.y <= self.layout.ruler_height * 0.5 {
            intents |= Intents::RULER_PAN;
        }
        let hover = Hover {
            intents,
            ..self.interaction.hover
        };
        self.set_hover(hover);
    }

    fn set_hover(&mut self, hover: Hover) {
        if self.interaction.hover != hover {
            self.interaction.hover = hover;
            escalate(&mut self.refresh, Refresh::Repaint);
        }
    }

    /// The drawn session entry of the selected track under `pos`.
    fn session_at(&self, pos: Point) -> Option<(TrackId, ClockTime, ClockTime)> {
        let index = self.selected_index()?;
        let track = self.selected_track()?;
        let interval = f64::from(self.times.interval);
        let (vs, ve) = (self.view.visible_start(), self.view.visible_end());
        pair(&track.sessions, &self.pairs).into_iter().find_map(|p| {
            let (start, end) = (p.start.as_f64(), p.end.as_f64());
            let drawn_end = if p.is_singleton() { start + interval } else { end };
            if drawn_end < vs || start > ve {
                return None;
            }
            let bounds =
                self.layout
                    .session_bounds(&self.view, &self.config.layout, index, (start, end), interval);
            contains_inclusive(bounds, pos).then_some((track.id, p.start, p.end))
        })
    }

    fn main_click(&mut self, pos: Point) {
        self.update_main_hover(pos);
        if let Some((track, start, end)) = self.interaction.hover.session {
            let (start_kind, end_kind) = self.primary_pair();
            let end_time = if start == end { start } else { end };
            let selection = Selection {
                track_id: Some(track),
                session_keys: vec![
                    SessionKey::new(start_kind, start).to_string(),
                    SessionKey::new(end_kind, end_time).to_string(),
                ],
            };
            self.select(selection);
            return;
        }
        if self.interaction.hover.intents.contains(Intents::LABEL_RESIZE) {
            return;
        }
        if pos.x <= self.layout.label_width {
            let Some(row) = self.layout.row_at(pos.y) else {
                return;
            };
            let Some(id) = self.displayed_tracks().nth(row).map(|t| t.id) else {
                return;
            };
            let next = (self.ui.selection.track_id != Some(id)).then_some(id);
            self.select(Selection::track(next));
            return;
        }
        self.clear_session_keys();
    }

    /// Keeps the selected track and drops its selected range.
    pub(super) fn clear_session_keys(&mut self) {
        if self.ui.selection.track_id.is_none() {
            return;
        }
        self.select(Selection::track(self.ui.selection.track_id));
    }

    pub(super) fn select(&mut self, selection: Selection) {
        trace!(?selection, "select");
        self.set_ui_local(UiPatch::select(selection));
        self.update_toolbar();
        self.emit_markers();
        self.emit_change();
    }
}

/// Bounds of `resize` with `delta` seconds applied to the dragged side.
///
/// Both sides stay inside the nominal day and at least one interval apart.
/// When the dragged side is pinned at a day edge, the fixed side gives way.
pub(crate) fn resized_bounds(resize: &SessionResize, delta: f64, times: &Times) -> (ClockTime, ClockTime) {
    let delta = ClockTime::from_secs_f64(delta).seconds();
    let (lo, hi) = (times.start, times.end);
    let (mut start, mut end) = (resize.start, resize.end);
    match resize.side {
        Side::Start => start = start.add_seconds(delta),
        Side::End => end = end.add_seconds(delta),
    }
    start = start.max(lo);
    end = end.min(hi);
    let short = |s: ClockTime, e: ClockTime| e.seconds() - s.seconds() < times.interval;
    if short(start, end) {
        match resize.side {
            Side::Start => {
                start = end.add_seconds(-times.interval).max(lo);
                if short(start, end) {
                    end = start.add_seconds(times.interval).min(hi);
                }
            }
            Side::End => {
                end = start.add_seconds(times.interval).min(hi);
                if short(start, end) {
                    start = end.add_seconds(-times.interval).max(lo);
                }
            }
        }
    }
    (start, end)
}
