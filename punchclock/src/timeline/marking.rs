// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region marking on camera frames.

use kurbo::Point;
use tracing::{debug, trace};

use super::Timeline;
use crate::clock::ClockTime;
use crate::events::EngineEvent;
use crate::interaction::{Gesture, Layer, MarkingPhase};
use crate::layout::CameraImage;
use crate::model::TrackId;
use crate::service::{MarkerPayload, TimelineService, optimistic};
use crate::storage::KeyValueStore;

/// Hint sent when marking cannot be armed.
pub const MARKING_HINT: &str = "Select a track and ensure cameras are loaded to mark.";

impl<S: TimelineService, K: KeyValueStore> Timeline<S, K> {
    /// Whether marking could be armed right now.
    pub fn can_mark(&self) -> bool {
        !self.torn && self.selected_track().is_some() && self.cameras.iter().any(CameraImage::is_loaded)
    }

    /// Arms marking: the next press on a camera starts a region.
    ///
    /// Queues an [`EngineEvent::Hint`] and returns `false` when no track is
    /// selected, no camera frame is loaded or the window is torn out.
    pub fn start_marking(&mut self) -> bool {
        if !self.can_mark() {
            debug!(
                torn = self.torn,
                track = ?self.ui.selection.track_id,
                cameras = self.cameras.len(),
                "marking rejected"
            );
            self.events.push(EngineEvent::Hint(MARKING_HINT.to_owned()));
            return false;
        }
        if self.interaction.gesture.is_marking() {
            return true;
        }
        if !self.interaction.gesture.is_idle() {
            return false;
        }
        self.set_gesture(Gesture::Marking(MarkingPhase::Armed));
        true
    }

    /// Disarms marking and drops a region in progress.
    pub fn stop_marking(&mut self) {
        if self.interaction.gesture.is_marking() {
            self.set_gesture(Gesture::Idle);
        }
    }

    pub(super) fn begin_mark(&mut self, camera: usize, pos: Point) {
        let (Some(track), Some(timestamp)) = (self.selected_track().map(|t| t.id), self.current_time()) else {
            trace!("nothing to mark, disarming");
            self.set_gesture(Gesture::Idle);
            return;
        };
        let Some(image) = self.cameras.get(camera).filter(|c| c.is_loaded()) else {
            return;
        };
        let start = image.normalize(pos, self.fit);
        self.interaction.press.start(pos, Layer::Camera(camera));
        self.set_gesture(Gesture::Marking(MarkingPhase::Dragging {
            camera,
            track,
            timestamp,
            start,
            end: start,
        }));
    }

    pub(super) fn finish_mark(&mut self, camera: usize, track: TrackId, timestamp: ClockTime, start: Point, end: Point) {
        let Some(image) = self.cameras.get(camera) else {
            return;
        };
        let radius = |a: f64, b: f64| {
            let r = (b - a).abs() * 0.5;
            if r > 0.0 {
                r
            } else {
                self.config.markers.default_radius
            }
        };
        let marker = MarkerPayload {
            timestamp,
            ts: timestamp.as_f64(),
            camera_id: image.id.clone(),
            cx: (start.x + end.x) * 0.5,
            cy: (start.y + end.y) * 0.5,
            rx: radius(start.x, end.x),
            ry: radius(start.y, end.y),
        };
        debug!(%track, camera = %marker.camera_id, cx = marker.cx, cy = marker.cy, "adding marker");
        optimistic("addMarker", self.service.add_marker(track, marker));
    }
}
