// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Toolbar and keyboard commands.
//!
//! Every command is sent optimistically; failures are logged and the next
//! snapshot decides what actually happened.

use punchclock_sessions::{find_selected_range, pair};
use tracing::debug;

use super::Timeline;
use crate::events::EngineEvent;
use crate::interaction::Side;
use crate::model::{Selection, Session, Track, TrackId};
use crate::service::{ClearMarkersAt, TimelineService, optimistic};
use crate::storage::KeyValueStore;

impl<S: TimelineService, K: KeyValueStore> Timeline<S, K> {
    /// Moves the playhead to the first event.
    pub fn jump_first(&mut self) {
        optimistic("first", self.service.first());
    }

    /// Steps the playhead back.
    pub fn step_back(&mut self) {
        optimistic("back", self.service.back());
    }

    /// Steps the playhead forward.
    pub fn step_forward(&mut self) {
        optimistic("next", self.service.next());
    }

    /// Moves the playhead to the last event.
    pub fn jump_last(&mut self) {
        optimistic("last", self.service.last());
    }

    /// Pauses playback if it is running, starts it otherwise.
    pub fn toggle_playback(&mut self) {
        if self.ui.playback {
            optimistic("pause", self.service.pause());
        } else {
            optimistic("play", self.service.play());
        }
    }

    /// Tears the window out, or puts it back.
    pub fn tear(&mut self) {
        match optimistic("torn", self.service.torn()) {
            Some(true) => {
                optimistic("attach", self.service.attach());
            }
            Some(false) => {
                optimistic("detach", self.service.detach());
            }
            None => {}
        }
    }

    /// Splits the range under the playhead on the selected track.
    ///
    /// Returns `false` without sending anything when cut is unavailable.
    pub fn cut(&mut self) -> bool {
        if !self.cut_available() {
            return false;
        }
        let (Some(track), Some(current)) = (self.ui.selection.track_id, self.current_time()) else {
            return false;
        };
        optimistic("cut", self.service.cut(track, None, current));
        true
    }

    /// Joins the ranges meeting at the playhead on the selected track.
    ///
    /// Returns `false` without sending anything when patch is unavailable.
    pub fn patch(&mut self) -> bool {
        if !self.patch_available() {
            return false;
        }
        let (Some(track), Some(current)) = (self.ui.selection.track_id, self.current_time()) else {
            return false;
        };
        optimistic("patch", self.service.patch(track, None, current));
        true
    }

    /// Clears the selected track's markers around the playhead.
    pub fn unmark_at_current(&mut self) {
        let (Some(track), Some(timestamp)) = (self.ui.selection.track_id, self.current_time()) else {
            return;
        };
        let query = ClearMarkersAt {
            timestamp,
            tolerance: self.config.markers.tolerance,
        };
        optimistic("clearMarkersAt", self.service.clear_markers_at(track, query));
        self.sync_from_service();
    }

    /// Adds an empty track to the active category and selects it.
    pub fn add_track(&mut self) {
        let text = self.config.category_text(&self.ui.category);
        let id = TrackId(self.displayed_tracks().map(|t| t.id.0).fold(0, i64::max) + 1);
        let track = Track {
            id,
            category: self.ui.category.clone(),
            name: text.new_track_name,
            sessions: Vec::new(),
            markers: Vec::new(),
        };
        debug!(%id, name = %track.name, "adding track");
        optimistic("addTrack", self.service.add_track(track));
        self.select(Selection::track(Some(id)));
        self.sync_from_service();
        if let Some(index) = self.selected_index() {
            self.events.push(EngineEvent::ScrollToTrack {
                index,
                top: self.layout.row_height * index as f64,
            });
        }
    }

    /// Adds a primary start or end event at the playhead on the selected
    /// track.
    pub fn add_session(&mut self, side: Side) {
        let (Some(track), Some(current)) = (self.selected_track().map(|t| t.id), self.current_time()) else {
            return;
        };
        let (start, end) = self.primary_pair();
        let kind = match side {
            Side::Start => start,
            Side::End => end,
        };
        optimistic("addSession", self.service.add_session(track, Session::new(kind, current)));
    }

    /// Deletes the selected range, or the selected track when no range is
    /// selected.
    pub fn delete_selection(&mut self) {
        let Some(track) = self.selected_track() else {
            return;
        };
        let id = track.id;
        let keys = self.ui.selection.keys();
        let pairs = pair(&track.sessions, &self.pairs);
        if find_selected_range(&pairs, &keys, &self.pairs).is_none() {
            debug!(%id, "removing track");
            optimistic("removeTrack", self.service.remove_track(id));
            self.select(Selection::track(None));
            return;
        }
        for key in keys {
            optimistic(
                "deleteSession",
                self.service.delete_session(id, Session::new(key.kind, key.time)),
            );
        }
        self.select(Selection::track(Some(id)));
    }
}
