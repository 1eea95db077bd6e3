// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Notifications for the host.
//!
//! The engine never calls back into the host. It queues [`EngineEvent`]s,
//! which the host drains after each batch of input with
//! [`Timeline::drain_events`](crate::Timeline::drain_events).

use crate::clock::ClockTime;
use crate::model::{Marker, Track, TrackId};

/// View and selection state after a change.
#[derive(Clone, Debug, PartialEq)]
pub struct ChangeDetail {
    /// Pan offset in seconds.
    pub offset: f64,
    /// Whether the playhead is inside the visible window.
    pub marker_visible: bool,
    /// Whether [`Timeline::patch`](crate::Timeline::patch) would do anything.
    pub patch_available: bool,
    /// Whether [`Timeline::cut`](crate::Timeline::cut) would do anything.
    pub cut_available: bool,
    /// The selected track, if it is displayed.
    pub selected_track: Option<Track>,
}

/// Something the host may want to react to.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    /// The view or the selection changed.
    Change(ChangeDetail),
    /// The set of markers at the playhead changed.
    Markers {
        /// Playhead time.
        current: Option<ClockTime>,
        /// Selected track.
        track_id: Option<TrackId>,
        /// Markers on that track within tolerance of the playhead.
        markers: Vec<Marker>,
    },
    /// A short advisory message, such as why marking could not start.
    Hint(String),
    /// The playhead was moved by the service.
    Move,
    /// The host should scroll its track list so this row is visible.
    ScrollToTrack {
        /// Row index among displayed tracks.
        index: usize,
        /// Row offset from the first track row, in pixels.
        top: f64,
    },
}

/// Derived state for a toolbar.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolbarState {
    /// Whether the window is torn out.
    pub torn: bool,
    /// Whether playback is running.
    pub playback: bool,
    /// Playhead as `HH:mm:ss`, or `-` when unknown.
    pub current_time: String,
    /// Whether a displayed track is selected.
    pub track_selected: bool,
    /// Whether cut is available.
    pub cut_available: bool,
    /// Whether patch is available.
    pub patch_available: bool,
    /// Whether the active category has no tracks.
    pub has_no_tracks: bool,
}

impl Default for ToolbarState {
    fn default() -> Self {
        Self {
            torn: false,
            playback: false,
            current_time: "-".to_owned(),
            track_selected: false,
            cut_available: false,
            patch_available: false,
            has_no_tracks: true,
        }
    }
}
