// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer and keyboard state.
//!
//! At most one [`Gesture`] is active at a time. A press picks the gesture from
//! the hit region under the pointer, moves update it, and release or cancel
//! always returns to [`Gesture::Idle`]. Hover is tracked separately as a set of
//! [`Intents`] so the host can pick a cursor without knowing the layout.

use bitflags::bitflags;
use cursor_icon::CursorIcon;
use kurbo::Point;
use punchclock_event_state::drag::DragState;

use crate::clock::ClockTime;
use crate::model::TrackId;

/// Which layer a pointer event was delivered to.
///
/// Positions are local to that layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    /// Label column plus session rows.
    Main,
    /// Time ruler above the session rows.
    Ruler,
    /// The camera image at this index in [`Timeline::set_cameras`](crate::Timeline::set_cameras).
    Camera(usize),
}

/// Keys the engine reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Step the playhead back.
    ArrowLeft,
    /// Step the playhead forward.
    ArrowRight,
    /// Jump to the first event.
    Home,
    /// Jump to the last event.
    End,
    /// Delete the selected range or track.
    Delete,
    /// Cancel marking.
    Escape,
    /// A printable key.
    Char(char),
}

bitflags! {
    /// What the pointer is currently over.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Intents: u8 {
        /// The label column resize strip.
        const LABEL_RESIZE = 1;
        /// A label cell.
        const LABEL_OVER = 1 << 1;
        /// A session bar of the selected track.
        const SESSION_OVER = 1 << 2;
        /// The upper half of the ruler.
        const RULER_PAN = 1 << 3;
        /// The marker cap.
        const MARKER_CAP = 1 << 4;
    }
}

/// Range endpoint being dragged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// The opening event.
    Start,
    /// The closing event.
    End,
}

/// Anchor of a range resize.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionResize {
    /// Track owning the range.
    pub track: TrackId,
    /// Endpoint being dragged.
    pub side: Side,
    /// Range start when the drag began.
    pub start: ClockTime,
    /// Range end when the drag began.
    pub end: ClockTime,
    /// Bounds shown while dragging, committed on release.
    pub preview: Option<(ClockTime, ClockTime)>,
}

/// Progress of a marking gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MarkingPhase {
    /// Waiting for a press on a camera.
    Armed,
    /// Dragging out a region.
    Dragging {
        /// Camera index.
        camera: usize,
        /// Track the marker will belong to.
        track: TrackId,
        /// Time the marker will carry.
        timestamp: ClockTime,
        /// Normalized press position.
        start: Point,
        /// Normalized current position.
        end: Point,
    },
}

/// The active gesture.
#[derive(Clone, Copy, Debug, Default)]
pub enum Gesture {
    /// Nothing held.
    #[default]
    Idle,
    /// Dragging the ruler; the anchor is the pan offset at press time.
    Panning(DragState<f64>),
    /// Dragging the marker cap.
    DraggingMarker {
        /// Pointer distance from the marker line at press time.
        grab_dx: f64,
    },
    /// Dragging the label column edge.
    ResizingGutter,
    /// Dragging a range endpoint.
    ResizingSession(DragState<SessionResize>),
    /// Marking a region on a camera.
    Marking(MarkingPhase),
}

impl Gesture {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Panning(_) => "panning",
            Self::DraggingMarker { .. } => "dragging-marker",
            Self::ResizingGutter => "resizing-gutter",
            Self::ResizingSession(_) => "resizing-session",
            Self::Marking(_) => "marking",
        }
    }

    /// Whether nothing is held.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether marking is armed or in progress.
    #[must_use]
    pub fn is_marking(&self) -> bool {
        matches!(self, Self::Marking(_))
    }

    /// The range being resized, once it has a preview to draw.
    #[must_use]
    pub fn resize_preview(&self) -> Option<&SessionResize> {
        let Self::ResizingSession(drag) = self else {
            return None;
        };
        drag.anchor().filter(|r| r.preview.is_some())
    }
}

/// Hover state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Hover {
    /// Last pointer position on the main layer.
    pub pointer: Option<Point>,
    /// Session bar under the pointer: track, start and end.
    pub session: Option<(TrackId, ClockTime, ClockTime)>,
    /// Hit regions under the pointer.
    pub intents: Intents,
}

/// Everything the engine tracks about input between events.
#[derive(Clone, Debug, Default)]
pub struct InteractionState {
    /// The active gesture.
    pub gesture: Gesture,
    /// Hover state.
    pub hover: Hover,
    /// Press position and layer, for click detection.
    pub press: DragState<Layer>,
    /// Set when a drag just ended so the click that follows is ignored.
    pub suppress_click: bool,
}

impl InteractionState {
    /// Cursor for the current state.
    #[must_use]
    pub fn cursor(&self) -> CursorIcon {
        match self.gesture {
            Gesture::Panning(_) => return CursorIcon::Grabbing,
            Gesture::DraggingMarker { .. } | Gesture::ResizingGutter | Gesture::ResizingSession(_) => {
                return CursorIcon::EwResize;
            }
            Gesture::Marking(_) => return CursorIcon::Crosshair,
            Gesture::Idle => {}
        }
        let intents = self.hover.intents;
        if intents.intersects(Intents::LABEL_RESIZE | Intents::MARKER_CAP) {
            CursorIcon::EwResize
        } else if intents.intersects(Intents::LABEL_OVER | Intents::SESSION_OVER) {
            CursorIcon::Pointer
        } else if intents.contains(Intents::RULER_PAN) {
            CursorIcon::Grab
        } else {
            CursorIcon::Default
        }
    }
}
