// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The timeline service seam.
//!
//! The service owns tracks, times and the playback head. The engine asks it
//! for snapshots, sends it commands, and is told about changes through the
//! events named by [`EventName`]. Events arrive as `(name, JSON)` pairs and
//! are decoded with [`ServiceEvent::from_json`].

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;
use crate::error::{Error, ServiceError};
use crate::model::{Session, TimelineSnapshot, Track, TrackId, UiPatch};

/// Handle returned by [`TimelineService::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Events the engine subscribes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventName {
    /// A fresh snapshot.
    Snapshot,
    /// The timeline window was torn out.
    Detached,
    /// The timeline window was put back.
    Attached,
    /// The playback head moved.
    Move,
    /// A playback tick.
    Playback,
    /// Playback was paused.
    PlaybackPaused,
    /// Playback reached the end.
    PlaybackEnded,
}

impl EventName {
    /// Every event, in subscription order.
    pub const ALL: [Self; 7] = [
        Self::Snapshot,
        Self::Detached,
        Self::Attached,
        Self::Move,
        Self::Playback,
        Self::PlaybackPaused,
        Self::PlaybackEnded,
    ];

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Snapshot => "snapshot",
            Self::Detached => "detached",
            Self::Attached => "attached",
            Self::Move => "move",
            Self::Playback => "playback",
            Self::PlaybackPaused => "playback:paused",
            Self::PlaybackEnded => "playback:ended",
        }
    }

    /// Looks up a wire name.
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_str() == name)
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded service event.
///
/// Snapshot-carrying events hold `None` when the payload was empty, in which
/// case the engine pulls a snapshot itself.
#[derive(Clone, Debug, PartialEq)]
pub enum ServiceEvent {
    /// `snapshot`.
    Snapshot(Option<Box<TimelineSnapshot>>),
    /// `detached`.
    Detached {
        /// Torn flag reported with the event.
        torn: bool,
    },
    /// `attached`.
    Attached {
        /// Torn flag reported with the event.
        torn: bool,
    },
    /// `move`.
    Move(Option<Box<TimelineSnapshot>>),
    /// `playback`.
    Playback(Option<Box<TimelineSnapshot>>),
    /// `playback:paused`.
    PlaybackPaused(Option<Box<TimelineSnapshot>>),
    /// `playback:ended`.
    PlaybackEnded(Option<Box<TimelineSnapshot>>),
}

#[derive(Deserialize)]
struct TornPayload {
    #[serde(default)]
    torn: Option<bool>,
}

impl ServiceEvent {
    /// Decodes an event from its wire name and JSON payload.
    pub fn from_json(name: &str, payload: &str) -> Result<Self, Error> {
        let event = EventName::from_wire(name).ok_or_else(|| Error::UnknownEvent(name.to_owned()))?;
        let snapshot = || -> Result<Option<Box<TimelineSnapshot>>, Error> {
            let trimmed = payload.trim();
            if trimmed.is_empty() || trimmed == "null" {
                return Ok(None);
            }
            Ok(Some(Box::new(serde_json::from_str(trimmed)?)))
        };
        let torn = || -> Result<bool, Error> {
            let trimmed = payload.trim();
            if trimmed.is_empty() || trimmed == "null" {
                return Ok(false);
            }
            let p: TornPayload = serde_json::from_str(trimmed)?;
            Ok(p.torn.unwrap_or(false))
        };
        Ok(match event {
            EventName::Snapshot => Self::Snapshot(snapshot()?),
            EventName::Detached => Self::Detached { torn: torn()? },
            EventName::Attached => Self::Attached { torn: torn()? },
            EventName::Move => Self::Move(snapshot()?),
            EventName::Playback => Self::Playback(snapshot()?),
            EventName::PlaybackPaused => Self::PlaybackPaused(snapshot()?),
            EventName::PlaybackEnded => Self::PlaybackEnded(snapshot()?),
        })
    }

    /// Which subscription this event belongs to.
    #[must_use]
    pub fn name(&self) -> EventName {
        match self {
            Self::Snapshot(_) => EventName::Snapshot,
            Self::Detached { .. } => EventName::Detached,
            Self::Attached { .. } => EventName::Attached,
            Self::Move(_) => EventName::Move,
            Self::Playback(_) => EventName::Playback,
            Self::PlaybackPaused(_) => EventName::PlaybackPaused,
            Self::PlaybackEnded(_) => EventName::PlaybackEnded,
        }
    }
}

/// Old and new bounds of a resized range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeUpdate {
    /// Start before the resize.
    pub start_old: ClockTime,
    /// End before the resize.
    pub end_old: ClockTime,
    /// Start after the resize.
    pub start_new: ClockTime,
    /// End after the resize.
    pub end_new: ClockTime,
}

/// A closed range, for range-scoped cut and patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRange {
    /// Range start.
    pub start: ClockTime,
    /// Range end.
    pub end: ClockTime,
}

/// A marker to add.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerPayload {
    /// Time of day the region refers to.
    pub timestamp: ClockTime,
    /// Same time in seconds.
    pub ts: f64,
    /// Camera the region was drawn on.
    pub camera_id: String,
    /// Center X, `0..=1`.
    pub cx: f64,
    /// Center Y, `0..=1`.
    pub cy: f64,
    /// Horizontal radius.
    pub rx: f64,
    /// Vertical radius.
    pub ry: f64,
}

/// Which markers to clear.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClearMarkersAt {
    /// Center of the time window.
    pub timestamp: ClockTime,
    /// Half-width of the time window in seconds.
    pub tolerance: f64,
}

/// The external track store and playback controller.
///
/// Commands are fire-and-forget from the engine's point of view: failures are
/// logged and otherwise ignored, and the next snapshot is the source of truth.
pub trait TimelineService {
    /// Pulls the current snapshot.
    fn snapshot(&mut self) -> Result<Option<TimelineSnapshot>, ServiceError>;

    /// Subscribes to an event.
    fn subscribe(&mut self, event: EventName) -> Result<SubscriptionId, ServiceError>;

    /// Drops a subscription.
    fn unsubscribe(&mut self, id: SubscriptionId);

    /// Moves the head to the first event.
    fn first(&mut self) -> Result<(), ServiceError>;

    /// Steps the head backward.
    fn back(&mut self) -> Result<(), ServiceError>;

    /// Steps the head forward.
    fn next(&mut self) -> Result<(), ServiceError>;

    /// Moves the head to the last event.
    fn last(&mut self) -> Result<(), ServiceError>;

    /// Moves the head to `time`.
    fn goto(&mut self, time: ClockTime) -> Result<(), ServiceError>;

    /// Starts playback.
    fn play(&mut self) -> Result<(), ServiceError>;

    /// Pauses playback.
    fn pause(&mut self) -> Result<(), ServiceError>;

    /// Adds a track.
    fn add_track(&mut self, track: Track) -> Result<(), ServiceError>;

    /// Removes a track.
    fn remove_track(&mut self, id: TrackId) -> Result<(), ServiceError>;

    /// Adds a session event to a track.
    fn add_session(&mut self, track: TrackId, session: Session) -> Result<(), ServiceError>;

    /// Deletes a session event from a track.
    fn delete_session(&mut self, track: TrackId, session: Session) -> Result<(), ServiceError>;

    /// Moves the endpoints of a closed range.
    fn update_range(&mut self, track: TrackId, update: RangeUpdate) -> Result<(), ServiceError>;

    /// Splits the range covering `time`.
    fn cut(&mut self, track: TrackId, range: Option<SessionRange>, time: ClockTime) -> Result<(), ServiceError>;

    /// Joins the ranges meeting at `time`.
    fn patch(&mut self, track: TrackId, range: Option<SessionRange>, time: ClockTime) -> Result<(), ServiceError>;

    /// Adds a region marker.
    fn add_marker(&mut self, track: TrackId, marker: MarkerPayload) -> Result<(), ServiceError>;

    /// Clears markers near a time.
    fn clear_markers_at(&mut self, track: TrackId, query: ClearMarkersAt) -> Result<(), ServiceError>;

    /// Whether the timeline window is torn out.
    fn torn(&mut self) -> Result<bool, ServiceError>;

    /// Tears the timeline window out.
    fn detach(&mut self) -> Result<(), ServiceError>;

    /// Puts the timeline window back.
    fn attach(&mut self) -> Result<(), ServiceError>;

    /// Pushes view state.
    fn set_ui(&mut self, patch: &UiPatch) -> Result<(), ServiceError>;
}

/// Logs a failed fire-and-forget command and drops the error.
pub(crate) fn optimistic<T>(command: &'static str, result: Result<T, ServiceError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(command, %err, "timeline service command failed");
            None
        }
    }
}
