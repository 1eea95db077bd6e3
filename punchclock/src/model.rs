// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wire data model shared with the timeline service.
//!
//! Field names follow the service's camelCase JSON. Everything here except
//! [`UiState`] is owned by the service and treated as immutable per snapshot.

use core::fmt;

use punchclock_sessions::{PointEvent, SessionKey};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clock::ClockTime;

/// Identifier of a track.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub i64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The day a timeline covers.
///
/// Parsing is lenient: missing, malformed or wrongly typed values fall back
/// to a `00:00:00..24:00:00` day with a one minute interval and no buffer.
/// A `times` that is not an object at all decodes as [`Times::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "TimesWire")]
pub struct Times {
    /// Nominal day start.
    pub start: ClockTime,
    /// Nominal day end.
    pub end: ClockTime,
    /// Playback head, if the service has one.
    pub current: Option<ClockTime>,
    /// Seconds added on both sides of `start..end` for panning.
    pub buffer: i32,
    /// Snap step in seconds.
    pub interval: i32,
    /// Start of business hours.
    pub business_start: Option<ClockTime>,
    /// End of business hours.
    pub business_end: Option<ClockTime>,
    /// First recorded activity.
    pub actual_start: Option<ClockTime>,
    /// Last recorded activity.
    pub actual_end: Option<ClockTime>,
}

impl Default for Times {
    fn default() -> Self {
        Self {
            start: ClockTime::MIDNIGHT,
            end: ClockTime::END_OF_DAY,
            current: None,
            buffer: 0,
            interval: DEFAULT_INTERVAL,
            business_start: None,
            business_end: None,
            actual_start: None,
            actual_end: None,
        }
    }
}

const DEFAULT_INTERVAL: i32 = 60;

impl Times {
    /// `start - buffer`, in seconds.
    #[must_use]
    pub fn buffered_start(&self) -> f64 {
        self.start.as_f64() - f64::from(self.buffer)
    }

    /// `end + buffer`, in seconds.
    #[must_use]
    pub fn buffered_end(&self) -> f64 {
        self.end.as_f64() + f64::from(self.buffer)
    }
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct TimesWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    buffer: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    interval: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    business_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    business_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    actual_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    actual_end: Option<String>,
}

/// A clock field; anything but an `HH:mm:ss` string is absent.
fn clock_field(value: Option<&Value>) -> Option<ClockTime> {
    value.and_then(Value::as_str).and_then(|s| s.parse().ok())
}

/// A seconds field, given as a number or a numeric string.
fn seconds_field(value: Option<&Value>) -> Option<i32> {
    let secs = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    secs.filter(|v| v.is_finite())
        .map(|v| ClockTime::from_secs_f64(v).seconds())
}

impl From<Value> for Times {
    fn from(value: Value) -> Self {
        let defaults = Self::default();
        let Value::Object(fields) = value else {
            return defaults;
        };
        let clock = |key: &str| clock_field(fields.get(key));
        let (start, end) = match (clock("start"), clock("end")) {
            (Some(s), Some(e)) if s < e => (s, e),
            _ => (defaults.start, defaults.end),
        };
        Self {
            start,
            end,
            current: clock("current"),
            buffer: seconds_field(fields.get("buffer")).unwrap_or(0).max(0),
            interval: seconds_field(fields.get("interval"))
                .filter(|i| *i > 0)
                .unwrap_or(DEFAULT_INTERVAL),
            business_start: clock("businessStart"),
            business_end: clock("businessEnd"),
            actual_start: clock("actualStart"),
            actual_end: clock("actualEnd"),
        }
    }
}

impl From<Times> for TimesWire {
    fn from(t: Times) -> Self {
        let s = |c: Option<ClockTime>| c.map(String::from);
        Self {
            start: s(Some(t.start)),
            end: s(Some(t.end)),
            current: s(t.current),
            buffer: Some(f64::from(t.buffer)),
            interval: Some(f64::from(t.interval)),
            business_start: s(t.business_start),
            business_end: s(t.business_end),
            actual_start: s(t.actual_start),
            actual_end: s(t.actual_end),
        }
    }
}

/// A typed point event on a track, such as a punch in or out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Event type, `"in"`, `"out"` or anything else.
    #[serde(rename = "type")]
    pub kind: String,
    /// When it happened.
    pub timestamp: ClockTime,
}

impl Session {
    /// Creates a session event.
    pub fn new(kind: impl Into<String>, timestamp: ClockTime) -> Self {
        Self {
            kind: kind.into(),
            timestamp,
        }
    }
}

impl PointEvent for Session {
    type Time = ClockTime;

    fn kind(&self) -> &str {
        &self.kind
    }

    fn time(&self) -> ClockTime {
        self.timestamp
    }
}

/// Service-assigned identity of a marker.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkerId {
    /// Numeric id.
    Number(i64),
    /// Textual id.
    Text(String),
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => n.fmt(f),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A normalized elliptical region on a camera frame, tagged with a time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Service-assigned identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MarkerId>,
    /// Time of day the region refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<ClockTime>,
    /// Precise time in seconds; preferred over `timestamp` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<f64>,
    /// Camera the region was drawn on.
    #[serde(default)]
    pub camera_id: String,
    /// Center X, `0..=1`.
    #[serde(default)]
    pub cx: f64,
    /// Center Y, `0..=1`.
    #[serde(default)]
    pub cy: f64,
    /// Horizontal radius, `0..=1`.
    #[serde(default)]
    pub rx: f64,
    /// Vertical radius, `0..=1`.
    #[serde(default)]
    pub ry: f64,
}

impl Marker {
    /// Marker time in seconds since midnight.
    #[must_use]
    pub fn seconds(&self) -> Option<f64> {
        self.ts
            .filter(|t| t.is_finite())
            .or_else(|| self.timestamp.map(ClockTime::as_f64))
    }

    /// Content key used to tell marker sets apart.
    #[must_use]
    pub fn content_key(&self) -> String {
        match &self.id {
            Some(id) => id.to_string(),
            None => format!(
                "{}@{}@{}@{}",
                self.camera_id,
                self.timestamp.map(String::from).unwrap_or_default(),
                self.cx,
                self.cy
            ),
        }
    }
}

/// A row on the timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Track identity.
    pub id: TrackId,
    /// Category the track is listed under.
    pub category: String,
    /// Display name.
    pub name: String,
    /// Point events, in no particular order.
    #[serde(default)]
    pub sessions: Vec<Session>,
    /// Region markers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<Marker>,
}

/// Selected track and range endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Selected track.
    #[serde(default)]
    pub track_id: Option<TrackId>,
    /// `type@HH:mm:ss` keys of the selected endpoints.
    #[serde(default)]
    pub session_keys: Vec<String>,
}

impl Selection {
    /// Selects a track with no endpoints.
    #[must_use]
    pub fn track(track_id: Option<TrackId>) -> Self {
        Self {
            track_id,
            session_keys: Vec::new(),
        }
    }

    /// Parsed endpoint keys; unparseable keys are skipped.
    #[must_use]
    pub fn keys(&self) -> Vec<SessionKey<ClockTime>> {
        self.session_keys
            .iter()
            .filter_map(|k| k.parse().ok())
            .collect()
    }
}

/// Engine-owned view state, echoed to the service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiState {
    /// Seconds from the buffered start to the visible start.
    pub pan_offset_sec: f64,
    /// Zoom factor.
    pub zoom: f64,
    /// Active track category.
    pub category: String,
    /// Whether playback is running.
    pub playback: bool,
    /// Current selection.
    pub selection: Selection,
}

/// Category shown when none has been chosen.
pub const DEFAULT_CATEGORY: &str = "employees";

impl Default for UiState {
    fn default() -> Self {
        Self {
            pan_offset_sec: 0.0,
            zoom: 1.0,
            category: DEFAULT_CATEGORY.to_owned(),
            playback: false,
            selection: Selection::default(),
        }
    }
}

/// A partial [`UiState`]; unset fields are left alone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiPatch {
    /// New pan offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan_offset_sec: Option<f64>,
    /// New zoom.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
    /// New category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// New playback flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playback: Option<bool>,
    /// New selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,
}

impl UiPatch {
    /// A patch that only moves the pan offset.
    #[must_use]
    pub fn pan(seconds: f64) -> Self {
        Self {
            pan_offset_sec: Some(seconds),
            ..Self::default()
        }
    }

    /// A patch that only changes the selection.
    #[must_use]
    pub fn select(selection: Selection) -> Self {
        Self {
            selection: Some(selection),
            ..Self::default()
        }
    }

    /// Layers `newer` on top of `self`; fields set in `newer` win.
    pub fn merge(&mut self, newer: Self) {
        if newer.pan_offset_sec.is_some() {
            self.pan_offset_sec = newer.pan_offset_sec;
        }
        if newer.zoom.is_some() {
            self.zoom = newer.zoom;
        }
        if newer.category.is_some() {
            self.category = newer.category;
        }
        if newer.playback.is_some() {
            self.playback = newer.playback;
        }
        if newer.selection.is_some() {
            self.selection = newer.selection;
        }
    }

    /// Writes the set fields into `ui`.
    pub fn apply_to(&self, ui: &mut UiState) {
        if let Some(pan) = self.pan_offset_sec {
            ui.pan_offset_sec = pan;
        }
        if let Some(zoom) = self.zoom {
            ui.zoom = zoom;
        }
        if let Some(category) = &self.category {
            ui.category.clone_from(category);
        }
        if let Some(playback) = self.playback {
            ui.playback = playback;
        }
        if let Some(selection) = &self.selection {
            ui.selection.clone_from(selection);
        }
    }

    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Times and tracks of a snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineData {
    /// The day being shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times: Option<Times>,
    /// All tracks, every category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<Track>>,
}

/// Full or partial state pushed by the service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineSnapshot {
    /// Whether the timeline window is torn out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub torn: Option<bool>,
    /// View state as the service last saw it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<UiPatch>,
    /// Times and tracks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<TimelineData>,
}

impl TimelineSnapshot {
    /// Times carried by this snapshot.
    #[must_use]
    pub fn times(&self) -> Option<&Times> {
        self.timeline.as_ref().and_then(|t| t.times.as_ref())
    }

    /// Tracks carried by this snapshot, or an empty slice.
    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        self.timeline
            .as_ref()
            .and_then(|t| t.tracks.as_deref())
            .unwrap_or_default()
    }
}
