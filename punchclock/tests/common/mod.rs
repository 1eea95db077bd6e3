// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for the engine tests.
//!
//! The default day runs 08:00 to 18:00 with no buffer, a five minute snap
//! interval and the playhead at 09:30. With a 1000 px widget the label column
//! is 250 px and the time area 750 px; at zoom 2 that is 24 s/px, so the
//! visible window at pan 0 is 08:00 to 13:00.

#![allow(dead_code, reason = "not every test binary uses every fixture")]

use punchclock::testing::{FakeService, MemoryStore};
use punchclock::{
    ClockTime, EngineConfig, Marker, ScopedStore, Selection, Session, Times, Timeline, TimelineData,
    TimelineSnapshot, Track, TrackId, UiPatch, Viewport,
};
use tracing_subscriber::EnvFilter;

pub type Engine = Timeline<FakeService, MemoryStore>;

pub const VIEWPORT: Viewport = Viewport {
    width: 1000.0,
    height: 200.0,
    ruler_height: 32.0,
};

/// Top of the first track row in the main layer.
pub const ROW0: f64 = 32.0;
/// Vertical center of the bars on the first row.
pub const BAR0_Y: f64 = ROW0 + 8.0 + 7.0;

pub fn t(hours: i32, minutes: i32) -> ClockTime {
    ClockTime::from_hms(hours, minutes, 0)
}

pub fn times() -> Times {
    Times {
        start: t(8, 0),
        end: t(18, 0),
        current: Some(t(9, 30)),
        buffer: 0,
        interval: 300,
        business_start: Some(t(9, 0)),
        business_end: Some(t(17, 0)),
        actual_start: None,
        actual_end: None,
    }
}

pub fn track(id: i64, category: &str, name: &str, sessions: Vec<Session>) -> Track {
    Track {
        id: TrackId(id),
        category: category.to_owned(),
        name: name.to_owned(),
        sessions,
        markers: Vec::new(),
    }
}

pub fn marker(id: i64, ts: f64) -> Marker {
    Marker {
        id: Some(punchclock::MarkerId::Number(id)),
        timestamp: Some(ClockTime::from_secs_f64(ts)),
        ts: Some(ts),
        camera_id: "cam-1".to_owned(),
        cx: 0.5,
        cy: 0.5,
        rx: 0.1,
        ry: 0.1,
    }
}

/// Ada worked 09:00 to 12:00 and punched in again at 13:00; Grace has no
/// punches yet; a vehicle track lives in another category.
pub fn tracks() -> Vec<Track> {
    vec![
        track(
            1,
            "employees",
            "Ada",
            vec![
                Session::new("out", t(12, 0)),
                Session::new("in", t(9, 0)),
                Session::new("in", t(13, 0)),
            ],
        ),
        track(2, "employees", "Grace", Vec::new()),
        track(10, "vehicles", "Truck 7", vec![Session::new("in", t(8, 30))]),
    ]
}

pub fn ui(selection: Selection) -> UiPatch {
    UiPatch {
        pan_offset_sec: Some(0.0),
        zoom: Some(2.0),
        category: Some("employees".to_owned()),
        playback: Some(false),
        selection: Some(selection),
    }
}

pub fn snapshot_with(times: Times, tracks: Vec<Track>, ui: UiPatch) -> TimelineSnapshot {
    TimelineSnapshot {
        torn: Some(false),
        ui: Some(ui),
        timeline: Some(TimelineData {
            times: Some(times),
            tracks: Some(tracks),
        }),
    }
}

/// The default day with Ada selected.
pub fn snapshot() -> TimelineSnapshot {
    snapshot_with(times(), tracks(), ui(Selection::track(Some(TrackId(1)))))
}

/// Ada's morning range selected by its two endpoint keys.
pub fn range_selection() -> Selection {
    Selection {
        track_id: Some(TrackId(1)),
        session_keys: vec!["in@09:00:00".to_owned(), "out@12:00:00".to_owned()],
    }
}

/// Routes engine logs to the test harness; filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn build(snapshot: TimelineSnapshot, store: MemoryStore) -> (FakeService, Engine) {
    init_tracing();
    let service = FakeService::new(snapshot);
    let store = ScopedStore::new(store, "acme", "hq").unwrap();
    let mut timeline = Timeline::new(service.clone(), store, EngineConfig::default());
    timeline.resize(VIEWPORT);
    (service, timeline)
}

/// An engine over `snapshot` with construction noise already drained.
pub fn engine_with(snapshot: TimelineSnapshot) -> (FakeService, Engine) {
    let (service, mut timeline) = build(snapshot, MemoryStore::default());
    timeline.on_frame(0.0);
    timeline.drain_events();
    timeline.take_refresh();
    service.take_commands();
    (service, timeline)
}

pub fn engine() -> (FakeService, Engine) {
    engine_with(snapshot())
}

/// Main-layer `x` of time `c` at the fixture's default view.
pub fn main_x(c: ClockTime) -> f64 {
    250.0 + (c.as_f64() - t(8, 0).as_f64()) / 24.0
}
