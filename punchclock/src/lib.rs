// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=punchclock --heading-base-level=0

//! Punchclock: a headless attendance timeline engine.
//!
//! A [`Timeline`] shows one day of attendance for a list of tracks (people,
//! vehicles, machines). Each track carries typed point events such as punch
//! in and punch out, which are paired into ranges and drawn as bars under a
//! zoomable, pannable time ruler with a playhead.
//!
//! The engine owns no window, canvas or clock. The host:
//!
//! - implements [`TimelineService`], the store of tracks and the playback
//!   controller, and [`KeyValueStore`] for the persisted label column width;
//! - forwards pointer, wheel and key input in layer-local coordinates;
//! - decodes service notifications into [`ServiceEvent`]s and hands them over;
//! - calls [`Timeline::on_frame`] once per display frame;
//! - renders [`Frame`]s, three display lists of [`punchclock_imaging`] ops,
//!   onto whatever surfaces it has;
//! - drains [`EngineEvent`]s for its own widgets.
//!
//! Local view changes (pan, zoom, selection) apply immediately and are sent
//! back to the service once per frame. Snapshots that arrive in between are
//! merged underneath the pending change, so the view never jumps back while a
//! gesture is in flight.
//!
//! ## Example
//!
//! ```rust
//! use punchclock::testing::{FakeService, MemoryStore};
//! use punchclock::{
//!     ClockTime, EngineConfig, ScopedStore, Session, Times, Timeline, TimelineData,
//!     TimelineSnapshot, Track, TrackId, Viewport,
//! };
//! use punchclock_imaging::ApproxTextMetrics;
//!
//! let snapshot = TimelineSnapshot {
//!     torn: Some(false),
//!     ui: None,
//!     timeline: Some(TimelineData {
//!         times: Some(Times {
//!             start: ClockTime::from_hms(8, 0, 0),
//!             end: ClockTime::from_hms(18, 0, 0),
//!             current: Some(ClockTime::from_hms(9, 30, 0)),
//!             ..Times::default()
//!         }),
//!         tracks: Some(vec![Track {
//!             id: TrackId(1),
//!             category: "employees".into(),
//!             name: "Ada".into(),
//!             sessions: vec![
//!                 Session::new("in", ClockTime::from_hms(9, 0, 0)),
//!                 Session::new("out", ClockTime::from_hms(12, 0, 0)),
//!             ],
//!             markers: vec![],
//!         }]),
//!     }),
//! };
//!
//! let service = FakeService::new(snapshot);
//! let store = ScopedStore::new(MemoryStore::default(), "acme", "hq").unwrap();
//! let mut timeline = Timeline::new(service.clone(), store, EngineConfig::default());
//! timeline.resize(Viewport { width: 1000.0, height: 200.0, ruler_height: 32.0 });
//!
//! assert_eq!(timeline.displayed_tracks().count(), 1);
//! assert_eq!(timeline.toolbar().current_time, "09:30:00");
//!
//! let frame = timeline.render(&ApproxTextMetrics::default());
//! assert!(frame.main.texts().any(|t| t == "Ada"));
//! ```
//!
//! ## Features
//!
//! The crate has no optional features. [`testing`] holds in-memory
//! collaborators and is always compiled so hosts can run the engine headless.

pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod render;
pub mod service;
pub mod storage;
pub mod sync;
pub mod testing;
pub mod theme;
pub mod timeline;

pub use clock::ClockTime;
pub use config::{CategoryText, DragConfig, EngineConfig, LayoutConfig, MarkerConfig, RulerConfig, ZoomConfig};
pub use error::{ClockParseError, ConfigError, Error, ServiceError, StorageError};
pub use events::{ChangeDetail, EngineEvent, ToolbarState};
pub use interaction::{Gesture, Hover, Intents, InteractionState, Key, Layer, MarkingPhase, SessionResize, Side};
pub use layout::{CameraImage, FitMode, Layout, Viewport};
pub use model::{
    DEFAULT_CATEGORY, Marker, MarkerId, Selection, Session, Times, TimelineData, TimelineSnapshot, Track, TrackId,
    UiPatch, UiState,
};
pub use render::Frame;
pub use service::{
    ClearMarkersAt, EventName, MarkerPayload, RangeUpdate, ServiceEvent, SessionRange, SubscriptionId, TimelineService,
};
pub use storage::{DEFAULT_LABEL_WIDTH, KeyValueStore, LABEL_WIDTH_KEY, ScopedStore};
pub use sync::Refresh;
pub use theme::Theme;
pub use timeline::{MARKING_HINT, Timeline};
