// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The engine.
//!
//! [`Timeline`] owns the cached snapshot, the view state and the gesture state
//! machine. Hosts feed it input and service events, call
//! [`Timeline::on_frame`] once per display frame, and render with
//! [`Timeline::render`] whenever [`Timeline::take_refresh`] asks for it.

mod commands;
mod keyboard;
mod marking;
mod pointer;

pub use marking::MARKING_HINT;

use core::mem;

use cursor_icon::CursorIcon;
use punchclock_imaging::TextMetrics;
use punchclock_sessions::query::{covering_range, has_start_and_end_at};
use punchclock_sessions::{PairTable, pair};
use punchclock_view::{Snap, TimeView};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::clock::ClockTime;
use crate::config::EngineConfig;
use crate::events::{ChangeDetail, EngineEvent, ToolbarState};
use crate::interaction::{Gesture, InteractionState};
use crate::layout::{CameraImage, FitMode, Layout, Viewport};
use crate::model::{Marker, Times, TimelineSnapshot, Track, UiPatch, UiState};
use crate::render::{Frame, Scene};
use crate::service::{EventName, ServiceEvent, SubscriptionId, TimelineService, optimistic};
use crate::storage::{KeyValueStore, LABEL_WIDTH_KEY, ScopedStore, parse_width};
use crate::sync::{Locate, Outbox, Refresh, escalate, merge_ui};

/// A headless attendance timeline.
///
/// See the crate documentation for an end-to-end example.
pub struct Timeline<S: TimelineService, K: KeyValueStore> {
    service: S,
    store: ScopedStore<K>,
    config: EngineConfig,
    pairs: PairTable,
    subscriptions: Vec<SubscriptionId>,
    times: Times,
    tracks: Vec<Track>,
    ui: UiState,
    torn: bool,
    viewport: Viewport,
    label_width: f64,
    layout: Layout,
    view: TimeView,
    outbox: Outbox,
    locate: Option<Locate>,
    refresh: Option<Refresh>,
    events: Vec<EngineEvent>,
    toolbar: ToolbarState,
    interaction: InteractionState,
    cameras: Vec<CameraImage>,
    fit: FitMode,
    owns_input: bool,
    last_markers_key: Option<String>,
}

impl<S: TimelineService, K: KeyValueStore> core::fmt::Debug for Timeline<S, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Timeline")
            .field("ui", &self.ui)
            .field("torn", &self.torn)
            .field("layout", &self.layout)
            .field("gesture", &self.interaction.gesture.name())
            .field("tracks", &self.tracks.len())
            .finish_non_exhaustive()
    }
}

impl<S: TimelineService, K: KeyValueStore> Timeline<S, K> {
    /// Creates an engine, subscribes to the service and pulls the first
    /// snapshot.
    pub fn new(service: S, store: ScopedStore<K>, config: EngineConfig) -> Self {
        let viewport = Viewport::default();
        let label_width = config.layout.clamp_label_width(config.layout.label_default_width);
        let layout = Layout::new(viewport, label_width, config.layout.row_height, 0);
        let times = Times::default();
        let mut view = TimeView::new(times.buffered_start()..times.buffered_end(), layout.time_width);
        view.set_zoom_limits(config.zoom_limits());
        let ui = UiState {
            category: config.default_category.clone(),
            ..UiState::default()
        };
        let mut timeline = Self {
            service,
            store,
            pairs: config.pair_table(),
            config,
            subscriptions: Vec::new(),
            times,
            tracks: Vec::new(),
            ui,
            torn: false,
            viewport,
            label_width,
            layout,
            view,
            outbox: Outbox::default(),
            locate: None,
            refresh: None,
            events: Vec::new(),
            toolbar: ToolbarState::default(),
            interaction: InteractionState::default(),
            cameras: Vec::new(),
            fit: FitMode::default(),
            owns_input: true,
            last_markers_key: None,
        };
        for event in EventName::ALL {
            if let Some(id) = optimistic("subscribe", timeline.service.subscribe(event)) {
                timeline.subscriptions.push(id);
            }
        }
        if let Some(width) = timeline.stored_label_width() {
            timeline.label_width = width;
        }
        timeline.relayout();
        timeline.sync_from_service();
        timeline.update_toolbar();
        timeline
    }

    /// The service this engine talks to.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Mutable access to the service.
    pub fn service_mut(&mut self) -> &mut S {
        &mut self.service
    }

    /// The preference store.
    pub fn storage(&self) -> &ScopedStore<K> {
        &self.store
    }

    /// The configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current view state.
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// The day being shown.
    pub fn times(&self) -> &Times {
        &self.times
    }

    /// The time viewport of the ruler and session rows.
    pub fn view(&self) -> &TimeView {
        &self.view
    }

    /// Current layer geometry.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Label column width.
    pub fn label_width(&self) -> f64 {
        self.label_width
    }

    /// Whether the window is torn out.
    pub fn is_torn(&self) -> bool {
        self.torn
    }

    /// Input state, for hosts that draw their own affordances.
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Tracks in the active category, in service order.
    pub fn displayed_tracks(&self) -> impl Iterator<Item = &Track> + '_ {
        self.tracks.iter().filter(|t| t.category == self.ui.category)
    }

    /// The selected track, if it is displayed.
    pub fn selected_track(&self) -> Option<&Track> {
        let id = self.ui.selection.track_id?;
        self.displayed_tracks().find(|t| t.id == id)
    }

    fn selected_index(&self) -> Option<usize> {
        let id = self.ui.selection.track_id?;
        self.displayed_tracks().position(|t| t.id == id)
    }

    fn displayed_count(&self) -> usize {
        self.displayed_tracks().count()
    }

    /// Resizes the widget.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.relayout();
    }

    /// Tells the engine whether keyboard input is meant for it.
    pub fn set_owns_input(&mut self, owns_input: bool) {
        self.owns_input = owns_input;
    }

    /// Replaces the camera images marking can draw on.
    pub fn set_cameras(&mut self, cameras: Vec<CameraImage>, fit: FitMode) {
        self.cameras = cameras;
        self.fit = fit;
    }

    /// Cursor the host should show.
    pub fn cursor(&self) -> CursorIcon {
        self.interaction.cursor()
    }

    /// Toolbar state as of the last sync.
    pub fn toolbar(&self) -> &ToolbarState {
        &self.toolbar
    }

    /// Returns and clears queued notifications.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        mem::take(&mut self.events)
    }

    /// Returns and clears what has to be redrawn.
    pub fn take_refresh(&mut self) -> Option<Refresh> {
        self.refresh.take()
    }

    /// Whether [`Timeline::on_frame`] has work to do.
    pub fn needs_frame(&self) -> bool {
        !self.outbox.is_empty() || self.locate.is_some()
    }

    /// Advances the locate animation and flushes coalesced commands.
    ///
    /// Call once per display frame while [`Timeline::needs_frame`] is `true`.
    pub fn on_frame(&mut self, now_ms: f64) {
        if let Some(locate) = &mut self.locate {
            let (offset, done) = locate.sample(now_ms);
            if done {
                self.locate = None;
            }
            self.view.set_pan_offset(offset);
            self.set_ui_local(UiPatch::pan(self.view.pan_offset()));
            if done {
                self.emit_change();
            }
        }
        self.flush();
    }

    fn flush(&mut self) {
        if self.outbox.is_empty() {
            return;
        }
        let (ui, goto) = self.outbox.take();
        if let Some(patch) = ui {
            trace!(?patch, "flushing ui patch");
            optimistic("setUi", self.service.set_ui(&patch));
        }
        if let Some(time) = goto {
            trace!(%time, "flushing goto");
            optimistic("goto", self.service.goto(time));
        }
    }

    /// Builds the three layers for the current state.
    pub fn render(&self, metrics: &dyn TextMetrics) -> Frame {
        let tracks: Vec<&Track> = self.displayed_tracks().collect();
        Scene {
            config: &self.config,
            pairs: &self.pairs,
            layout: &self.layout,
            view: &self.view,
            times: &self.times,
            tracks,
            selection: &self.ui.selection,
            hints: self.config.category_text(&self.ui.category),
            interaction: &self.interaction,
            metrics,
        }
        .build()
    }

    /// Handles a decoded service event.
    pub fn handle_service_event(&mut self, event: ServiceEvent) {
        trace!(event = %event.name(), "service event");
        match event {
            ServiceEvent::Snapshot(snapshot) | ServiceEvent::Playback(snapshot) => {
                self.apply_or_pull(snapshot);
            }
            ServiceEvent::Detached { torn } | ServiceEvent::Attached { torn } => {
                self.torn = torn;
                self.update_toolbar();
            }
            ServiceEvent::Move(snapshot) => {
                self.apply_or_pull(snapshot);
                self.events.push(EngineEvent::Move);
                if self.times.current.is_some_and(|c| !self.view.is_visible(c.as_f64())) {
                    self.center_on_current_time();
                }
            }
            ServiceEvent::PlaybackPaused(snapshot) | ServiceEvent::PlaybackEnded(snapshot) => {
                self.apply_or_pull(snapshot);
                self.ui.playback = false;
                self.update_toolbar();
            }
        }
    }

    /// Pulls a snapshot from the service and applies it.
    pub fn sync_from_service(&mut self) {
        if let Some(Some(snapshot)) = optimistic("snapshot", self.service.snapshot()) {
            self.apply_snapshot(snapshot);
        }
    }

    fn apply_or_pull(&mut self, snapshot: Option<Box<TimelineSnapshot>>) {
        match snapshot {
            Some(snapshot) => self.apply_snapshot(*snapshot),
            None => self.sync_from_service(),
        }
    }

    fn apply_snapshot(&mut self, snapshot: TimelineSnapshot) {
        let before = self.displayed_count();
        self.torn = snapshot.torn == Some(true);
        if let Some(data) = snapshot.timeline {
            if let Some(times) = data.times {
                self.times = times;
            }
            if let Some(tracks) = data.tracks {
                self.tracks = tracks;
            }
        }
        let mut incoming = snapshot.ui.unwrap_or_default();
        incoming.playback.get_or_insert(false);
        merge_ui(&mut self.ui, Some(&incoming), self.outbox.pending_ui());

        let after = self.displayed_count();
        if after == before {
            trace!(tracks = after, "repaint");
            self.sync_view();
            escalate(&mut self.refresh, Refresh::Repaint);
        } else {
            debug!(before, after, "track count changed, relayout");
            if let Some(width) = self.stored_label_width() {
                self.label_width = width;
            }
            self.relayout();
        }
        self.update_toolbar();
        if self.ui.playback && !self.marker_visible() {
            self.center_on_current_time();
        }
        self.emit_markers();
    }

    fn relayout(&mut self) {
        self.layout = Layout::new(
            self.viewport,
            self.label_width,
            self.config.layout.row_height,
            self.displayed_count(),
        );
        self.sync_view();
        escalate(&mut self.refresh, Refresh::Relayout);
    }

    /// Pushes times, width and UI state into the viewport, writing clamped
    /// values back.
    fn sync_view(&mut self) {
        let times = &self.times;
        self.view.set_window(times.buffered_start()..times.buffered_end());
        self.view.set_width(self.layout.time_width);
        self.view.set_snap(Snap::Interval {
            origin: times.start.as_f64(),
            step: f64::from(times.interval),
        });
        self.view.set_zoom(self.ui.zoom);
        let mut correction = UiPatch::default();
        if self.view.zoom() != self.ui.zoom {
            correction.zoom = Some(self.view.zoom());
        }
        if self.view.set_pan_offset(self.ui.pan_offset_sec) {
            debug!(
                requested = self.ui.pan_offset_sec,
                corrected = self.view.pan_offset(),
                "pan offset clamped"
            );
            correction.pan_offset_sec = Some(self.view.pan_offset());
        }
        if !correction.is_empty() {
            self.set_ui_local(correction);
        }
    }

    /// Applies a local UI change and queues it for the service.
    fn set_ui_local(&mut self, patch: UiPatch) {
        patch.apply_to(&mut self.ui);
        self.outbox.push_ui(patch);
        escalate(&mut self.refresh, Refresh::Repaint);
    }

    fn set_gesture(&mut self, gesture: Gesture) {
        trace!(from = self.interaction.gesture.name(), to = gesture.name(), "gesture");
        self.interaction.gesture = gesture;
        escalate(&mut self.refresh, Refresh::Repaint);
    }

    /// The stored label width, clamped; the default when nothing usable is
    /// stored, `None` when the store fails.
    fn stored_label_width(&self) -> Option<f64> {
        let stored = match self.store.get(LABEL_WIDTH_KEY) {
            Ok(value) => value.as_ref().and_then(parse_width),
            Err(err) => {
                warn!(%err, "label width could not be read");
                return None;
            }
        };
        let width = stored.unwrap_or_else(|| {
            debug!(default = self.config.layout.label_default_width, "no stored label width");
            self.config.layout.label_default_width
        });
        Some(self.config.layout.clamp_label_width(width))
    }

    fn persist_label_width(&mut self) {
        let width = self.config.layout.clamp_label_width(self.label_width);
        if let Err(err) = self.store.set(LABEL_WIDTH_KEY, Value::from(width)) {
            warn!(%err, "label width could not be stored");
        }
    }

    /// Whether the playhead is strictly inside the visible window.
    pub fn marker_visible(&self) -> bool {
        self.times.current.is_some_and(|c| {
            let t = c.as_f64();
            self.view.visible_start() < t && t < self.view.visible_end()
        })
    }

    /// Whether the playhead lies strictly inside a closed range of the
    /// selected track.
    pub fn cut_available(&self) -> bool {
        let (Some(track), Some(current)) = (self.selected_track(), self.times.current) else {
            return false;
        };
        let pairs = pair(&track.sessions, &self.pairs);
        covering_range(&pairs, current).is_some()
    }

    /// Whether the selected track has a start and an end exactly at the
    /// playhead.
    pub fn patch_available(&self) -> bool {
        let (Some(track), Some(current)) = (self.selected_track(), self.times.current) else {
            return false;
        };
        has_start_and_end_at(&track.sessions, current, &self.pairs)
    }

    fn emit_change(&mut self) {
        let detail = ChangeDetail {
            offset: self.ui.pan_offset_sec,
            marker_visible: self.marker_visible(),
            patch_available: self.patch_available(),
            cut_available: self.cut_available(),
            selected_track: self.selected_track().cloned(),
        };
        self.events.push(EngineEvent::Change(detail));
    }

    fn update_toolbar(&mut self) {
        self.toolbar = ToolbarState {
            torn: self.torn,
            playback: self.ui.playback,
            current_time: self
                .times
                .current
                .map_or_else(|| "-".to_owned(), |c| c.to_string()),
            track_selected: self.selected_track().is_some(),
            cut_available: self.cut_available(),
            patch_available: self.patch_available(),
            has_no_tracks: self.displayed_count() == 0,
        };
    }

    /// Markers on the selected track within tolerance of the playhead.
    pub fn active_markers(&self) -> Vec<Marker> {
        let (Some(track), Some(current)) = (self.selected_track(), self.times.current) else {
            return Vec::new();
        };
        let tolerance = self.config.markers.tolerance;
        track
            .markers
            .iter()
            .filter(|m| {
                m.seconds()
                    .is_some_and(|s| (s - current.as_f64()).abs() <= tolerance)
            })
            .cloned()
            .collect()
    }

    fn emit_markers(&mut self) {
        let markers = self.active_markers();
        let key = markers
            .iter()
            .map(Marker::content_key)
            .collect::<Vec<_>>()
            .join("|");
        if self.last_markers_key.as_deref() == Some(key.as_str()) {
            return;
        }
        self.last_markers_key = Some(key);
        let current = self.times.current;
        let track_id = current.and(self.selected_track().map(|t| t.id));
        self.events.push(EngineEvent::Markers {
            current,
            track_id,
            markers,
        });
    }

    /// Animates the view so the playhead sits in the middle of the ruler.
    pub fn center_on_current_time(&mut self) {
        let Some(current) = self.times.current else {
            return;
        };
        let target = self.view.centered_offset(current.as_f64());
        let from = self.view.pan_offset();
        if self.locate.as_ref().is_some_and(|l| l.target() == target) {
            return;
        }
        match Locate::new(from, target, self.config.locate_ms) {
            Some(locate) => {
                trace!(from, target, "locating current time");
                self.locate = Some(locate);
            }
            None => {
                self.locate = None;
                self.view.set_pan_offset(target);
                self.set_ui_local(UiPatch::pan(self.view.pan_offset()));
                self.emit_change();
            }
        }
    }

    fn current_time(&self) -> Option<ClockTime> {
        self.times.current
    }

    fn primary_pair(&self) -> (String, String) {
        let (start, end) = self.pairs.primary();
        (start.to_owned(), end.to_owned())
    }
}

impl<S: TimelineService, K: KeyValueStore> Drop for Timeline<S, K> {
    fn drop(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.service.unsubscribe(id);
        }
    }
}
