// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory collaborators for tests, benches and headless hosts.
//!
//! [`FakeService`] is a cheaply cloneable handle: keep one clone, hand the
//! other to a [`Timeline`](crate::Timeline), and inspect the commands it sent.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use crate::clock::ClockTime;
use crate::error::{ServiceError, StorageError};
use crate::model::{Session, TimelineData, TimelineSnapshot, Track, TrackId, UiPatch};
use crate::service::{
    ClearMarkersAt, EventName, MarkerPayload, RangeUpdate, SessionRange, SubscriptionId, TimelineService,
};
use crate::storage::KeyValueStore;

/// A command received by [`FakeService`].
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// `first()`.
    First,
    /// `back()`.
    Back,
    /// `next()`.
    Next,
    /// `last()`.
    Last,
    /// `goto(time)`.
    Goto(ClockTime),
    /// `play()`.
    Play,
    /// `pause()`.
    Pause,
    /// `add_track(track)`.
    AddTrack(Track),
    /// `remove_track(id)`.
    RemoveTrack(TrackId),
    /// `add_session(track, session)`.
    AddSession(TrackId, Session),
    /// `delete_session(track, session)`.
    DeleteSession(TrackId, Session),
    /// `update_range(track, update)`.
    UpdateRange(TrackId, RangeUpdate),
    /// `cut(track, range, time)`.
    Cut(TrackId, Option<SessionRange>, ClockTime),
    /// `patch(track, range, time)`.
    Patch(TrackId, Option<SessionRange>, ClockTime),
    /// `add_marker(track, marker)`.
    AddMarker(TrackId, MarkerPayload),
    /// `clear_markers_at(track, query)`.
    ClearMarkersAt(TrackId, ClearMarkersAt),
    /// `torn()`.
    Torn,
    /// `detach()`.
    Detach,
    /// `attach()`.
    Attach,
    /// `set_ui(patch)`.
    SetUi(UiPatch),
}

#[derive(Debug, Default)]
struct FakeState {
    snapshot: Option<TimelineSnapshot>,
    commands: Vec<Command>,
    failing: bool,
    torn: bool,
    next_subscription: u64,
    subscriptions: Vec<(SubscriptionId, EventName)>,
    snapshot_pulls: u32,
}

/// A [`TimelineService`] that keeps its tracks in memory.
///
/// Track, session and tear-out commands mutate the held snapshot so a
/// following pull sees them. Every command is recorded, including those that
/// fail while [`FakeService::set_failing`] is on.
#[derive(Clone, Debug, Default)]
pub struct FakeService {
    state: Rc<RefCell<FakeState>>,
}

impl FakeService {
    /// A service that serves `snapshot`.
    pub fn new(snapshot: TimelineSnapshot) -> Self {
        let service = Self::default();
        service.set_snapshot(snapshot);
        service
    }

    /// Replaces the served snapshot.
    pub fn set_snapshot(&self, snapshot: TimelineSnapshot) {
        let mut state = self.state.borrow_mut();
        state.torn = snapshot.torn.unwrap_or(false);
        state.snapshot = Some(snapshot);
    }

    /// The served snapshot.
    pub fn snapshot_value(&self) -> Option<TimelineSnapshot> {
        self.state.borrow().snapshot.clone()
    }

    /// Makes every call fail with [`ServiceError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.state.borrow_mut().failing = failing;
    }

    /// Commands received so far.
    pub fn commands(&self) -> Vec<Command> {
        self.state.borrow().commands.clone()
    }

    /// Returns and forgets the commands received so far.
    pub fn take_commands(&self) -> Vec<Command> {
        core::mem::take(&mut self.state.borrow_mut().commands)
    }

    /// Events with a live subscription.
    pub fn active_subscriptions(&self) -> Vec<EventName> {
        self.state.borrow().subscriptions.iter().map(|(_, e)| *e).collect()
    }

    /// How many times a snapshot was pulled.
    pub fn snapshot_pulls(&self) -> u32 {
        self.state.borrow().snapshot_pulls
    }

    fn record(&mut self, command: Command) -> Result<(), ServiceError> {
        let mut state = self.state.borrow_mut();
        state.commands.push(command);
        if state.failing {
            return Err(ServiceError::Unavailable("fake service is offline".to_owned()));
        }
        Ok(())
    }

    fn tracks_mut(&mut self, f: impl FnOnce(&mut Vec<Track>)) {
        let mut state = self.state.borrow_mut();
        let snapshot = state.snapshot.get_or_insert_with(TimelineSnapshot::default);
        let data = snapshot.timeline.get_or_insert_with(TimelineData::default);
        f(data.tracks.get_or_insert_with(Vec::new));
    }

    fn sessions_mut(&mut self, track: TrackId, f: impl FnOnce(&mut Vec<Session>)) {
        self.tracks_mut(|tracks| {
            if let Some(t) = tracks.iter_mut().find(|t| t.id == track) {
                f(&mut t.sessions);
            }
        });
    }

    fn set_torn(&mut self, torn: bool) {
        let mut state = self.state.borrow_mut();
        state.torn = torn;
        if let Some(snapshot) = state.snapshot.as_mut() {
            snapshot.torn = Some(torn);
        }
    }
}

impl TimelineService for FakeService {
    fn snapshot(&mut self) -> Result<Option<TimelineSnapshot>, ServiceError> {
        let mut state = self.state.borrow_mut();
        state.snapshot_pulls += 1;
        if state.failing {
            return Err(ServiceError::Unavailable("fake service is offline".to_owned()));
        }
        Ok(state.snapshot.clone())
    }

    fn subscribe(&mut self, event: EventName) -> Result<SubscriptionId, ServiceError> {
        let mut state = self.state.borrow_mut();
        state.next_subscription += 1;
        let id = SubscriptionId(state.next_subscription);
        state.subscriptions.push((id, event));
        Ok(id)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.state.borrow_mut().subscriptions.retain(|(s, _)| *s != id);
    }

    fn first(&mut self) -> Result<(), ServiceError> {
        self.record(Command::First)
    }

    fn back(&mut self) -> Result<(), ServiceError> {
        self.record(Command::Back)
    }

    fn next(&mut self) -> Result<(), ServiceError> {
        self.record(Command::Next)
    }

    fn last(&mut self) -> Result<(), ServiceError> {
        self.record(Command::Last)
    }

    fn goto(&mut self, time: ClockTime) -> Result<(), ServiceError> {
        self.record(Command::Goto(time))?;
        let mut state = self.state.borrow_mut();
        if let Some(times) = state
            .snapshot
            .as_mut()
            .and_then(|s| s.timeline.as_mut())
            .and_then(|t| t.times.as_mut())
        {
            times.current = Some(time);
        }
        Ok(())
    }

    fn play(&mut self) -> Result<(), ServiceError> {
        self.record(Command::Play)
    }

    fn pause(&mut self) -> Result<(), ServiceError> {
        self.record(Command::Pause)
    }

    fn add_track(&mut self, track: Track) -> Result<(), ServiceError> {
        self.record(Command::AddTrack(track.clone()))?;
        self.tracks_mut(|tracks| tracks.push(track));
        Ok(())
    }

    fn remove_track(&mut self, id: TrackId) -> Result<(), ServiceError> {
        self.record(Command::RemoveTrack(id))?;
        self.tracks_mut(|tracks| tracks.retain(|t| t.id != id));
        Ok(())
    }

    fn add_session(&mut self, track: TrackId, session: Session) -> Result<(), ServiceError> {
        self.record(Command::AddSession(track, session.clone()))?;
        self.sessions_mut(track, |sessions| sessions.push(session));
        Ok(())
    }

    fn delete_session(&mut self, track: TrackId, session: Session) -> Result<(), ServiceError> {
        self.record(Command::DeleteSession(track, session.clone()))?;
        self.sessions_mut(track, |sessions| sessions.retain(|s| *s != session));
        Ok(())
    }

    fn update_range(&mut self, track: TrackId, update: RangeUpdate) -> Result<(), ServiceError> {
        self.record(Command::UpdateRange(track, update))?;
        self.sessions_mut(track, |sessions| {
            for s in sessions {
                if s.timestamp == update.start_old && s.kind == "in" {
                    s.timestamp = update.start_new;
                } else if s.timestamp == update.end_old && s.kind == "out" {
                    s.timestamp = update.end_new;
                }
            }
        });
        Ok(())
    }

    fn cut(&mut self, track: TrackId, range: Option<SessionRange>, time: ClockTime) -> Result<(), ServiceError> {
        self.record(Command::Cut(track, range, time))
    }

    fn patch(&mut self, track: TrackId, range: Option<SessionRange>, time: ClockTime) -> Result<(), ServiceError> {
        self.record(Command::Patch(track, range, time))
    }

    fn add_marker(&mut self, track: TrackId, marker: MarkerPayload) -> Result<(), ServiceError> {
        self.record(Command::AddMarker(track, marker))
    }

    fn clear_markers_at(&mut self, track: TrackId, query: ClearMarkersAt) -> Result<(), ServiceError> {
        self.record(Command::ClearMarkersAt(track, query))?;
        self.tracks_mut(|tracks| {
            if let Some(t) = tracks.iter_mut().find(|t| t.id == track) {
                let at = query.timestamp.as_f64();
                t.markers
                    .retain(|m| m.seconds().is_none_or(|s| (s - at).abs() > query.tolerance));
            }
        });
        Ok(())
    }

    fn torn(&mut self) -> Result<bool, ServiceError> {
        self.record(Command::Torn)?;
        Ok(self.state.borrow().torn)
    }

    fn detach(&mut self) -> Result<(), ServiceError> {
        self.record(Command::Detach)?;
        self.set_torn(true);
        Ok(())
    }

    fn attach(&mut self) -> Result<(), ServiceError> {
        self.record(Command::Attach)?;
        self.set_torn(false);
        Ok(())
    }

    fn set_ui(&mut self, patch: &UiPatch) -> Result<(), ServiceError> {
        self.record(Command::SetUi(patch.clone()))
    }
}

/// A [`KeyValueStore`] backed by a hash map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<(String, String), Value>,
    failing: bool,
}

impl MemoryStore {
    /// Makes every call fail with [`StorageError::Backend`].
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// Reads a value without going through the trait.
    pub fn value(&self, scope: &str, key: &str) -> Option<&Value> {
        self.values.get(&(scope.to_owned(), key.to_owned()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, scope: &str, key: &str) -> Result<Option<Value>, StorageError> {
        if self.failing {
            return Err(StorageError::Backend("memory store is offline".to_owned()));
        }
        Ok(self.value(scope, key).cloned())
    }

    fn set(&mut self, scope: &str, key: &str, value: Value) -> Result<(), StorageError> {
        if self.failing {
            return Err(StorageError::Backend("memory store is offline".to_owned()));
        }
        self.values.insert((scope.to_owned(), key.to_owned()), value);
        Ok(())
    }
}
