// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reconciling service snapshots with local intent.
//!
//! Local gestures patch [`UiState`] immediately and queue the same patch in the
//! [`Outbox`]. Snapshots arriving before the next frame flush are merged first
//! and the queued patch is layered on top again, so an echo of an older state
//! cannot yank the view back mid-drag.

use crate::clock::ClockTime;
use crate::model::{UiPatch, UiState};

/// What the host has to redo before the next present.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Refresh {
    /// Draw again with the same layer sizes.
    Repaint,
    /// Resize the layers, then draw.
    Relayout,
}

/// Raises `slot` to at least `refresh`.
pub(crate) fn escalate(slot: &mut Option<Refresh>, refresh: Refresh) {
    *slot = Some(slot.map_or(refresh, |r| r.max(refresh)));
}

/// Outbound commands coalesced until the next frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Outbox {
    ui: Option<UiPatch>,
    goto: Option<ClockTime>,
}

impl Outbox {
    /// Queues a UI patch; fields set later win.
    pub(crate) fn push_ui(&mut self, patch: UiPatch) {
        match &mut self.ui {
            Some(pending) => pending.merge(patch),
            None => self.ui = Some(patch),
        }
    }

    /// Queues a seek; only the latest survives.
    pub(crate) fn push_goto(&mut self, time: ClockTime) {
        self.goto = Some(time);
    }

    /// The patch waiting for the next flush.
    pub(crate) fn pending_ui(&self) -> Option<&UiPatch> {
        self.ui.as_ref()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.ui.is_none() && self.goto.is_none()
    }

    /// Drains everything queued.
    pub(crate) fn take(&mut self) -> (Option<UiPatch>, Option<ClockTime>) {
        (self.ui.take(), self.goto.take())
    }
}

/// Merges an incoming UI patch, then re-applies the pending local one.
pub(crate) fn merge_ui(ui: &mut UiState, incoming: Option<&UiPatch>, pending: Option<&UiPatch>) {
    if let Some(incoming) = incoming {
        incoming.apply_to(ui);
    }
    if let Some(pending) = pending {
        pending.apply_to(ui);
    }
}

/// Pan offsets closer than this are snapped instead of animated.
const LOCATE_JUMP: f64 = 0.1;

/// Eased pan toward a target offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Locate {
    from: f64,
    to: f64,
    duration: f64,
    started: Option<f64>,
}

impl Locate {
    /// Starts a pan from `from` to `to`, or `None` if it would be a jump.
    pub(crate) fn new(from: f64, to: f64, duration_ms: f64) -> Option<Self> {
        if (to - from).abs() < LOCATE_JUMP || duration_ms <= 0.0 {
            return None;
        }
        Some(Self {
            from,
            to,
            duration: duration_ms,
            started: None,
        })
    }

    pub(crate) fn target(&self) -> f64 {
        self.to
    }

    /// Offset at frame time `now_ms`, and whether the animation is done.
    ///
    /// The first sampled frame is the start of the animation.
    pub(crate) fn sample(&mut self, now_ms: f64) -> (f64, bool) {
        let started = *self.started.get_or_insert(now_ms);
        let t = ((now_ms - started) / self.duration).clamp(0.0, 1.0);
        let offset = self.from + (self.to - self.from) * ease_in_out_cubic(t);
        (offset, t >= 1.0)
    }
}

pub(crate) fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Selection, TrackId};

    #[test]
    fn outbox_coalesces() {
        let mut outbox = Outbox::default();
        assert!(outbox.is_empty());
        outbox.push_ui(UiPatch::pan(10.0));
        outbox.push_ui(UiPatch::select(Selection::track(Some(TrackId(2)))));
        outbox.push_ui(UiPatch::pan(30.0));
        outbox.push_goto(ClockTime::from_hms(9, 0, 0));
        outbox.push_goto(ClockTime::from_hms(9, 5, 0));

        let (ui, goto) = outbox.take();
        let ui = ui.unwrap();
        assert_eq!(ui.pan_offset_sec, Some(30.0));
        assert_eq!(ui.selection.unwrap().track_id, Some(TrackId(2)));
        assert_eq!(goto, Some(ClockTime::from_hms(9, 5, 0)));
        assert!(outbox.is_empty());
    }

    #[test]
    fn pending_patch_wins_over_echo() {
        let mut ui = UiState::default();
        let mut echo = UiPatch::pan(5.0);
        echo.zoom = Some(2.0);
        merge_ui(&mut ui, Some(&echo), Some(&UiPatch::pan(42.0)));
        assert_eq!(ui.pan_offset_sec, 42.0);
        assert_eq!(ui.zoom, 2.0);
    }

    #[test]
    fn refresh_only_escalates() {
        let mut slot = None;
        escalate(&mut slot, Refresh::Relayout);
        escalate(&mut slot, Refresh::Repaint);
        assert_eq!(slot, Some(Refresh::Relayout));
    }

    #[test]
    fn locate_eases_and_finishes() {
        assert!(Locate::new(100.0, 100.05, 700.0).is_none());
        let mut locate = Locate::new(0.0, 1000.0, 700.0).unwrap();
        assert_eq!(locate.sample(50.0), (0.0, false));
        let (mid, done) = locate.sample(400.0);
        assert!(!done);
        assert!((mid - 500.0).abs() < 1e-9);
        assert_eq!(locate.sample(800.0), (1000.0, true));
    }

    #[test]
    fn easing_is_symmetric() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        let a = ease_in_out_cubic(0.25);
        let b = ease_in_out_cubic(0.75);
        assert!((a + b - 1.0).abs() < 1e-12);
    }
}
