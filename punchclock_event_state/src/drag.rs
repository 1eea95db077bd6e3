// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchored drag state: movement deltas plus a value captured at press time.
//!
//! ## Usage
//!
//! 1) Call [`DragState::start`] with the press position and the anchor value
//!    the gesture is computed from.
//! 2) On each move, use [`DragState::total_offset`] (absolute gestures such as
//!    panning) or [`DragState::update`] (incremental gestures).
//! 3) Call [`DragState::end`] on release or cancel; it hands back the anchor.
//!
//! [`DragState::has_moved`] tells a release apart from a click.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use punchclock_event_state::drag::DragState;
//!
//! let mut drag = DragState::default();
//! drag.start(Point::new(10.0, 20.0), "range");
//! assert!(drag.is_dragging());
//!
//! let delta = drag.update(Point::new(15.0, 25.0)).unwrap();
//! assert_eq!(delta.x, 5.0);
//!
//! assert!(drag.has_moved(3.0));
//! assert_eq!(drag.end(), Some("range"));
//! assert!(!drag.is_dragging());
//! ```

use kurbo::{Point, Vec2};

/// Tracks a drag and the anchor value it started from.
#[derive(Debug, Clone, Copy)]
pub struct DragState<A> {
    /// Start position of the drag operation.
    pub start_pos: Option<Point>,
    /// Last recorded pointer position during the drag.
    pub last_pos: Option<Point>,
    anchor: Option<A>,
    travel: f64,
}

impl<A> Default for DragState<A> {
    fn default() -> Self {
        Self {
            start_pos: None,
            last_pos: None,
            anchor: None,
            travel: 0.0,
        }
    }
}

impl<A> DragState<A> {
    /// Start tracking a new drag from `pos`, remembering `anchor`.
    pub fn start(&mut self, pos: Point, anchor: A) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
        self.anchor = Some(anchor);
        self.travel = 0.0;
    }

    /// Update with a new position, returning the delta since the last update.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        self.start_pos?;
        let Some(last_pos) = self.last_pos else {
            self.last_pos = Some(pos);
            return None;
        };
        let delta = pos - last_pos;
        self.last_pos = Some(pos);
        self.travel = self.travel.max(self.total_offset(pos).map_or(0.0, Vec2::hypot));
        Some(delta)
    }

    /// Offset of `current_pos` from the drag start.
    pub fn total_offset(&self, current_pos: Point) -> Option<Vec2> {
        self.start_pos.map(|start_pos| current_pos - start_pos)
    }

    /// Returns the anchor captured by [`DragState::start`].
    pub fn anchor(&self) -> Option<&A> {
        self.anchor.as_ref()
    }

    /// Mutable access to the anchor, for gestures that refine it as they go.
    pub fn anchor_mut(&mut self) -> Option<&mut A> {
        self.anchor.as_mut()
    }

    /// Whether the pointer ever strayed more than `threshold` from the start.
    pub fn has_moved(&self, threshold: f64) -> bool {
        self.travel > threshold
    }

    /// End the drag, returning its anchor.
    pub fn end(&mut self) -> Option<A> {
        self.start_pos = None;
        self.last_pos = None;
        self.travel = 0.0;
        self.anchor.take()
    }

    /// Returns `true` while a drag is active.
    pub fn is_dragging(&self) -> bool {
        self.start_pos.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_drag_state_is_not_dragging() {
        let drag = DragState::<()>::default();
        assert!(!drag.is_dragging());
        assert!(drag.anchor().is_none());
    }

    #[test]
    fn start_records_position_and_anchor() {
        let mut drag = DragState::default();
        let start = Point::new(10.0, 20.0);

        drag.start(start, 42_u32);

        assert_eq!(drag.start_pos, Some(start));
        assert_eq!(drag.start_pos, drag.last_pos);
        assert_eq!(drag.anchor(), Some(&42));
    }

    #[test]
    fn update_returns_incremental_deltas() {
        let mut drag = DragState::default();
        drag.start(Point::new(0.0, 0.0), ());

        assert_eq!(drag.update(Point::new(5.0, 3.0)), Some(Vec2::new(5.0, 3.0)));
        assert_eq!(drag.update(Point::new(8.0, 7.0)), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(
            drag.total_offset(Point::new(8.0, 7.0)),
            Some(Vec2::new(8.0, 7.0))
        );
    }

    #[test]
    fn update_is_ignored_when_not_dragging() {
        let mut drag = DragState::<()>::default();
        assert_eq!(drag.update(Point::new(15.0, 25.0)), None);
        assert!(drag.last_pos.is_none());
        assert_eq!(drag.total_offset(Point::new(1.0, 1.0)), None);
    }

    #[test]
    fn end_returns_anchor_and_resets() {
        let mut drag = DragState::default();
        drag.start(Point::new(10.0, 20.0), 7.5_f64);
        drag.update(Point::new(30.0, 20.0));

        assert_eq!(drag.end(), Some(7.5));
        assert!(drag.start_pos.is_none());
        assert!(drag.last_pos.is_none());
        assert!(!drag.has_moved(0.0));
        assert_eq!(drag.end(), None);
    }

    #[test]
    fn travel_tracks_the_furthest_excursion() {
        let mut drag = DragState::default();
        drag.start(Point::new(100.0, 100.0), ());
        drag.update(Point::new(101.0, 100.0));
        assert!(!drag.has_moved(3.0));

        drag.update(Point::new(110.0, 100.0));
        // Coming back to the start still counts as a drag.
        drag.update(Point::new(100.0, 100.0));
        assert!(drag.has_moved(3.0));
    }

    #[test]
    fn anchor_can_be_refined() {
        let mut drag = DragState::default();
        drag.start(Point::ZERO, (0_i32, 10_i32));
        if let Some(range) = drag.anchor_mut() {
            range.1 = 20;
        }
        assert_eq!(drag.end(), Some((0, 20)));
    }

    #[test]
    fn restart_overwrites_previous_drag() {
        let mut drag = DragState::default();
        drag.start(Point::new(0.0, 0.0), 1_u8);
        drag.update(Point::new(10.0, 10.0));

        let new_start = Point::new(50.0, 60.0);
        drag.start(new_start, 2);

        assert_eq!(drag.anchor(), Some(&2));
        assert!(!drag.has_moved(0.5));
        assert_eq!(
            drag.total_offset(Point::new(55.0, 65.0)),
            Some(Vec2::new(5.0, 5.0))
        );
    }
}
