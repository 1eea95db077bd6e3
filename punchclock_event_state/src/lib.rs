// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=punchclock_event_state --heading-base-level=0

//! Punchclock Event State: pointer gesture bookkeeping for timeline editing.
//!
//! Two small state helpers shared by every drag on the timeline:
//!
//! - [`drag`]: track a pointer drag from its start position, carrying an
//!   *anchor* value captured at press time (a pan offset, an original session
//!   range, a grab offset) so each move can be computed from the start rather
//!   than accumulated.
//! - [`edge`]: damped auto-scroll when a drag approaches either horizontal
//!   edge of the time area.
//!
//! Neither module knows about time or tracks; they work in pixels and hand
//! results back to the caller.
//!
//! ## Anchored drag
//!
//! ```rust
//! use kurbo::Point;
//! use punchclock_event_state::drag::DragState;
//!
//! // Pan gesture: remember the pan offset at press time.
//! let mut drag = DragState::default();
//! drag.start(Point::new(100.0, 10.0), 3600.0_f64);
//!
//! let total = drag.total_offset(Point::new(140.0, 12.0)).unwrap();
//! let offset_at_start = *drag.anchor().unwrap();
//! let new_offset = offset_at_start - total.x * 30.0;
//! assert_eq!(new_offset, 2400.0);
//! ```
//!
//! ## Edge auto-scroll
//!
//! ```rust
//! use punchclock_event_state::edge::EdgeScroll;
//!
//! let nudge = EdgeScroll::default().nudge(8.0, 500.0, 10.0);
//! assert_eq!(nudge.x, 18.0);
//! assert!(nudge.pan_seconds < 0.0);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

pub mod drag;
pub mod edge;
