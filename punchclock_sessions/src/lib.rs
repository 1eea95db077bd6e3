// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=punchclock_sessions --heading-base-level=0

//! Punchclock Sessions: turning point events into drawable ranges.
//!
//! A track stores a flat list of typed point events such as `in@08:00:00` and
//! `out@12:00:00`. This crate does the bookkeeping needed to draw and edit
//! them:
//! - [`pair`] sorts the events and matches start types to end types using a
//!   [`PairTable`], producing [`Paired`] ranges and singletons.
//! - [`SessionKey`] is the `type@timestamp` identity used by range selection.
//! - The [`query`] module answers point-in-time questions (is the playhead
//!   inside a closed range, is there an open start before it, ...).
//!
//! It does **not** know about pixels or the wire format. Callers implement
//! [`PointEvent`] for their own session type.
//!
//! ## Minimal example
//!
//! ```rust
//! use punchclock_sessions::{PairKind, PairTable, PointEvent, pair};
//!
//! struct Ev(&'static str, u32);
//!
//! impl PointEvent for Ev {
//!     type Time = u32;
//!     fn kind(&self) -> &str {
//!         self.0
//!     }
//!     fn time(&self) -> u32 {
//!         self.1
//!     }
//! }
//!
//! let events = [Ev("out", 20), Ev("in", 10), Ev("in", 30)];
//! let pairs = pair(&events, &PairTable::default());
//!
//! assert_eq!(pairs.len(), 2);
//! assert_eq!((pairs[0].start, pairs[0].end), (10, 20));
//! assert_eq!(pairs[0].kind, PairKind::Range);
//! // The trailing `in` never closed, so it is flushed as an orphan.
//! assert_eq!(pairs[1].kind, PairKind::Orphan);
//! ```
//!
//! ## Pairing rules
//!
//! Events are sorted by time. At equal times, end types sort before other
//! types, which sort before start types, so a shift change `out@t` + `in@t`
//! closes the old range before opening the new one.
//!
//! Walking the sorted events:
//! - A start pushes onto the stack for its type. If that stack already held an
//!   open start, the older one is emitted as an untagged orphan.
//! - An end pops the matching start and emits a range. With nothing to pop it
//!   is emitted as a singleton tagged with its own type.
//! - Any other type is emitted as a tagged singleton.
//!
//! Whatever is still open at the end is flushed as untagged orphans. Note the
//! asymmetry: an unmatched end keeps its type, an unmatched start does not.
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

mod keys;
mod pair;
pub mod query;

pub use keys::{KeyParseError, SessionKey, find_selected_range, is_selected, is_selected_lenient};
pub use pair::{PairKind, PairTable, Paired, Role, pair, sorted};

/// A typed point event on a track.
pub trait PointEvent {
    /// Ordered timestamp type.
    type Time: Copy + Ord;

    /// Event type, such as `"in"` or `"out"`.
    fn kind(&self) -> &str;

    /// Event timestamp.
    fn time(&self) -> Self::Time;
}
