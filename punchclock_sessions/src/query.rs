// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point-in-time questions about a track's sessions.
//!
//! These back the toolbar's cut/patch availability and the "still open" hint
//! bar drawn from an unclosed start up to the playhead.

use crate::PointEvent;
use crate::pair::{PairTable, Paired, sorted};

/// First closed range with `start < t < end`.
#[must_use]
pub fn covering_range<'p, 'e, T: Copy + Ord>(
    pairs: &'p [Paired<'e, T>],
    t: T,
) -> Option<&'p Paired<'e, T>> {
    pairs
        .iter()
        .find(|p| !p.is_singleton() && p.start < t && t < p.end)
}

/// Whether `t` lies inside a closed range, with an inclusive end.
#[must_use]
pub fn is_in_range_end_inclusive<T: Copy + Ord>(pairs: &[Paired<'_, T>], t: T) -> bool {
    pairs
        .iter()
        .any(|p| !p.is_singleton() && p.start < t && t <= p.end)
}

/// Time of the primary start left open before `t`, if any.
///
/// Walks events strictly before `t` in pairing order; a primary start opens,
/// a primary end closes. Other types are ignored.
#[must_use]
pub fn open_start_before<E: PointEvent>(events: &[E], t: E::Time, table: &PairTable) -> Option<E::Time> {
    let (start, end) = table.primary();
    let mut last = None;
    for ev in sorted(events, table) {
        if ev.time() >= t {
            continue;
        }
        if ev.kind() == start {
            last = Some(ev.time());
        } else if ev.kind() == end {
            last = None;
        }
    }
    last
}

/// Whether every event happened strictly before `t`.
///
/// Returns `false` for an empty track.
#[must_use]
pub fn all_before<E: PointEvent>(events: &[E], t: E::Time) -> bool {
    events.iter().map(PointEvent::time).max().is_some_and(|m| m < t)
}

/// Whether both a primary start and a primary end sit exactly at `t`.
#[must_use]
pub fn has_start_and_end_at<E: PointEvent>(events: &[E], t: E::Time, table: &PairTable) -> bool {
    let (start, end) = table.primary();
    let at = |kind: &str| events.iter().any(|e| e.time() == t && e.kind() == kind);
    at(start) && at(end)
}
