// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use smallvec::SmallVec;

use crate::PointEvent;

const DEFAULT_START: &str = "in";
const DEFAULT_END: &str = "out";

/// Start/end type pairs used when matching events.
///
/// The first pair is the *primary* pair; its names are used to build range
/// selection keys. An empty table still reports `("in", "out")` as primary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairTable {
    pairs: SmallVec<[(String, String); 2]>,
}

impl Default for PairTable {
    fn default() -> Self {
        Self::new([(DEFAULT_START, DEFAULT_END)])
    }
}

impl PairTable {
    /// Creates a table from `(start, end)` type pairs.
    pub fn new<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(s, e)| (s.into(), e.into()))
                .collect(),
        }
    }

    /// The primary `(start, end)` pair.
    #[must_use]
    pub fn primary(&self) -> (&str, &str) {
        self.pairs
            .first()
            .map(|(s, e)| (s.as_str(), e.as_str()))
            .unwrap_or((DEFAULT_START, DEFAULT_END))
    }

    /// Role of an event type in this table.
    ///
    /// A type listed both as a start and as an end is treated as a start.
    #[must_use]
    pub fn role(&self, kind: &str) -> Role<'_> {
        if self.pairs.iter().any(|(s, _)| s == kind) {
            return Role::Start;
        }
        match self.pairs.iter().find(|(_, e)| e == kind) {
            Some((s, _)) => Role::End(s.as_str()),
            None => Role::Other,
        }
    }

    /// Iterates the `(start, end)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.pairs.iter().map(|(s, e)| (s.as_str(), e.as_str()))
    }
}

/// Role of an event type within a [`PairTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role<'a> {
    /// Opens a range.
    Start,
    /// Closes a range opened by the given start type.
    End(&'a str),
    /// Neither opens nor closes anything.
    Other,
}

/// How a [`Paired`] entry came to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PairKind<'e> {
    /// A start matched with an end.
    Range,
    /// A start that was displaced or never closed.
    Orphan,
    /// An unmatched end, or a type outside the table, carrying its type.
    Tagged(&'e str),
}

/// One drawable entry produced by [`pair`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paired<'e, T> {
    /// Start time. Equal to `end` for singletons.
    pub start: T,
    /// End time.
    pub end: T,
    /// Origin of this entry.
    pub kind: PairKind<'e>,
}

impl<'e, T: Copy + Ord> Paired<'e, T> {
    fn range(start: T, end: T) -> Self {
        Self {
            start,
            end,
            kind: PairKind::Range,
        }
    }

    fn orphan(at: T) -> Self {
        Self {
            start: at,
            end: at,
            kind: PairKind::Orphan,
        }
    }

    fn tagged(at: T, kind: &'e str) -> Self {
        Self {
            start: at,
            end: at,
            kind: PairKind::Tagged(kind),
        }
    }

    /// Whether this entry is drawn as a single point.
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.kind != PairKind::Range || self.start == self.end
    }

    /// The carried event type, for tagged singletons.
    #[must_use]
    pub fn tag(&self) -> Option<&'e str> {
        match self.kind {
            PairKind::Tagged(kind) => Some(kind),
            _ => None,
        }
    }
}

/// Returns references to `events` in pairing order.
///
/// Sorting is stable: events that compare equal keep their input order.
#[must_use]
pub fn sorted<'e, E: PointEvent>(events: &'e [E], table: &PairTable) -> Vec<&'e E> {
    let rank = |e: &E| match table.role(e.kind()) {
        Role::End(_) => 0_u8,
        Role::Other => 1,
        Role::Start => 2,
    };
    let mut out: Vec<&E> = events.iter().collect();
    out.sort_by(|a, b| match a.time().cmp(&b.time()) {
        Ordering::Equal => rank(a).cmp(&rank(b)),
        ord => ord,
    });
    out
}

/// Pairs point events into ranges and singletons.
///
/// The output is in emission order, which is chronological by the event that
/// produced each entry, followed by any flushed orphans.
#[must_use]
pub fn pair<'e, E: PointEvent>(events: &'e [E], table: &PairTable) -> Vec<Paired<'e, E::Time>> {
    let mut out = Vec::with_capacity(events.len() / 2 + 1);
    // One open slot per start type, in order of first use.
    let mut open: SmallVec<[(&'e str, Option<E::Time>); 2]> = SmallVec::new();

    for ev in sorted(events, table) {
        let kind = ev.kind();
        match table.role(kind) {
            Role::Start => {
                let i = match open.iter().position(|(k, _)| *k == kind) {
                    Some(i) => i,
                    None => {
                        open.push((kind, None));
                        open.len() - 1
                    }
                };
                if let Some(prev) = open[i].1.replace(ev.time()) {
                    out.push(Paired::orphan(prev));
                }
            }
            Role::End(start) => {
                let popped = open
                    .iter_mut()
                    .find(|(k, _)| *k == start)
                    .and_then(|(_, slot)| slot.take());
                match popped {
                    Some(begin) => out.push(Paired::range(begin, ev.time())),
                    None => out.push(Paired::tagged(ev.time(), kind)),
                }
            }
            Role::Other => out.push(Paired::tagged(ev.time(), kind)),
        }
    }

    out.extend(
        open.into_iter()
            .filter_map(|(_, slot)| slot.map(Paired::orphan)),
    );
    out
}
