// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use crate::pair::{PairTable, Paired};

/// `type@timestamp` identity of a single session event.
///
/// Range selection is stored as a list of these keys: a closed range is
/// selected when both `start_type@start` and `end_type@end` are present.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionKey<T> {
    /// Event type.
    pub kind: String,
    /// Event timestamp.
    pub time: T,
}

impl<T> SessionKey<T> {
    /// Creates a key.
    pub fn new(kind: impl Into<String>, time: T) -> Self {
        Self {
            kind: kind.into(),
            time,
        }
    }

    fn is(&self, kind: &str, time: &T) -> bool
    where
        T: PartialEq,
    {
        self.kind == kind && self.time == *time
    }
}

impl<T: fmt::Display> fmt::Display for SessionKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind, self.time)
    }
}

impl<T: FromStr> FromStr for SessionKey<T> {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, time) = s.split_once('@').ok_or(KeyParseError::MissingSeparator)?;
        if kind.is_empty() {
            return Err(KeyParseError::EmptyKind);
        }
        let time = time.parse().map_err(|_| KeyParseError::InvalidTime)?;
        Ok(Self::new(kind, time))
    }
}

/// Reasons a `type@timestamp` string fails to parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyParseError {
    /// No `@` in the key.
    MissingSeparator,
    /// Nothing before the `@`.
    EmptyKind,
    /// The part after the `@` is not a valid timestamp.
    InvalidTime,
}

impl fmt::Display for KeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingSeparator => "session key is missing '@'",
            Self::EmptyKind => "session key has an empty type",
            Self::InvalidTime => "session key has an invalid timestamp",
        })
    }
}

impl core::error::Error for KeyParseError {}

impl<T: Copy + Ord> Paired<'_, T> {
    /// Selection keys for this entry: `start_type@start` and `end_type@end`.
    ///
    /// Singletons produce both keys at their start time.
    #[must_use]
    pub fn keys(&self, table: &PairTable) -> [SessionKey<T>; 2] {
        let (start, end) = table.primary();
        let end_time = if self.is_singleton() {
            self.start
        } else {
            self.end
        };
        [
            SessionKey::new(start, self.start),
            SessionKey::new(end, end_time),
        ]
    }
}

/// Whether `pair` is fully selected by `keys`.
///
/// A range needs both of its keys; a singleton needs either key at its start.
#[must_use]
pub fn is_selected<T: Copy + Ord>(pair: &Paired<'_, T>, keys: &[SessionKey<T>], table: &PairTable) -> bool {
    let (start, end) = table.primary();
    let has = |kind: &str, t: &T| keys.iter().any(|k| k.is(kind, t));
    if pair.is_singleton() {
        has(start, &pair.start) || has(end, &pair.start)
    } else {
        has(start, &pair.start) && has(end, &pair.end)
    }
}

/// Whether `pair` shares at least one key with `keys`.
#[must_use]
pub fn is_selected_lenient<T: Copy + Ord>(
    pair: &Paired<'_, T>,
    keys: &[SessionKey<T>],
    table: &PairTable,
) -> bool {
    let (start, end) = table.primary();
    let has = |kind: &str, t: &T| keys.iter().any(|k| k.is(kind, t));
    has(start, &pair.start)
        || has(end, &pair.end)
        || (pair.is_singleton() && has(end, &pair.start))
}

/// First closed range fully selected by `keys`.
#[must_use]
pub fn find_selected_range<'p, 'e, T: Copy + Ord>(
    pairs: &'p [Paired<'e, T>],
    keys: &[SessionKey<T>],
    table: &PairTable,
) -> Option<&'p Paired<'e, T>> {
    pairs
        .iter()
        .find(|p| !p.is_singleton() && is_selected(p, keys, table))
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn parse_and_display() {
        let key: SessionKey<u32> = "in@42".parse().unwrap();
        assert_eq!(key, SessionKey::new("in", 42));
        assert_eq!(key.to_string(), "in@42");

        assert_eq!("in42".parse::<SessionKey<u32>>(), Err(KeyParseError::MissingSeparator));
        assert_eq!("@42".parse::<SessionKey<u32>>(), Err(KeyParseError::EmptyKind));
        assert_eq!("in@x".parse::<SessionKey<u32>>(), Err(KeyParseError::InvalidTime));
    }
}
