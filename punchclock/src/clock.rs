// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wall-clock times of day.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClockParseError;

const SECONDS_PER_DAY: i32 = 86_400;

/// A time of day in whole seconds since midnight.
///
/// On the wire this is an `HH:mm:ss` string. `HH:mm` is accepted when parsing,
/// and `24:00:00` parses as the end of the day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(i32);

impl ClockTime {
    /// `00:00:00`.
    pub const MIDNIGHT: Self = Self(0);
    /// `24:00:00`.
    pub const END_OF_DAY: Self = Self(SECONDS_PER_DAY);

    /// Creates a time from seconds since midnight.
    #[must_use]
    pub const fn from_seconds(seconds: i32) -> Self {
        Self(seconds)
    }

    /// Creates a time from hours, minutes and seconds.
    #[must_use]
    pub const fn from_hms(hours: i32, minutes: i32, seconds: i32) -> Self {
        Self(hours * 3600 + minutes * 60 + seconds)
    }

    /// Rounds fractional seconds to the nearest whole second.
    #[must_use]
    pub fn from_secs_f64(seconds: f64) -> Self {
        if !seconds.is_finite() {
            return Self::MIDNIGHT;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "clamped into the i32 range first"
        )]
        let s = seconds
            .round()
            .clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32;
        Self(s)
    }

    /// Seconds since midnight.
    #[must_use]
    pub const fn seconds(self) -> i32 {
        self.0
    }

    /// Seconds since midnight as `f64`, for viewport math.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }

    /// Returns this time shifted by `seconds`, saturating.
    #[must_use]
    pub const fn add_seconds(self, seconds: i32) -> Self {
        Self(self.0.saturating_add(seconds))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == SECONDS_PER_DAY {
            return f.write_str("24:00:00");
        }
        let s = self.0.rem_euclid(SECONDS_PER_DAY);
        write!(f, "{:02}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60)
    }
}

impl FromStr for ClockTime {
    type Err = ClockParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ClockParseError::Malformed(s.to_owned());
        let mut parts = s.trim().split(':');
        let mut field = |max: i32| -> Result<Option<i32>, ClockParseError> {
            let Some(part) = parts.next() else {
                return Ok(None);
            };
            if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            let value: i32 = part.parse().map_err(|_| malformed())?;
            if value > max {
                return Err(ClockParseError::OutOfRange(s.to_owned()));
            }
            Ok(Some(value))
        };
        let hours = field(24)?.ok_or_else(malformed)?;
        let minutes = field(59)?.ok_or_else(malformed)?;
        let seconds = field(59)?.unwrap_or(0);
        if parts.next().is_some() {
            return Err(malformed());
        }
        let time = Self::from_hms(hours, minutes, seconds);
        if time.0 > SECONDS_PER_DAY {
            return Err(ClockParseError::OutOfRange(s.to_owned()));
        }
        Ok(time)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ClockParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}
