// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=punchclock_axis --heading-base-level=0

//! Punchclock Axis: ruler ticks for a time-of-day axis.
//!
//! The ruler works from a fixed ladder of candidate steps,
//! [`STEP_LADDER`] (4h, 2h, 1h, 30m, 15m). For a given seconds-per-pixel ratio a
//! [`TickPolicy`] picks:
//! - the finest step whose on-screen spacing is still readable as a tick,
//! - which label levels have enough room to be drawn.
//!
//! Label placement is greedy left to right; [`LabelThinner`] drops labels that
//! would touch the previous one or run off either edge.
//!
//! ```rust
//! use punchclock_axis::{LabelLevel, LabelThinner, TickPolicy};
//!
//! // 40 seconds per pixel: an hour is 90 px, half an hour is only 45 px.
//! let ladder = TickPolicy::default().ladder(40.0);
//! assert_eq!(ladder.tick_step(), 1800);
//! assert!(ladder.is_allowed(LabelLevel::Hour));
//! assert!(!ladder.is_allowed(LabelLevel::HalfHour));
//!
//! let mut thinner = LabelThinner::new(1000.0);
//! let mut labels = 0;
//! for tick in ladder.ticks(8.0 * 3600.0, 8.0 * 3600.0 + 40_000.0) {
//!     if let Some(level) = tick.label {
//!         if thinner.admit(tick.x - 20.0, tick.x + 20.0) {
//!             labels += 1;
//!             assert!(level.is_hour());
//!         }
//!     }
//! }
//! assert!(labels > 0);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

use core::fmt;

/// Candidate tick and label steps in seconds, coarsest first.
pub const STEP_LADDER: [u32; 5] = [14_400, 7_200, 3_600, 1_800, 900];

const SECONDS_PER_DAY: i64 = 86_400;

/// Granularity at which a tick label is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LabelLevel {
    /// Every four hours.
    FourHours,
    /// Every two hours.
    TwoHours,
    /// Every hour.
    Hour,
    /// Every half hour.
    HalfHour,
    /// Every quarter hour.
    QuarterHour,
}

impl LabelLevel {
    /// All levels, coarsest first.
    pub const ALL: [Self; 5] = [
        Self::FourHours,
        Self::TwoHours,
        Self::Hour,
        Self::HalfHour,
        Self::QuarterHour,
    ];

    /// Step of this level in seconds.
    #[must_use]
    pub const fn step(self) -> u32 {
        STEP_LADDER[self.index()]
    }

    /// Relative font size for labels of this level.
    #[must_use]
    pub const fn font_scale(self) -> f32 {
        match self {
            Self::FourHours | Self::TwoHours | Self::Hour => 1.0,
            Self::HalfHour => 0.95,
            Self::QuarterHour => 0.9,
        }
    }

    /// Opacity for labels of this level.
    #[must_use]
    pub const fn alpha(self) -> f32 {
        match self {
            Self::FourHours => 1.0,
            Self::TwoHours => 0.975,
            Self::Hour => 0.95,
            Self::HalfHour => 0.925,
            Self::QuarterHour => 0.9,
        }
    }

    /// Whether labels at this level fall on whole hours.
    #[must_use]
    pub const fn is_hour(self) -> bool {
        matches!(self, Self::FourHours | Self::TwoHours | Self::Hour)
    }

    const fn index(self) -> usize {
        match self {
            Self::FourHours => 0,
            Self::TwoHours => 1,
            Self::Hour => 2,
            Self::HalfHour => 3,
            Self::QuarterHour => 4,
        }
    }
}

/// Pixel thresholds that decide tick density and label visibility.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickPolicy {
    /// Minimum spacing for hour-based labels and for the major tick step.
    pub min_label_px: f64,
    /// Minimum spacing between drawn ticks.
    pub min_tick_px: f64,
    /// Minimum spacing for half-hour labels.
    pub min_half_hour_label_px: f64,
    /// Minimum spacing for quarter-hour labels.
    pub min_quarter_hour_label_px: f64,
    /// Ticks are never finer than this many seconds.
    pub min_tick_step: u32,
    /// Height of ticks on the major step.
    pub major_tick_height: f64,
    /// Height of all other ticks.
    pub minor_tick_height: f64,
}

impl Default for TickPolicy {
    fn default() -> Self {
        Self {
            min_label_px: 70.0,
            min_tick_px: 25.0,
            min_half_hour_label_px: 54.0,
            min_quarter_hour_label_px: 44.0,
            min_tick_step: 900,
            major_tick_height: 12.0,
            minor_tick_height: 7.0,
        }
    }
}

impl TickPolicy {
    /// Resolves the tick ladder for a seconds-per-pixel ratio.
    #[must_use]
    pub fn ladder(&self, sec_per_px: f64) -> TickLadder {
        let px = |step: u32| f64::from(step) / sec_per_px;

        let major_step = STEP_LADDER
            .iter()
            .copied()
            .find(|&s| px(s) >= self.min_label_px)
            .unwrap_or(STEP_LADDER[0]);
        let tick_step = STEP_LADDER
            .iter()
            .rev()
            .copied()
            .find(|&s| px(s) >= self.min_tick_px)
            .unwrap_or(STEP_LADDER[STEP_LADDER.len() - 1])
            .max(self.min_tick_step)
            .max(1);

        let thresholds = [
            self.min_label_px,
            self.min_label_px,
            self.min_label_px,
            self.min_half_hour_label_px,
            self.min_quarter_hour_label_px,
        ];
        let mut allowed = [false; 5];
        for (slot, (step, min)) in allowed
            .iter_mut()
            .zip(STEP_LADDER.iter().zip(thresholds.iter()))
        {
            *slot = px(*step) >= *min;
        }

        TickLadder {
            major_step,
            tick_step,
            allowed,
            sec_per_px,
            major_tick_height: self.major_tick_height,
            minor_tick_height: self.minor_tick_height,
        }
    }
}

/// Tick configuration resolved for one zoom level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickLadder {
    major_step: u32,
    tick_step: u32,
    allowed: [bool; 5],
    sec_per_px: f64,
    major_tick_height: f64,
    minor_tick_height: f64,
}

impl TickLadder {
    /// Step, in seconds, of the taller major ticks.
    #[must_use]
    pub fn major_step(&self) -> u32 {
        self.major_step
    }

    /// Step, in seconds, between consecutive ticks.
    #[must_use]
    pub fn tick_step(&self) -> u32 {
        self.tick_step
    }

    /// Returns `true` if labels at `level` have enough room to be drawn.
    #[must_use]
    pub fn is_allowed(&self, level: LabelLevel) -> bool {
        self.allowed[level.index()]
    }

    /// Coarsest allowed label level that `t` falls on, if any.
    ///
    /// `t` is in seconds since midnight; values outside the day wrap.
    #[must_use]
    pub fn label_level(&self, t: i64) -> Option<LabelLevel> {
        let sec_of_day = t.rem_euclid(SECONDS_PER_DAY);
        LabelLevel::ALL
            .into_iter()
            .find(|&l| self.is_allowed(l) && sec_of_day % i64::from(l.step()) == 0)
    }

    /// Iterates the ticks covering `visible_start..visible_end`.
    ///
    /// The first tick is the first step boundary strictly after the floor of
    /// `visible_start`, and iteration runs one step past `visible_end` so a
    /// label straddling the right edge is still considered.
    #[must_use]
    pub fn ticks(&self, visible_start: f64, visible_end: f64) -> Ticks {
        let step = i64::from(self.tick_step);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "seconds of a day fit comfortably in i64"
        )]
        let base = libm::floor(visible_start / step as f64) as i64;
        Ticks {
            ladder: *self,
            next: base * step + step,
            visible_start,
            stop: visible_end + step as f64,
        }
    }
}

/// A single ruler tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    /// Time in seconds since midnight.
    pub time: i64,
    /// Horizontal position in pixels from the visible start.
    pub x: f64,
    /// Whether this tick falls on the major step.
    pub major: bool,
    /// Tick height in pixels.
    pub height: f64,
    /// Label level, if the tick is a label candidate.
    pub label: Option<LabelLevel>,
}

impl Tick {
    /// Wall-clock `HH:mm` text for this tick.
    #[must_use]
    pub fn hh_mm(&self) -> HhMm {
        HhMm::from_seconds(self.time)
    }
}

/// Iterator returned by [`TickLadder::ticks`].
#[derive(Clone, Debug)]
pub struct Ticks {
    ladder: TickLadder,
    next: i64,
    visible_start: f64,
    stop: f64,
}

impl Iterator for Ticks {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        let t = self.next as f64;
        if t >= self.stop {
            return None;
        }
        let time = self.next;
        self.next += i64::from(self.ladder.tick_step);
        let major = time.rem_euclid(i64::from(self.ladder.major_step)) == 0;
        Some(Tick {
            time,
            x: (t - self.visible_start) / self.ladder.sec_per_px,
            major,
            height: if major {
                self.ladder.major_tick_height
            } else {
                self.ladder.minor_tick_height
            },
            label: self.ladder.label_level(time),
        })
    }
}

/// Greedy left-to-right label admission.
#[derive(Clone, Copy, Debug)]
pub struct LabelThinner {
    width: f64,
    min_gap: f64,
    last_right: f64,
}

impl LabelThinner {
    /// Creates a thinner for a ruler `width` pixels wide with a 6px gap.
    #[must_use]
    pub fn new(width: f64) -> Self {
        Self::with_gap(width, 6.0)
    }

    /// Creates a thinner with a custom minimum gap between labels.
    #[must_use]
    pub fn with_gap(width: f64, min_gap: f64) -> Self {
        Self {
            width,
            min_gap,
            last_right: f64::NEG_INFINITY,
        }
    }

    /// Decides whether a label spanning `left..right` is drawn.
    ///
    /// Labels touching either edge are rejected, as are labels closer than the
    /// gap to the last admitted label.
    pub fn admit(&mut self, left: f64, right: f64) -> bool {
        if left <= 0.0 || right >= self.width {
            return false;
        }
        if left <= self.last_right + self.min_gap {
            return false;
        }
        self.last_right = right;
        true
    }
}

/// `HH:mm` clock text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HhMm {
    /// Hours, `0..24`.
    pub hours: u8,
    /// Minutes, `0..60`.
    pub minutes: u8,
}

impl HhMm {
    /// Wall-clock text for seconds since midnight, wrapping outside the day.
    #[must_use]
    pub fn from_seconds(t: i64) -> Self {
        let s = t.rem_euclid(SECONDS_PER_DAY);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "both values are bounded by the modulo above"
        )]
        Self {
            hours: (s / 3600) as u8,
            minutes: ((s % 3600) / 60) as u8,
        }
    }
}

impl fmt::Display for HhMm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;

    use alloc::string::ToString;
    use alloc::vec::Vec;

    use super::{HhMm, LabelLevel, LabelThinner, STEP_LADDER, TickPolicy};

    #[test]
    fn coarse_zoom_keeps_tick_floor() {
        // 100 s/px: even 4h is only 144 px apart, 15 minutes is 9 px.
        let ladder = TickPolicy::default().ladder(100.0);
        assert_eq!(ladder.major_step(), 14_400);
        assert_eq!(ladder.tick_step(), 3600);
        assert!(ladder.is_allowed(LabelLevel::FourHours));
        assert!(!ladder.is_allowed(LabelLevel::Hour));
    }

    #[test]
    fn fine_zoom_uses_quarter_hours() {
        let ladder = TickPolicy::default().ladder(5.0);
        assert_eq!(ladder.tick_step(), 900);
        for level in LabelLevel::ALL {
            assert!(ladder.is_allowed(level), "{level:?} should be allowed");
        }
        assert_eq!(ladder.label_level(9 * 3600 + 900), Some(LabelLevel::QuarterHour));
        assert_eq!(ladder.label_level(8 * 3600), Some(LabelLevel::FourHours));
        assert_eq!(ladder.label_level(9 * 3600), Some(LabelLevel::Hour));
    }

    #[test]
    fn no_hourly_labels_when_hours_are_cramped() {
        // 3600/60 = 60 px < 70, but 7200/60 = 120 px.
        let ladder = TickPolicy::default().ladder(60.0);
        assert!(!ladder.is_allowed(LabelLevel::Hour));
        assert!(ladder.is_allowed(LabelLevel::TwoHours));

        let ticks: Vec<_> = ladder.ticks(0.0, 86_400.0).collect();
        assert!(ticks.iter().all(|t| t.time % 900 == 0));
        assert_eq!(ladder.tick_step(), 1800);
        let odd_hours = ticks
            .iter()
            .filter(|t| t.label.is_some() && (t.time / 3600) % 2 == 1);
        assert_eq!(odd_hours.count(), 0);
        assert!(ticks.iter().any(|t| t.label.is_none()));
    }

    #[test]
    fn tick_floor_is_respected_when_zoomed_in() {
        let ladder = TickPolicy::default().ladder(0.5);
        assert_eq!(ladder.tick_step(), STEP_LADDER[4]);
    }

    #[test]
    fn ticks_start_after_floor_and_run_past_end() {
        let ladder = TickPolicy::default().ladder(20.0);
        assert_eq!(ladder.tick_step(), 900);
        let ticks: Vec<_> = ladder.ticks(900.0, 3600.0).collect();
        let times: Vec<i64> = ticks.iter().map(|t| t.time).collect();
        assert_eq!(times, [1800, 2700, 3600]);
        assert_eq!(ticks[0].x, 45.0);
        assert!(ticks.iter().all(|t| t.height == 7.0 || t.height == 12.0));
    }

    #[test]
    fn thinner_skips_edges_and_overlaps() {
        let mut thinner = LabelThinner::new(200.0);
        assert!(!thinner.admit(0.0, 20.0));
        assert!(thinner.admit(10.0, 40.0));
        assert!(!thinner.admit(44.0, 70.0));
        assert!(thinner.admit(46.5, 70.0));
        assert!(!thinner.admit(150.0, 200.0));
    }

    #[test]
    fn clock_text_wraps() {
        assert_eq!(HhMm::from_seconds(9 * 3600 + 5 * 60 + 59).to_string(), "09:05");
        assert_eq!(HhMm::from_seconds(-900).to_string(), "23:45");
        assert_eq!(HhMm::from_seconds(86_400).to_string(), "00:00");
    }
}
