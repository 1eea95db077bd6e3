// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=punchclock_view --heading-base-level=0

//! Punchclock View: a headless time-of-day viewport.
//!
//! A [`TimeView`] maps a window of seconds-since-midnight onto a horizontal
//! pixel span. It owns:
//! - The buffered window (`start - buffer ..= end + buffer`).
//! - A zoom factor clamped to [`ZoomLimits`].
//! - A pan offset, in seconds from the buffered start, clamped so the visible
//!   span never leaves the window.
//! - Optional [`Snap`]ping of pixel positions to an interval grid.
//!
//! It does **not** know about tracks, sessions, or drawing. Callers feed it the
//! current raster width and UI state, then ask it for conversions.
//!
//! ## Minimal example
//!
//! ```rust
//! use punchclock_view::{Snap, TimeView};
//!
//! // 08:00..18:00 with a 30 minute buffer, drawn into 1000 px.
//! let mut view = TimeView::new(8.0 * 3600.0 - 1800.0..18.0 * 3600.0 + 1800.0, 1000.0);
//! view.set_snap(Snap::Interval { origin: 8.0 * 3600.0, step: 60.0 });
//!
//! view.set_zoom(2.0);
//! view.set_pan_offset(3600.0);
//!
//! let t = view.pixel_to_time(250.0);
//! assert!((view.time_to_pixel(t) - 250.0).abs() < 1e-9);
//!
//! // Snapped lookups land on whole minutes counted from 08:00.
//! let snapped = view.pixel_to_time_snapped(251.3);
//! assert_eq!((snapped - 8.0 * 3600.0) % 60.0, 0.0);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod modes;
mod time_view;

pub use modes::{Snap, ZoomLimits};
pub use time_view::{TimeView, TimeViewDebugInfo};
