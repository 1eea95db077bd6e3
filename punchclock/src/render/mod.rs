// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame construction.
//!
//! A [`Frame`] holds one [`DisplayList`] per layer. Lists are rebuilt from
//! scratch for every frame and never mutated afterwards, so presenting the
//! same frame twice produces the same output.
//!
//! All coordinates are CSS pixels relative to the layer's own origin:
//! - `main` spans the label column and the session rows.
//! - `ruler` spans the time area only.
//! - `overlay` sits on top of the time area of the main layer.

mod overlay;
mod ruler;
mod tracks;

use punchclock_imaging::{DisplayList, PointF, RectF, Surface, TextMetrics, present};
use punchclock_sessions::PairTable;
use punchclock_view::TimeView;

use crate::config::{CategoryText, EngineConfig};
use crate::interaction::InteractionState;
use crate::layout::Layout;
use crate::model::{Selection, Times, Track};

/// The display lists of one rendered frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Labels and session rows.
    pub main: DisplayList,
    /// Ticks, labels, bands and the marker cap.
    pub ruler: DisplayList,
    /// The playhead line and the marking badge.
    pub overlay: DisplayList,
}

impl Frame {
    /// Replays each layer onto its surface.
    pub fn present(&self, main: &mut dyn Surface, ruler: &mut dyn Surface, overlay: &mut dyn Surface) {
        present(&self.main, main);
        present(&self.ruler, ruler);
        present(&self.overlay, overlay);
    }
}

/// Everything a frame is built from, borrowed from the engine.
pub(crate) struct Scene<'a> {
    pub(crate) config: &'a EngineConfig,
    pub(crate) pairs: &'a PairTable,
    pub(crate) layout: &'a Layout,
    pub(crate) view: &'a TimeView,
    pub(crate) times: &'a Times,
    pub(crate) tracks: Vec<&'a Track>,
    pub(crate) selection: &'a Selection,
    pub(crate) hints: CategoryText,
    pub(crate) interaction: &'a InteractionState,
    pub(crate) metrics: &'a dyn TextMetrics,
}

impl Scene<'_> {
    pub(crate) fn build(self) -> Frame {
        Frame {
            main: tracks::draw(&self),
            ruler: ruler::draw(&self),
            overlay: overlay::draw(&self),
        }
    }

    /// Time-area `x` of time `t`, unclamped.
    fn x_of(&self, t: f64) -> f64 {
        (t - self.view.visible_start()) / self.view.sec_per_px()
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "layer coordinates are far inside f32 range"
)]
fn px(v: f64) -> f32 {
    v as f32
}

fn rect(x: f64, y: f64, width: f64, height: f64) -> RectF {
    RectF::from_origin_size(px(x), px(y), px(width), px(height))
}

fn pt(x: f64, y: f64) -> PointF {
    PointF::new(px(x), px(y))
}
