// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=punchclock_imaging_ref --heading-base-level=0

//! Punchclock Imaging Reference Surface.
//!
//! This crate provides [`RecordingSurface`], a stateful implementation of
//! [`Surface`] for **op recording and state tracing**.
//!
//! It is intentionally *not* a renderer:
//! - It does **not** rasterize to pixels.
//! - It records every op together with the effective clip and opacity at the
//!   time it was applied, so tests can assert on what would be visible.
//! - Each [`Surface::begin`] discards the previous frame, mirroring a canvas
//!   that is cleared before every redraw.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use punchclock_imaging::{DrawOp, RectF, StateOp, Surface};

/// Effective layer state at the time an op was applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerState {
    /// Number of active layers.
    pub depth: u32,
    /// Intersection of all active clips, if any.
    pub clip: Option<RectF>,
    /// Product of all active opacities.
    pub opacity: f32,
}

impl Default for LayerState {
    fn default() -> Self {
        Self {
            depth: 0,
            clip: None,
            opacity: 1.0,
        }
    }
}

/// Event recorded by the surface.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// State operation and the resulting layer state.
    State {
        /// State operation that was applied.
        op: StateOp,
        /// Layer state after applying it.
        state: LayerState,
    },
    /// Draw operation and the layer state used for drawing.
    Draw {
        /// Draw operation that was applied.
        op: DrawOp,
        /// Layer state at the time of drawing.
        state: LayerState,
    },
}

/// Surface that records what it is asked to draw.
#[derive(Default, Debug)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    frames: u32,
    events: Vec<Event>,
    stack: Vec<LayerState>,
    state: LayerState,
}

impl RecordingSurface {
    /// Creates an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events of the current frame, in order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Draw operations of the current frame with their layer state.
    pub fn draws(&self) -> impl Iterator<Item = (&DrawOp, &LayerState)> + '_ {
        self.events.iter().filter_map(|e| match e {
            Event::Draw { op, state } => Some((op, state)),
            Event::State { .. } => None,
        })
    }

    /// Number of frames begun so far.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Size of the current frame.
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Layer state after the last op.
    pub fn current_state(&self) -> LayerState {
        self.state
    }
}

impl Surface for RecordingSurface {
    fn begin(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.frames += 1;
        self.events.clear();
        self.stack.clear();
        self.state = LayerState::default();
    }

    fn state(&mut self, op: &StateOp) {
        match op {
            StateOp::PushLayer(layer) => {
                self.stack.push(self.state);
                let clip = match (self.state.clip, layer.clip) {
                    (Some(a), Some(b)) => Some(intersect(a, b)),
                    (a, b) => a.or(b),
                };
                self.state = LayerState {
                    depth: self.state.depth + 1,
                    clip,
                    opacity: self.state.opacity * layer.opacity.unwrap_or(1.0),
                };
            }
            StateOp::PopLayer => {
                // Unbalanced pops are tolerated; the surface stays at the root.
                self.state = self.stack.pop().unwrap_or_default();
            }
        }
        self.events.push(Event::State {
            op: op.clone(),
            state: self.state,
        });
    }

    fn draw(&mut self, op: &DrawOp) {
        self.events.push(Event::Draw {
            op: op.clone(),
            state: self.state,
        });
    }
}

fn intersect(a: RectF, b: RectF) -> RectF {
    let x0 = a.x0.max(b.x0);
    let y0 = a.y0.max(b.y0);
    RectF::new(x0, y0, a.x1.min(b.x1).max(x0), a.y1.min(b.y1).max(y0))
}
