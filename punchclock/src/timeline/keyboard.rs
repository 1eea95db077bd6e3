// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::Timeline;
use crate::interaction::{Key, Side};
use crate::service::TimelineService;
use crate::storage::KeyValueStore;

impl<S: TimelineService, K: KeyValueStore> Timeline<S, K> {
    /// Handles a key press.
    ///
    /// Returns `true` if the key was consumed. Nothing is consumed while the
    /// host has [`set_owns_input`](Self::set_owns_input) turned off.
    pub fn key(&mut self, key: Key) -> bool {
        if !self.owns_input {
            return false;
        }
        match key {
            Key::ArrowLeft => self.step_back(),
            Key::ArrowRight => self.step_forward(),
            Key::Home => self.jump_first(),
            Key::End => self.jump_last(),
            Key::Char('+') => self.add_track(),
            Key::Char('i') => self.add_session(Side::Start),
            Key::Char('o') => self.add_session(Side::End),
            Key::Delete => self.delete_selection(),
            Key::Escape if self.interaction.gesture.is_marking() => self.stop_marking(),
            Key::Char('m' | 'M') => {
                self.start_marking();
            }
            Key::Escape | Key::Char(_) => return false,
        }
        true
    }
}
