// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Colors and font sizes used by the render pipeline.
//!
//! A [`Theme`] is resolved once per frame and handed to every draw routine by
//! reference. In configuration files colors are written as CSS hex strings
//! (`#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`).

use punchclock_imaging::Color;
use serde::{Deserialize, Serialize};

const fn rgba(hex: u32) -> Color {
    let [r, g, b, a] = hex.to_be_bytes();
    Color::from_rgba8(r, g, b, a)
}

/// Every color the timeline draws with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Canvas background.
    #[serde(with = "hex")]
    pub background: Color,
    /// Session row tint of the selected track.
    #[serde(with = "hex")]
    pub selected_row: Color,
    /// Label column background.
    #[serde(with = "hex")]
    pub label_background: Color,
    /// Label cell under the pointer.
    #[serde(with = "hex")]
    pub label_background_hover: Color,
    /// Label cell of the selected track.
    #[serde(with = "hex")]
    pub label_background_selected: Color,
    /// Row separators, ruler ticks and the idle gutter line.
    #[serde(with = "hex")]
    pub border: Color,
    /// Track names.
    #[serde(with = "hex")]
    pub text: Color,
    /// Hovered track names, the current-time line, the marker cap and the
    /// active gutter line.
    #[serde(with = "hex")]
    pub accent: Color,
    /// Selected track name.
    #[serde(with = "hex")]
    pub text_selected: Color,
    /// Ruler labels on whole hours.
    #[serde(with = "hex")]
    pub time_labels_hours: Color,
    /// Ruler labels on half and quarter hours.
    #[serde(with = "hex")]
    pub time_labels_minutes: Color,
    /// Business hours band.
    #[serde(with = "hex")]
    pub business_hours: Color,
    /// Actual hours band.
    #[serde(with = "hex")]
    pub actual_hours: Color,
    /// Ordinal badge.
    #[serde(with = "hex")]
    pub ordinal_background: Color,
    /// Ordinal badge on a hovered row.
    #[serde(with = "hex")]
    pub ordinal_background_hover: Color,
    /// Ordinal badge on the selected row.
    #[serde(with = "hex")]
    pub ordinal_background_selected: Color,
    /// Ordinal text.
    #[serde(with = "hex")]
    pub ordinal_text: Color,
    /// Ordinal text on a hovered row.
    #[serde(with = "hex")]
    pub ordinal_text_hover: Color,
    /// Ordinal text on the selected row.
    #[serde(with = "hex")]
    pub ordinal_text_selected: Color,
    /// Overlay line at the current time.
    #[serde(with = "hex")]
    pub marker: Color,
    /// Session bars on unselected tracks.
    #[serde(with = "hex")]
    pub session_background: Color,
    /// Ranges on the selected track.
    #[serde(with = "hex")]
    pub session_range_background: Color,
    /// Tagged singletons on the selected track.
    #[serde(with = "hex")]
    pub session_single_background: Color,
    /// Hover outline on unselected tracks.
    #[serde(with = "hex")]
    pub session_hover_border: Color,
    /// Hover outline of a range.
    #[serde(with = "hex")]
    pub session_range_hover_border: Color,
    /// Hover outline of a tagged singleton.
    #[serde(with = "hex")]
    pub session_single_hover_border: Color,
    /// Selection decoration on unselected tracks.
    #[serde(with = "hex")]
    pub session_selected_background: Color,
    /// Selection decoration of a range.
    #[serde(with = "hex")]
    pub session_range_selected_background: Color,
    /// Selection decoration of a tagged singleton.
    #[serde(with = "hex")]
    pub session_single_selected_background: Color,
    /// Bar from an open start to the current time.
    #[serde(with = "hex")]
    pub session_hint_background: Color,
    /// `Press 'i'` / `Press 'o'` hints.
    #[serde(with = "hex")]
    pub session_hint_text: Color,
    /// Region marker dots.
    #[serde(with = "hex")]
    pub marker_dot: Color,
    /// Grip lines on the marker cap.
    #[serde(with = "hex")]
    pub cap_grip: Color,
    /// Marking badge.
    #[serde(with = "hex")]
    pub marking_badge: Color,
    /// Marking badge text.
    #[serde(with = "hex")]
    pub marking_text: Color,
    /// Base font size for the track layer.
    pub font_size: f32,
    /// Base font size for ruler labels.
    pub ruler_font_size: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: rgba(0x111111ff),
            selected_row: rgba(0x1a1a1a55),
            label_background: rgba(0x22222266),
            label_background_hover: rgba(0x222222aa),
            label_background_selected: rgba(0xff6e16ff),
            border: rgba(0x33333344),
            text: rgba(0xeeeeeeff),
            accent: rgba(0xff6000ff),
            text_selected: rgba(0xffffffff),
            time_labels_hours: rgba(0xddddddff),
            time_labels_minutes: rgba(0x888888ff),
            business_hours: rgba(0xff6e1666),
            actual_hours: rgba(0x66cc6699),
            ordinal_background: rgba(0x1a1a1aff),
            ordinal_background_hover: rgba(0x161616ff),
            ordinal_background_selected: rgba(0xff6000ff),
            ordinal_text: rgba(0xccccccff),
            ordinal_text_hover: rgba(0xffffffff),
            ordinal_text_selected: rgba(0xffffffff),
            marker: rgba(0xff6000aa),
            session_background: rgba(0x333333ff),
            session_range_background: rgba(0xff7f4dff),
            session_single_background: rgba(0xd16affff),
            session_hover_border: rgba(0x111111ff),
            session_range_hover_border: rgba(0xd2541eff),
            session_single_hover_border: rgba(0xa136d1ff),
            session_selected_background: rgba(0x333333ff),
            session_range_selected_background: rgba(0xd2541eff),
            session_single_selected_background: rgba(0xa136d1ff),
            session_hint_background: rgba(0x222222ff),
            session_hint_text: rgba(0x999999ff),
            marker_dot: rgba(0xff2a2aff),
            cap_grip: rgba(0xffffff66),
            marking_badge: rgba(0xff2a2aff),
            marking_text: rgba(0xffffffff),
            font_size: 14.0,
            ruler_font_size: 12.0,
        }
    }
}

mod hex {
    use peniko::color::{Srgb, parse_color};
    use punchclock_imaging::Color;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub(super) fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        let c = color.to_rgba8();
        let text = if c.a == 0xff {
            format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
        };
        serializer.serialize_str(&text)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_color(&text)
            .map(|c| c.to_alpha_color::<Srgb>())
            .map_err(|e| de::Error::custom(format_args!("invalid color '{text}': {e}")))
    }
}
