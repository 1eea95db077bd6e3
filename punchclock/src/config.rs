// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```
//! use punchclock::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str(
//!     r##"
//!     default_category = "activities"
//!
//!     [layout]
//!     row_height = 28.0
//!
//!     [theme]
//!     accent = "#00aaff"
//!     "##,
//! )
//! .unwrap();
//! assert_eq!(config.layout.row_height, 28.0);
//! assert_eq!(config.layout.bar_height, 14.0);
//! ```

use punchclock_axis::TickPolicy;
use punchclock_event_state::edge::EdgeScroll;
use punchclock_sessions::PairTable;
use punchclock_view::ZoomLimits;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::DEFAULT_CATEGORY;
use crate::theme::Theme;

/// All tunables of a [`Timeline`](crate::Timeline).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// `[start, end]` session type pairs; the first is the primary pair.
    pub pairs: Vec<[String; 2]>,
    /// Zoom limits and wheel steps.
    pub zoom: ZoomConfig,
    /// Geometry of the track layer and hit regions.
    pub layout: LayoutConfig,
    /// Ruler density thresholds.
    pub ruler: RulerConfig,
    /// Drag behavior.
    pub drag: DragConfig,
    /// Region marker settings.
    pub markers: MarkerConfig,
    /// Duration of the locate animation in milliseconds.
    pub locate_ms: f64,
    /// Category shown before the service picks one.
    pub default_category: String,
    /// Per-category hint texts and new-track names.
    pub categories: Vec<CategoryText>,
    /// Colors and fonts.
    pub theme: Theme,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pairs: vec![["in".to_owned(), "out".to_owned()]],
            zoom: ZoomConfig::default(),
            layout: LayoutConfig::default(),
            ruler: RulerConfig::default(),
            drag: DragConfig::default(),
            markers: MarkerConfig::default(),
            locate_ms: 700.0,
            default_category: DEFAULT_CATEGORY.to_owned(),
            categories: vec![
                CategoryText::new(
                    "employees",
                    "punch this employee in",
                    "punch this employee out",
                    "Unidentified employee",
                ),
                CategoryText::new(
                    "compliances",
                    "add when violation started",
                    "add when violation ended",
                    "Unnamed compliance",
                ),
                CategoryText::new(
                    "activities",
                    "add when activity started",
                    "add when activity ended",
                    "Unclassified activity",
                ),
            ],
            theme: Theme::default(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::ParseToml { source })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that parse but cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: &str| ConfigError::Invalid {
            field,
            reason: reason.to_owned(),
        };
        // NaN fails both.
        let positive = |v: f64| v > 0.0;
        let non_negative = |v: f64| v >= 0.0;
        if self.pairs.iter().flatten().any(|t| t.is_empty()) {
            return Err(invalid("pairs", "session types must not be empty"));
        }
        if !positive(self.zoom.min) || self.zoom.min > self.zoom.max {
            return Err(invalid("zoom", "expected 0 < min <= max"));
        }
        if !positive(self.zoom.wheel_in) || !positive(self.zoom.wheel_out) {
            return Err(invalid("zoom.wheel_in", "wheel steps must be positive"));
        }
        let l = &self.layout;
        if !positive(l.label_min_width) || l.label_min_width > l.label_max_width {
            return Err(invalid("layout.label_min_width", "expected 0 < min <= max"));
        }
        if !positive(l.row_height) {
            return Err(invalid("layout.row_height", "must be positive"));
        }
        if !positive(l.bar_height) || l.bar_height > l.row_height {
            return Err(invalid("layout.bar_height", "must fit inside a row"));
        }
        if !non_negative(self.drag.edge) || !non_negative(self.drag.damping) {
            return Err(invalid("drag", "edge and damping must not be negative"));
        }
        if !non_negative(self.markers.tolerance) {
            return Err(invalid("markers.tolerance", "must not be negative"));
        }
        if !non_negative(self.locate_ms) {
            return Err(invalid("locate_ms", "must not be negative"));
        }
        Ok(())
    }

    /// The session pair table.
    #[must_use]
    pub fn pair_table(&self) -> PairTable {
        PairTable::new(self.pairs.iter().map(|[s, e]| (s.as_str(), e.as_str())))
    }

    /// Texts for `category`, falling back to generic wording.
    #[must_use]
    pub fn category_text(&self, category: &str) -> CategoryText {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .cloned()
            .unwrap_or_else(|| CategoryText::new(category, "add a session here", "close a session here", "Track"))
    }

    pub(crate) fn zoom_limits(&self) -> ZoomLimits {
        ZoomLimits::new(self.zoom.min, self.zoom.max)
    }

    pub(crate) fn tick_policy(&self) -> TickPolicy {
        TickPolicy {
            min_label_px: self.ruler.min_label_px,
            min_tick_px: self.ruler.min_tick_px,
            min_half_hour_label_px: self.ruler.min_half_hour_label_px,
            min_quarter_hour_label_px: self.ruler.min_quarter_hour_label_px,
            min_tick_step: self.ruler.min_tick_step,
            ..TickPolicy::default()
        }
    }

    pub(crate) fn edge_scroll(&self) -> EdgeScroll {
        EdgeScroll {
            edge: self.drag.edge,
            damping: self.drag.damping,
        }
    }
}

/// Zoom limits and wheel steps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Smallest zoom.
    pub min: f64,
    /// Largest zoom.
    pub max: f64,
    /// Factor for a wheel step away from the user.
    pub wheel_in: f64,
    /// Factor for a wheel step toward the user.
    pub wheel_out: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 0.8,
            max: 3.0,
            wheel_in: 0.95,
            wheel_out: 1.05,
        }
    }
}

/// Geometry of the track layer and its hit regions, in pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Narrowest label column.
    pub label_min_width: f64,
    /// Widest label column.
    pub label_max_width: f64,
    /// Width used before anything is stored; clamped like any other.
    pub label_default_width: f64,
    /// Width of the grab strip at the right edge of the label column.
    pub gutter_width: f64,
    /// Height of a track row; the first row is left for the header.
    pub row_height: f64,
    /// Height of a session bar.
    pub bar_height: f64,
    /// Offset of a session bar from its row top.
    pub bar_top: f64,
    /// Corner radius of a range bar.
    pub bar_radius: f64,
    /// Corner radius of a singleton.
    pub single_radius: f64,
    /// Radius of a drawn resize handle.
    pub handle_radius: f64,
    /// Radius of a resize handle's hit zone.
    pub handle_hit_radius: f64,
    /// Distance of a handle center from the bar end, past its radius.
    pub handle_inset: f64,
    /// Marker cap width.
    pub cap_width: f64,
    /// Marker cap height.
    pub cap_height: f64,
    /// Marker cap corner radius.
    pub cap_radius: f64,
    /// Gap between the marker cap and the ruler bottom.
    pub cap_bottom: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            label_min_width: 80.0,
            label_max_width: 250.0,
            label_default_width: 280.0,
            gutter_width: 4.0,
            row_height: 32.0,
            bar_height: 14.0,
            bar_top: 8.0,
            bar_radius: 4.0,
            single_radius: 2.0,
            handle_radius: 4.0,
            handle_hit_radius: 7.0,
            handle_inset: 2.0,
            cap_width: 20.0,
            cap_height: 10.0,
            cap_radius: 5.0,
            cap_bottom: 4.0,
        }
    }
}

impl LayoutConfig {
    /// Clamps a label width into the configured bounds.
    #[must_use]
    pub fn clamp_label_width(&self, width: f64) -> f64 {
        width.clamp(self.label_min_width, self.label_max_width)
    }
}

/// Ruler density thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulerConfig {
    /// Minimum spacing for hour-level labels.
    pub min_label_px: f64,
    /// Minimum spacing for ticks.
    pub min_tick_px: f64,
    /// Minimum spacing for half-hour labels.
    pub min_half_hour_label_px: f64,
    /// Minimum spacing for quarter-hour labels.
    pub min_quarter_hour_label_px: f64,
    /// Finest tick step in seconds.
    pub min_tick_step: u32,
    /// Minimum gap between adjacent labels.
    pub label_gap: f64,
}

impl Default for RulerConfig {
    fn default() -> Self {
        let policy = TickPolicy::default();
        Self {
            min_label_px: policy.min_label_px,
            min_tick_px: policy.min_tick_px,
            min_half_hour_label_px: policy.min_half_hour_label_px,
            min_quarter_hour_label_px: policy.min_quarter_hour_label_px,
            min_tick_step: policy.min_tick_step,
            label_gap: 6.0,
        }
    }
}

/// Drag behavior.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Edge band that triggers auto-scroll.
    pub edge: f64,
    /// Auto-scroll damping.
    pub damping: f64,
    /// Travel under which a press and release still count as a click.
    pub click_slop: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        let edge = EdgeScroll::default();
        Self {
            edge: edge.edge,
            damping: edge.damping,
            click_slop: 3.0,
        }
    }
}

/// Region marker settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Seconds around the current time a marker counts as active.
    pub tolerance: f64,
    /// Radius used when a mark is a click rather than a drag.
    pub default_radius: f64,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.4,
            default_radius: 0.05,
        }
    }
}

/// Wording used for one track category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryText {
    /// Category these texts apply to.
    pub category: String,
    /// Completes `Press 'i' to …`.
    pub start_hint: String,
    /// Completes `Press 'o' to …`.
    pub end_hint: String,
    /// Name given to tracks added with `+`.
    pub new_track_name: String,
}

impl CategoryText {
    fn new(category: &str, start_hint: &str, end_hint: &str, new_track_name: &str) -> Self {
        Self {
            category: category.to_owned(),
            start_hint: start_hint.to_owned(),
            end_hint: end_hint.to_owned(),
            new_track_name: new_track_name.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn pairs_feed_the_table() {
        let config = EngineConfig::from_toml_str(r#"pairs = [["start", "stop"], ["in", "out"]]"#).unwrap();
        assert_eq!(config.pair_table().primary(), ("start", "stop"));
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = EngineConfig::from_toml_str("[zoom]\nmin = 4.0\nmax = 2.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "zoom", .. }));

        let err = EngineConfig::from_toml_str("[layout]\nbar_height = 40.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "layout.bar_height", .. }));

        let err = EngineConfig::from_toml_str("locate_ms = \"slow\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }

    #[test]
    fn unknown_category_gets_generic_text() {
        let config = EngineConfig::default();
        assert_eq!(config.category_text("employees").new_track_name, "Unidentified employee");
        let other = config.category_text("vehicles");
        assert_eq!(other.new_track_name, "Track");
        assert_eq!(other.start_hint, "add a session here");
        assert_eq!(other.end_hint, "close a session here");
    }

    #[test]
    fn label_width_clamps() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.clamp_label_width(layout.label_default_width), 250.0);
        assert_eq!(layout.clamp_label_width(10.0), 80.0);
    }
}
