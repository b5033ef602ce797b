//! Default visual and interaction parameters.
//!
//! These are the values `ViewerSettings::default()` starts from. Colors are
//! CSS strings so they can be written to and read from config files as-is.

use serde::{Deserialize, Serialize};

/// Fill of a feature that matches the filters and has no category.
pub const DEFAULT_FEATURE_FILL: &str = "rgba(150, 150, 150, 0.3)";
/// Border of a feature that matches the filters.
pub const DEFAULT_FEATURE_STROKE: &str = "#888";
pub const DEFAULT_LINE_WIDTH: f64 = 0.5;

/// Border of a feature mapped to a category of the selected synoptique.
pub const ASSIGNED_FEATURE_STROKE: &str = "#333";
pub const ASSIGNED_LINE_WIDTH: f64 = 0.7;

/// Border of a feature excluded by the active filters.
pub const MUTED_FEATURE_STROKE: &str = "rgba(150, 150, 150, 0.5)";
pub const MUTED_LINE_WIDTH: f64 = 0.2;

/// Used when a category color cannot be parsed.
pub const FALLBACK_CATEGORY_COLOR: &str = "#808080";

/// Screen-space margin kept around the plan by `center_view`.
pub const VIEW_PADDING: f64 = 20.0;
pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 1000.0;
/// Relative scale change per wheel notch.
pub const ZOOM_INTENSITY: f64 = 0.1;

/// Pointer travel, in pixels, after which a press becomes a drag.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;
/// A press released sooner than this without dragging is a click.
pub const CLICK_MAX_DURATION_MS: u64 = 250;

/// Folder, relative to the exercise, where synoptiques are persisted.
pub const ATTRIBUTES_FOLDER: &str = "ais/attributes";

/// Metadata keys offered as filter facets.
pub const PRESET_KEYS: [&str; 7] = [
    "facility_id",
    "unit_id",
    "facility_type",
    "unit_type",
    "entity_group",
    "entity_type",
    "entity_subtype",
];

/// Host color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    #[default]
    Light,
    Dark,
}

impl Palette {
    pub fn text_color(&self) -> &'static str {
        match self {
            Palette::Light => "rgba(51, 51, 51, 1)",
            Palette::Dark => "rgba(224, 224, 224, 1)",
        }
    }

    /// Border of unassigned features drawn on this palette.
    pub fn feature_stroke(&self) -> &'static str {
        match self {
            Palette::Light => DEFAULT_FEATURE_STROKE,
            Palette::Dark => "rgba(200, 200, 200, 1)",
        }
    }

    /// Border of assigned features drawn on this palette.
    pub fn assigned_stroke(&self) -> &'static str {
        match self {
            Palette::Light => ASSIGNED_FEATURE_STROKE,
            Palette::Dark => "rgba(240, 240, 240, 1)",
        }
    }
}

impl std::fmt::Display for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Palette::Light => write!(f, "light"),
            Palette::Dark => write!(f, "dark"),
        }
    }
}
