//! Configuration for synoptiq
//!
//! Supports JSON and TOML file formats stored in the platform config
//! directory. Configuration is organized into two sections:
//! - Viewer settings (palette, styling, camera limits, gesture thresholds)
//! - Data settings (filter facets, persistence folder, local store root)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use synoptiq_core::constants::{
    Palette, ASSIGNED_LINE_WIDTH, ATTRIBUTES_FOLDER, CLICK_MAX_DURATION_MS,
    DEFAULT_FEATURE_FILL, DEFAULT_LINE_WIDTH, DRAG_THRESHOLD_PX, FALLBACK_CATEGORY_COLOR,
    MAX_SCALE, MIN_SCALE, MUTED_FEATURE_STROKE, MUTED_LINE_WIDTH, PRESET_KEYS, VIEW_PADDING,
    ZOOM_INTENSITY,
};
use synoptiq_core::Rgba;

use crate::error::{SettingsError, SettingsResult};

/// Colors and line widths used to draw features
///
/// Line widths are in screen pixels; the renderer divides them by the
/// camera scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Styling {
    pub feature_fill: String,
    pub feature_stroke: String,
    pub line_width: f64,
    pub assigned_stroke: String,
    pub assigned_line_width: f64,
    pub muted_stroke: String,
    pub muted_line_width: f64,
    pub fallback_category_color: String,
}

impl Styling {
    /// Default styling for a palette
    pub fn for_palette(palette: Palette) -> Self {
        Self {
            feature_fill: DEFAULT_FEATURE_FILL.to_string(),
            feature_stroke: palette.feature_stroke().to_string(),
            line_width: DEFAULT_LINE_WIDTH,
            assigned_stroke: palette.assigned_stroke().to_string(),
            assigned_line_width: ASSIGNED_LINE_WIDTH,
            muted_stroke: MUTED_FEATURE_STROKE.to_string(),
            muted_line_width: MUTED_LINE_WIDTH,
            fallback_category_color: FALLBACK_CATEGORY_COLOR.to_string(),
        }
    }

    fn validate(&self) -> SettingsResult<()> {
        for (key, color) in [
            ("styling.feature_fill", &self.feature_fill),
            ("styling.feature_stroke", &self.feature_stroke),
            ("styling.assigned_stroke", &self.assigned_stroke),
            ("styling.muted_stroke", &self.muted_stroke),
            ("styling.fallback_category_color", &self.fallback_category_color),
        ] {
            color
                .parse::<Rgba>()
                .map_err(|e| SettingsError::invalid(key, e.to_string()))?;
        }

        for (key, width) in [
            ("styling.line_width", self.line_width),
            ("styling.assigned_line_width", self.assigned_line_width),
            ("styling.muted_line_width", self.muted_line_width),
        ] {
            if !(width > 0.0 && width.is_finite()) {
                return Err(SettingsError::invalid(key, "must be > 0"));
            }
        }
        Ok(())
    }
}

impl Default for Styling {
    fn default() -> Self {
        Self::for_palette(Palette::default())
    }
}

/// Viewer styling and interaction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Host color scheme
    pub palette: Palette,
    /// Screen margin kept around the plan when centring
    pub view_padding: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Relative scale change per wheel notch
    pub zoom_intensity: f64,
    /// Pointer travel in pixels before a press becomes a drag
    pub drag_threshold_px: f64,
    /// Longest press still treated as a click
    pub click_max_duration_ms: u64,
    pub styling: Styling,
}

impl ViewerSettings {
    /// Default settings with styling chosen for a palette
    pub fn for_palette(palette: Palette) -> Self {
        Self {
            palette,
            styling: Styling::for_palette(palette),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> SettingsResult<()> {
        if !(self.view_padding >= 0.0 && self.view_padding.is_finite()) {
            return Err(SettingsError::invalid("viewer.view_padding", "must be >= 0"));
        }
        if !(self.min_scale > 0.0 && self.min_scale.is_finite()) {
            return Err(SettingsError::invalid("viewer.min_scale", "must be > 0"));
        }
        if !(self.max_scale >= self.min_scale && self.max_scale.is_finite()) {
            return Err(SettingsError::invalid(
                "viewer.max_scale",
                "must be >= min_scale",
            ));
        }
        if !(self.zoom_intensity > 0.0 && self.zoom_intensity < 1.0) {
            return Err(SettingsError::invalid(
                "viewer.zoom_intensity",
                "must be between 0 and 1",
            ));
        }
        if !(self.drag_threshold_px >= 0.0 && self.drag_threshold_px.is_finite()) {
            return Err(SettingsError::invalid(
                "viewer.drag_threshold_px",
                "must be >= 0",
            ));
        }
        if self.click_max_duration_ms == 0 {
            return Err(SettingsError::invalid(
                "viewer.click_max_duration_ms",
                "must be > 0",
            ));
        }
        self.styling.validate()
    }
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            view_padding: VIEW_PADDING,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            zoom_intensity: ZOOM_INTENSITY,
            drag_threshold_px: DRAG_THRESHOLD_PX,
            click_max_duration_ms: CLICK_MAX_DURATION_MS,
            styling: Styling::default(),
        }
    }
}

/// Data-layer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Metadata keys offered as filter facets
    pub preset_keys: Vec<String>,
    /// Folder, relative to the exercise, where synoptiques are saved
    pub attributes_folder: String,
    /// Root directory of the local file store
    pub store_root: Option<PathBuf>,
}

impl DataSettings {
    pub fn validate(&self) -> SettingsResult<()> {
        if self.preset_keys.iter().any(|k| k.trim().is_empty()) {
            return Err(SettingsError::invalid(
                "data.preset_keys",
                "keys must not be empty",
            ));
        }
        if self.attributes_folder.trim().is_empty() {
            return Err(SettingsError::invalid(
                "data.attributes_folder",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            preset_keys: PRESET_KEYS.iter().map(|k| k.to_string()).collect(),
            attributes_folder: ATTRIBUTES_FOLDER.to_string(),
            store_root: None,
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub viewer: ViewerSettings,
    pub data: DataSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location: `<config dir>/synoptiq/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("synoptiq").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load config from file, or defaults if the file does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e))
            })?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        self.viewer.validate()?;
        self.data.validate()
    }
}
