//! Floor-plan renderer.
//!
//! Resolves the paint of every feature from its floor, the active filters
//! and the selected synoptique, then draws it onto a [`Surface`]. Styling
//! strings are parsed once into a [`ResolvedStyle`].

use std::collections::{BTreeMap, HashMap};

use synoptiq_core::constants::{
    ASSIGNED_FEATURE_STROKE, DEFAULT_FEATURE_FILL, DEFAULT_FEATURE_STROKE, FALLBACK_CATEGORY_COLOR,
    MUTED_FEATURE_STROKE,
};
use synoptiq_core::data::{
    ActiveFilters, AttributeValue, FeatureCollection, MetadataIndex, Synoptique,
};
use synoptiq_core::Rgba;
use synoptiq_settings::Styling;

use crate::surface::{PolygonStyle, Surface};
use crate::viewport::Camera;

fn parse(value: &str, fallback: &str) -> Rgba {
    let fallback = fallback.parse().unwrap_or(Rgba::TRANSPARENT);
    Rgba::parse_or(value, fallback)
}

/// [`Styling`] with every color parsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedStyle {
    pub feature_fill: Rgba,
    pub feature_stroke: Rgba,
    pub line_width: f64,
    pub assigned_stroke: Rgba,
    pub assigned_line_width: f64,
    pub muted_stroke: Rgba,
    pub muted_line_width: f64,
    pub fallback_category_color: Rgba,
}

impl ResolvedStyle {
    pub fn from_styling(styling: &Styling) -> Self {
        Self {
            feature_fill: parse(&styling.feature_fill, DEFAULT_FEATURE_FILL),
            feature_stroke: parse(&styling.feature_stroke, DEFAULT_FEATURE_STROKE),
            line_width: styling.line_width,
            assigned_stroke: parse(&styling.assigned_stroke, ASSIGNED_FEATURE_STROKE),
            assigned_line_width: styling.assigned_line_width,
            muted_stroke: parse(&styling.muted_stroke, MUTED_FEATURE_STROKE),
            muted_line_width: styling.muted_line_width,
            fallback_category_color: parse(
                &styling.fallback_category_color,
                FALLBACK_CATEGORY_COLOR,
            ),
        }
    }

    fn default_paint(&self) -> PolygonStyle {
        PolygonStyle {
            fill: self.feature_fill,
            stroke: self.feature_stroke,
            line_width: self.line_width,
        }
    }

    fn outline_paint(&self) -> PolygonStyle {
        PolygonStyle {
            fill: Rgba::TRANSPARENT,
            ..self.default_paint()
        }
    }

    fn assigned_paint(&self, fill: Rgba) -> PolygonStyle {
        PolygonStyle {
            fill,
            stroke: self.assigned_stroke,
            line_width: self.assigned_line_width,
        }
    }

    fn muted_paint(&self) -> PolygonStyle {
        PolygonStyle {
            fill: Rgba::TRANSPARENT,
            stroke: self.muted_stroke,
            line_width: self.muted_line_width,
        }
    }
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        Self::from_styling(&Styling::default())
    }
}

/// Snapshot of the selected synoptique taken by a viewer: category colors
/// and a copy of the feature mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryCache {
    colors: HashMap<String, Rgba>,
    mapping: BTreeMap<String, String>,
}

impl CategoryCache {
    /// Builds the snapshot for `selected` out of a synoptique list. An
    /// unknown or absent selection yields an empty cache.
    pub fn build(synoptiques: &[Synoptique], selected: Option<&str>, fallback: Rgba) -> Self {
        let Some(synoptique) = selected.and_then(|id| synoptiques.iter().find(|s| s.id == id))
        else {
            return Self::default();
        };

        let colors = synoptique
            .categories
            .iter()
            .map(|c| (c.id.clone(), Rgba::parse_or(&c.color, fallback)))
            .collect();
        Self {
            colors,
            mapping: synoptique.mapping.clone(),
        }
    }

    /// Category id the feature is mapped to, known or not.
    pub fn category_of(&self, feature_id: &str) -> Option<&str> {
        self.mapping.get(feature_id).map(String::as_str)
    }

    /// Fill color of the feature's category, if it is mapped to one that
    /// still exists.
    pub fn color_of(&self, feature_id: &str) -> Option<Rgba> {
        self.category_of(feature_id)
            .and_then(|category_id| self.colors.get(category_id))
            .copied()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.mapping.is_empty()
    }
}

/// How a feature takes part in drawing and picking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// On another floor: neither drawn nor pickable.
    Hidden,
    /// Excluded by the filters: drawn as an outline, not pickable.
    Muted,
    Active,
}

/// Classifies a feature against the viewer's floor and the active filters.
///
/// A feature without a metadata record or without a `floor_id` is shown on
/// every floor.
pub fn classify(
    feature_id: &str,
    metadata: Option<&MetadataIndex>,
    floor_id: Option<&AttributeValue>,
    filters: &ActiveFilters,
) -> Visibility {
    let record = metadata.and_then(|index| index.get(feature_id));
    let feature_floor = record.and_then(|r| r.floor_id());
    if let (Some(wanted), Some(actual)) = (floor_id, feature_floor) {
        if wanted != actual {
            return Visibility::Hidden;
        }
    }

    if filters.matches(record) {
        Visibility::Active
    } else {
        Visibility::Muted
    }
}

/// Everything a single draw pass reads.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub features: &'a FeatureCollection,
    pub metadata: Option<&'a MetadataIndex>,
    pub filters: &'a ActiveFilters,
    pub floor_id: Option<&'a AttributeValue>,
    pub synoptique_selected: bool,
    pub cache: &'a CategoryCache,
    pub style: &'a ResolvedStyle,
}

impl Scene<'_> {
    /// Paint for one feature, or `None` when it is not drawn at all.
    pub fn paint_for(&self, feature_id: &str) -> Option<PolygonStyle> {
        match classify(feature_id, self.metadata, self.floor_id, self.filters) {
            Visibility::Hidden => None,
            Visibility::Muted => Some(self.style.muted_paint()),
            Visibility::Active if self.synoptique_selected => Some(
                self.cache
                    .color_of(feature_id)
                    .map(|fill| self.style.assigned_paint(fill))
                    .unwrap_or_else(|| self.style.outline_paint()),
            ),
            Visibility::Active => Some(self.style.default_paint()),
        }
    }
}

/// Clears the surface and draws every feature of the scene in order.
///
/// Returns the number of features drawn.
pub fn render(surface: &mut dyn Surface, camera: &Camera, scene: &Scene<'_>) -> usize {
    surface.clear();

    let mut drawn = 0;
    for feature in &scene.features.features {
        let Some(paint) = scene.paint_for(&feature.id) else {
            continue;
        };

        for polygon in &feature.polygons {
            let Some(shell) = scene.features.ring(&polygon.shell) else {
                tracing::trace!("Skipping polygon of {} with a bad shell", feature.id);
                continue;
            };
            let mut rings = Vec::with_capacity(1 + polygon.holes.len());
            rings.push(shell);
            rings.extend(
                polygon
                    .holes
                    .iter()
                    .filter_map(|hole| scene.features.ring(hole)),
            );
            surface.draw_polygon(&rings, &paint, camera);
        }
        drawn += 1;
    }
    drawn
}
