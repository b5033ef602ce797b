//! Floor-plan geometry: a shared vertex store and indexed polygons.

use std::collections::HashSet;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DataError;

/// A closed ring of vertex indices plus the holes cut out of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polygon {
    pub shell: Vec<usize>,
    #[serde(default)]
    pub holes: Vec<Vec<usize>>,
}

impl Polygon {
    pub fn new(shell: Vec<usize>) -> Self {
        Self {
            shell,
            holes: Vec::new(),
        }
    }

    pub fn with_hole(mut self, hole: Vec<usize>) -> Self {
        self.holes.push(hole);
        self
    }

    /// Iterates the shell first, then every hole.
    pub fn rings(&self) -> impl Iterator<Item = &[usize]> {
        std::iter::once(self.shell.as_slice()).chain(self.holes.iter().map(Vec::as_slice))
    }
}

/// One building element (room, wall, door, window).
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: String,
    pub polygons: Vec<Polygon>,
}

impl Feature {
    pub fn new(id: impl Into<String>, polygons: Vec<Polygon>) -> Self {
        Self {
            id: id.into(),
            polygons,
        }
    }
}

/// Geometry of one loaded dataset.
///
/// Features keep the order in which they appear in the source document so
/// that overlapping features resolve the same way on every hit-test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    pub vertices: Vec<[f64; 2]>,
    #[serde(with = "ordered_features")]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(vertices: Vec<[f64; 2]>, features: Vec<Feature>) -> Self {
        Self { vertices, features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn feature(&self, id: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    /// Resolves a ring of indices into points.
    ///
    /// Returns `None` if any index is outside the vertex store.
    pub fn ring(&self, indices: &[usize]) -> Option<Vec<[f64; 2]>> {
        indices.iter().map(|&i| self.vertices.get(i).copied()).collect()
    }

    /// Bounding box of every vertex as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        if self.vertices.is_empty() {
            return None;
        }

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for [x, y] in &self.vertices {
            min_x = min_x.min(*x);
            min_y = min_y.min(*y);
            max_x = max_x.max(*x);
            max_y = max_y.max(*y);
        }
        Some((min_x, min_y, max_x, max_y))
    }

    /// Checks that every ring references valid vertices and that every shell
    /// has at least three distinct vertices.
    pub fn validate(&self) -> Result<(), DataError> {
        for feature in &self.features {
            for polygon in &feature.polygons {
                for ring in polygon.rings() {
                    if let Some(bad) = ring.iter().find(|&&i| i >= self.vertices.len()) {
                        return Err(DataError::InvalidGeometry {
                            feature_id: feature.id.clone(),
                            reason: format!(
                                "vertex index {} out of range ({} vertices)",
                                bad,
                                self.vertices.len()
                            ),
                        });
                    }
                }

                let distinct: HashSet<usize> = polygon.shell.iter().copied().collect();
                if distinct.len() < 3 {
                    return Err(DataError::InvalidGeometry {
                        feature_id: feature.id.clone(),
                        reason: format!("shell has {} distinct vertices", distinct.len()),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Serializes `Vec<Feature>` as a JSON object keyed by feature id,
/// preserving document order on the way in.
mod ordered_features {
    use super::*;

    #[derive(Serialize, Deserialize)]
    struct FeatureBody {
        #[serde(default)]
        polygons: Vec<Polygon>,
    }

    #[derive(Serialize)]
    struct FeatureBodyRef<'a> {
        polygons: &'a [Polygon],
    }

    pub fn serialize<S: Serializer>(features: &[Feature], serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(features.len()))?;
        for feature in features {
            map.serialize_entry(
                &feature.id,
                &FeatureBodyRef {
                    polygons: &feature.polygons,
                },
            )?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Feature>, D::Error> {
        struct FeaturesVisitor;

        impl<'de> Visitor<'de> for FeaturesVisitor {
            type Value = Vec<Feature>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of feature id to feature geometry")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut features = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((id, body)) = access.next_entry::<String, FeatureBody>()? {
                    features.push(Feature::new(id, body.polygons));
                }
                Ok(features)
            }
        }

        deserializer.deserialize_map(FeaturesVisitor)
    }
}
