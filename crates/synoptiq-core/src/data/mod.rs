//! Floor-plan data types
//!
//! Provides the value types loaded from the floor-plan JSON resources:
//! - Geometry: a shared vertex store and features made of polygons with holes
//! - Metadata: per-feature attribute records and faceted filters over them
//! - Synoptiques: labelling schemes with categories and feature mappings

mod geometry;
mod metadata;
mod synoptique;

pub use geometry::{Feature, FeatureCollection, Polygon};
pub use metadata::{ActiveFilters, AttributeValue, MetadataIndex, MetadataRecord, FLOOR_ID_KEY};
pub use synoptique::{generate_id, Category, Synoptique};
