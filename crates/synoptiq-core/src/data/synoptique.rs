//! Synoptiques: user-defined labelling schemes applied to features.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Generates a compact unique id for synoptiques and categories.
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// One labelled value within a synoptique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl Category {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            color: color.into(),
        }
    }
}

/// A named set of categories and the feature → category assignments made
/// with them.
///
/// Category names are unique within a synoptique; each feature maps to at
/// most one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synoptique {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<Category>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mapping: BTreeMap<String, String>,
}

impl Synoptique {
    /// Creates an empty synoptique with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            categories: Vec::new(),
            mapping: BTreeMap::new(),
        }
    }

    pub fn category(&self, category_id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    pub fn has_category_named(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name == name)
    }

    /// The category assigned to a feature, if it still exists.
    pub fn category_for_feature(&self, feature_id: &str) -> Option<&Category> {
        self.mapping
            .get(feature_id)
            .and_then(|category_id| self.category(category_id))
    }

    /// Features whose mapping entry points at a category that no longer exists.
    pub fn orphaned_features(&self) -> Vec<&str> {
        self.mapping
            .iter()
            .filter(|(_, category_id)| self.category(category_id).is_none())
            .map(|(feature_id, _)| feature_id.as_str())
            .collect()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
