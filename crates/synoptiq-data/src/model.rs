//! Floor-plan data model.
//!
//! All state sits behind one `RwLock`. Mutators release the lock before
//! publishing, so subscribers may read back through the model from inside
//! their handlers.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;
use synoptiq_core::constants::{ATTRIBUTES_FOLDER, PRESET_KEYS};
use synoptiq_core::{
    ActiveFilters, AttributeValue, Category, DataError, DataEvent, EventBus, FeatureCollection,
    MetadataIndex, MetadataRecord, Result, Synoptique,
};
use synoptiq_settings::DataSettings;

use crate::store::FileStore;

/// Locations of the five resources making up one dataset
///
/// A slot without a path is skipped on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub attributes: Option<String>,
    pub features: Option<String>,
    pub metadata: Option<String>,
    pub selections: Option<String>,
    pub templates: Option<String>,
}

/// Where and as whom the synoptique collection is saved
///
/// The collection is written to `<attributes folder>/<model_id>.json` under
/// the exercise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistTarget {
    pub exercise_id: String,
    pub model_id: String,
    pub token: String,
}

impl PersistTarget {
    pub fn new(
        exercise_id: impl Into<String>,
        model_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            exercise_id: exercise_id.into(),
            model_id: model_id.into(),
            token: token.into(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.exercise_id.is_empty() && !self.model_id.is_empty() && !self.token.is_empty()
    }
}

/// Snapshot of every loaded slot
#[derive(Debug, Clone, Default)]
pub struct LoadedData {
    pub attributes: Option<Vec<Synoptique>>,
    pub features: Option<Arc<FeatureCollection>>,
    pub metadata: Option<Arc<MetadataIndex>>,
    pub selections: Option<Value>,
    pub templates: Option<Value>,
}

#[derive(Debug, Default)]
struct DataState {
    attributes: Option<Vec<Synoptique>>,
    features: Option<Arc<FeatureCollection>>,
    metadata: Option<Arc<MetadataIndex>>,
    selections: Option<Value>,
    templates: Option<Value>,
    active_filters: ActiveFilters,
}

impl DataState {
    fn synoptique_mut(&mut self, id: &str) -> Option<&mut Synoptique> {
        self.attributes
            .as_mut()
            .and_then(|list| list.iter_mut().find(|s| s.id == id))
    }

    fn synoptiques(&self) -> Vec<Synoptique> {
        self.attributes.clone().unwrap_or_default()
    }
}

/// Geometry, metadata and synoptiques of one dataset, shared by its viewers
pub struct FloorPlanData {
    store: Arc<dyn FileStore>,
    bus: Arc<EventBus>,
    state: RwLock<DataState>,
    preset_keys: Vec<String>,
    attributes_folder: String,
}

impl FloorPlanData {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self {
            store,
            bus: Arc::new(EventBus::new()),
            state: RwLock::new(DataState::default()),
            preset_keys: PRESET_KEYS.iter().map(|k| k.to_string()).collect(),
            attributes_folder: ATTRIBUTES_FOLDER.to_string(),
        }
    }

    /// Create a model using the facet keys and save folder from settings
    pub fn from_settings(store: Arc<dyn FileStore>, settings: &DataSettings) -> Self {
        Self {
            preset_keys: settings.preset_keys.clone(),
            attributes_folder: settings.attributes_folder.clone(),
            ..Self::new(store)
        }
    }

    /// Bus on which every change to this dataset is published
    pub fn events(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn preset_keys(&self) -> &[String] {
        &self.preset_keys
    }

    fn publish(&self, event: DataEvent) {
        // Nobody listening is not an error for the model.
        let _ = self.bus.publish(event);
    }

    // --- Loading ---

    /// Fetch the five resources in order, then publish `ContentsLoaded`
    ///
    /// A slot with no path keeps its current value. The first failed fetch
    /// or decode aborts the load; slots loaded before it keep their new
    /// value.
    pub async fn load_data(&self, paths: &DataPaths, token: &str) -> Result<()> {
        if let Some(value) = self.fetch_slot("attributes", &paths.attributes, token).await? {
            let attributes: Option<Vec<Synoptique>> = decode("attributes", value)?;
            self.state.write().attributes = Some(attributes.unwrap_or_default());
        }

        if let Some(value) = self.fetch_slot("features", &paths.features, token).await? {
            let features: FeatureCollection = decode("features", value)?;
            if let Err(e) = features.validate() {
                tracing::warn!("Loaded geometry is inconsistent: {}", e);
            }
            self.state.write().features = Some(Arc::new(features));
        }

        if let Some(value) = self.fetch_slot("metadata", &paths.metadata, token).await? {
            let metadata = decode_metadata(value)?;
            self.state.write().metadata = Some(Arc::new(metadata));
        }

        if let Some(value) = self.fetch_slot("selections", &paths.selections, token).await? {
            self.state.write().selections = Some(value);
        }

        if let Some(value) = self.fetch_slot("templates", &paths.templates, token).await? {
            self.state.write().templates = Some(value);
        }

        tracing::info!("Floor-plan data loaded");
        self.publish(DataEvent::ContentsLoaded);
        Ok(())
    }

    async fn fetch_slot(
        &self,
        slot: &str,
        path: &Option<String>,
        token: &str,
    ) -> Result<Option<Value>> {
        match path.as_deref().filter(|p| !p.is_empty()) {
            Some(path) => {
                tracing::debug!("Fetching {} from {}", slot, path);
                Ok(Some(self.store.fetch_json(path, token).await?))
            }
            None => {
                tracing::warn!("No path provided for {}", slot);
                Ok(None)
            }
        }
    }

    /// Snapshot of every slot
    pub fn get_data(&self) -> LoadedData {
        let state = self.state.read();
        LoadedData {
            attributes: state.attributes.clone(),
            features: state.features.clone(),
            metadata: state.metadata.clone(),
            selections: state.selections.clone(),
            templates: state.templates.clone(),
        }
    }

    /// Reset every slot and the active filters, then publish `DataCleared`
    pub fn clear_data(&self) {
        *self.state.write() = DataState::default();
        self.publish(DataEvent::DataCleared);
    }

    pub fn features(&self) -> Option<Arc<FeatureCollection>> {
        self.state.read().features.clone()
    }

    pub fn metadata(&self) -> Option<Arc<MetadataIndex>> {
        self.state.read().metadata.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.state.read().features.is_some()
    }

    // --- Metadata queries ---

    /// Distinct `floor_id` values in first-seen order
    pub fn get_unique_floor_ids(&self) -> Vec<AttributeValue> {
        let Some(metadata) = self.metadata().filter(|m| !m.is_empty()) else {
            tracing::warn!("No metadata available to get floor ids");
            return Vec::new();
        };

        let mut seen = HashSet::new();
        metadata
            .records()
            .iter()
            .filter_map(MetadataRecord::floor_id)
            .filter(|id| seen.insert((*id).clone()))
            .cloned()
            .collect()
    }

    /// Sorted distinct values of every preset key
    pub fn get_metadata_presets(&self) -> BTreeMap<String, Vec<AttributeValue>> {
        let Some(metadata) = self.metadata().filter(|m| !m.is_empty()) else {
            tracing::warn!("No metadata available to generate presets");
            return BTreeMap::new();
        };

        self.preset_keys
            .iter()
            .map(|key| {
                let values = collect_values(metadata.records().iter(), key);
                (key.clone(), values)
            })
            .collect()
    }

    /// Values of each preset key still reachable under every other filter
    ///
    /// For key `k` the records considered are those matching all active
    /// filters except the one on `k`, so the options of a facet never
    /// shrink because of a selection made in that same facet.
    pub fn get_available_presets(
        &self,
        filters: &ActiveFilters,
    ) -> BTreeMap<String, Vec<AttributeValue>> {
        let Some(metadata) = self.metadata().filter(|m| !m.is_empty()) else {
            tracing::warn!("No metadata available to generate available presets");
            return BTreeMap::new();
        };

        self.preset_keys
            .iter()
            .map(|key| {
                let reachable = metadata
                    .records()
                    .iter()
                    .filter(|record| filters.matches_except(Some(record), Some(key)));
                (key.clone(), collect_values(reachable, key))
            })
            .collect()
    }

    // --- Filters ---

    pub fn active_filters(&self) -> ActiveFilters {
        self.state.read().active_filters.clone()
    }

    /// Replace the filter set and publish `FiltersChanged`
    pub fn set_active_filters(&self, filters: ActiveFilters) {
        self.state.write().active_filters = filters.clone();
        self.publish(DataEvent::FiltersChanged(filters));
    }

    // --- Synoptiques ---

    pub fn get_synoptiques(&self) -> Vec<Synoptique> {
        self.state.read().synoptiques()
    }

    pub fn get_synoptique(&self, synoptique_id: &str) -> Option<Synoptique> {
        self.state
            .read()
            .attributes
            .as_ref()
            .and_then(|list| list.iter().find(|s| s.id == synoptique_id).cloned())
    }

    pub fn get_categories_for_synoptique(&self, synoptique_id: &str) -> Vec<Category> {
        self.get_synoptique(synoptique_id)
            .map(|s| s.categories)
            .unwrap_or_default()
    }

    /// Append a new empty synoptique and save the collection
    ///
    /// Returns `Ok(None)` when the name or the persist target is missing.
    /// The new synoptique is visible, and `SynoptiquesChanged` published,
    /// before the save starts. If the save fails it is removed again,
    /// `SynoptiquesChanged` is published a second time and the error
    /// returned.
    pub async fn add_synoptique(
        &self,
        name: &str,
        target: &PersistTarget,
    ) -> Result<Option<String>> {
        let name = name.trim();
        if name.is_empty() || !target.is_complete() {
            tracing::error!("Missing name or persist target to add a synoptique");
            return Ok(None);
        }

        let synoptique = Synoptique::new(name);
        let id = synoptique.id.clone();
        let snapshot = {
            let mut state = self.state.write();
            state
                .attributes
                .get_or_insert_with(Vec::new)
                .push(synoptique);
            state.synoptiques()
        };
        self.publish(DataEvent::SynoptiquesChanged(snapshot.clone()));

        if let Err(e) = self.save_collection(&snapshot, target).await {
            tracing::error!("Failed to save new synoptique {}: {}", id, e);
            let rolled_back = {
                let mut state = self.state.write();
                if let Some(list) = state.attributes.as_mut() {
                    list.retain(|s| s.id != id);
                }
                state.synoptiques()
            };
            self.publish(DataEvent::SynoptiquesChanged(rolled_back));
            return Err(e);
        }

        tracing::info!("Added synoptique {} ({})", name, id);
        Ok(Some(id))
    }

    /// Append a category to a synoptique and save the collection
    ///
    /// Returns `None` on a missing argument, an unknown synoptique, a
    /// category name already used in that synoptique, or a failed save (in
    /// which case the append is undone). `CategoryListChanged` is published
    /// only once the save succeeded.
    pub async fn add_category_to_synoptique(
        &self,
        synoptique_id: &str,
        name: &str,
        color: &str,
        target: &PersistTarget,
    ) -> Option<Category> {
        let name = name.trim();
        if synoptique_id.is_empty() || name.is_empty() || color.is_empty() || !target.is_complete()
        {
            tracing::error!("Missing required parameters to add a category");
            return None;
        }

        let category = Category::new(name, color);
        let snapshot = {
            let mut state = self.state.write();
            let Some(synoptique) = state.synoptique_mut(synoptique_id) else {
                tracing::error!("Synoptique {} not found", synoptique_id);
                return None;
            };
            if synoptique.has_category_named(name) {
                tracing::warn!(
                    "Category '{}' already exists in synoptique {}",
                    name,
                    synoptique_id
                );
                return None;
            }
            synoptique.categories.push(category.clone());
            state.synoptiques()
        };

        if let Err(e) = self.save_collection(&snapshot, target).await {
            tracing::error!(
                "Failed to save attributes after adding category {}: {}",
                category.id,
                e
            );
            let mut state = self.state.write();
            if let Some(synoptique) = state.synoptique_mut(synoptique_id) {
                synoptique.categories.retain(|c| c.id != category.id);
            }
            return None;
        }

        self.publish(DataEvent::CategoryListChanged {
            synoptique_id: synoptique_id.to_string(),
            synoptiques: snapshot,
        });
        Some(category)
    }

    /// Remove a category and every mapping entry pointing at it, then save
    ///
    /// Returns `Ok(false)` when the synoptique or category is unknown. On a
    /// failed save the synoptique is restored, the restore published, and
    /// the error returned.
    pub async fn remove_category_from_synoptique(
        &self,
        synoptique_id: &str,
        category_id: &str,
        target: &PersistTarget,
    ) -> Result<bool> {
        if !target.is_complete() {
            tracing::error!("Missing persist target to remove a category");
            return Ok(false);
        }

        let (previous, snapshot, cleared) = {
            let mut state = self.state.write();
            let Some(synoptique) = state.synoptique_mut(synoptique_id) else {
                tracing::error!("Synoptique {} not found", synoptique_id);
                return Ok(false);
            };
            if synoptique.category(category_id).is_none() {
                tracing::warn!(
                    "Category {} not found in synoptique {}",
                    category_id,
                    synoptique_id
                );
                return Ok(false);
            }

            let previous = synoptique.clone();
            synoptique.categories.retain(|c| c.id != category_id);
            let before = synoptique.mapping.len();
            synoptique.mapping.retain(|_, c| c != category_id);
            let cleared = before - synoptique.mapping.len();
            (previous, state.synoptiques(), cleared)
        };

        self.publish_category_removal(synoptique_id, snapshot.clone(), cleared);

        if let Err(e) = self.save_collection(&snapshot, target).await {
            tracing::error!("Failed to save removal of category {}: {}", category_id, e);
            let restored = {
                let mut state = self.state.write();
                if let Some(synoptique) = state.synoptique_mut(synoptique_id) {
                    *synoptique = previous;
                }
                state.synoptiques()
            };
            self.publish_category_removal(synoptique_id, restored, cleared);
            return Err(e);
        }

        tracing::info!(
            "Removed category {} from synoptique {} ({} assignments cleared)",
            category_id,
            synoptique_id,
            cleared
        );
        Ok(true)
    }

    fn publish_category_removal(&self, synoptique_id: &str, list: Vec<Synoptique>, cleared: usize) {
        if cleared > 0 {
            self.publish(DataEvent::CategoryMappingChanged(list.clone()));
        }
        self.publish(DataEvent::CategoryListChanged {
            synoptique_id: synoptique_id.to_string(),
            synoptiques: list,
        });
    }

    /// Set (`Some`) or clear (`None`) the category of one feature
    ///
    /// Returns `true` and publishes `CategoryMappingChanged` only when the
    /// mapping actually changed. Unknown synoptiques or categories and an
    /// empty feature id return `false` with no side effect. Does not save.
    pub fn assign_category_to_feature(
        &self,
        synoptique_id: &str,
        category_id: Option<&str>,
        feature_id: &str,
    ) -> bool {
        if synoptique_id.is_empty() || feature_id.is_empty() {
            return false;
        }

        let snapshot = {
            let mut state = self.state.write();
            let Some(synoptique) = state.synoptique_mut(synoptique_id) else {
                return false;
            };

            let changed = match category_id {
                None => synoptique.mapping.remove(feature_id).is_some(),
                Some(category_id) => {
                    if synoptique.category(category_id).is_none() {
                        tracing::warn!(
                            "Category {} not found in synoptique {}",
                            category_id,
                            synoptique_id
                        );
                        return false;
                    }
                    synoptique
                        .mapping
                        .insert(feature_id.to_string(), category_id.to_string())
                        .as_deref()
                        != Some(category_id)
                }
            };
            if !changed {
                return false;
            }
            state.synoptiques()
        };

        tracing::debug!(
            "Feature {} of synoptique {} now {:?}",
            feature_id,
            synoptique_id,
            category_id
        );
        self.publish(DataEvent::CategoryMappingChanged(snapshot));
        true
    }

    /// Save the synoptique collection as it currently is
    pub async fn save_attributes(&self, target: &PersistTarget) -> Result<()> {
        let Some(snapshot) = self.state.read().attributes.clone() else {
            tracing::warn!("No attributes to save");
            return Ok(());
        };
        self.save_collection(&snapshot, target).await
    }

    async fn save_collection(&self, list: &[Synoptique], target: &PersistTarget) -> Result<()> {
        let data = serde_json::to_value(list).map_err(|source| DataError::Decode {
            resource: "attributes".to_string(),
            source,
        })?;
        self.store
            .save_json(
                &target.exercise_id,
                &self.attributes_folder,
                &target.model_id,
                &target.token,
                &data,
            )
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for FloorPlanData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("FloorPlanData")
            .field("features", &state.features.as_ref().map(|f| f.len()))
            .field("metadata", &state.metadata.as_ref().map(|m| m.len()))
            .field(
                "synoptiques",
                &state.attributes.as_ref().map(|a| a.len()),
            )
            .field("active_filters", &state.active_filters)
            .finish()
    }
}

fn decode<T: serde::de::DeserializeOwned>(resource: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|source| {
        DataError::Decode {
            resource: resource.to_string(),
            source,
        }
        .into()
    })
}

/// Metadata is an array of flat records; entries that are null or have no
/// id are skipped.
fn decode_metadata(value: Value) -> Result<MetadataIndex> {
    let rows: Option<Vec<Value>> = decode("metadata", value)?;
    let rows = rows.unwrap_or_default();
    let total = rows.len();

    let records: Vec<MetadataRecord> = rows
        .into_iter()
        .filter(|row| !row.is_null())
        .filter_map(|row| serde_json::from_value(row).ok())
        .collect();
    if records.len() < total {
        tracing::warn!(
            "Skipped {} of {} metadata rows without a usable id",
            total - records.len(),
            total
        );
    }
    Ok(MetadataIndex::new(records))
}

fn collect_values<'a>(
    records: impl Iterator<Item = &'a MetadataRecord>,
    key: &str,
) -> Vec<AttributeValue> {
    records
        .filter_map(|record| record.get(key))
        .filter(|value| !value.is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
