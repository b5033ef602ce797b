//! Registry tying one shared data model to any number of viewers.

use std::collections::BTreeMap;
use std::sync::Arc;

use synoptiq_core::data::generate_id;
use synoptiq_data::{FileStore, FloorPlanData};
use synoptiq_settings::{Config, ViewerSettings};

use crate::surface::SurfaceHost;
use crate::viewer::{FloorPlanViewer, ViewerOptions};

/// Owns the data model and the viewers built on it, keyed by generated id.
#[derive(Debug)]
pub struct SynoptiqueFeature {
    data: Arc<FloorPlanData>,
    settings: ViewerSettings,
    viewers: BTreeMap<String, FloorPlanViewer>,
}

impl SynoptiqueFeature {
    pub fn new(data: Arc<FloorPlanData>, settings: ViewerSettings) -> Self {
        Self {
            data,
            settings,
            viewers: BTreeMap::new(),
        }
    }

    /// Builds the data model over `store` with the configured facets.
    pub fn from_config(store: Arc<dyn FileStore>, config: &Config) -> Self {
        let data = Arc::new(FloorPlanData::from_settings(store, &config.data));
        Self::new(data, config.viewer.clone())
    }

    pub fn data(&self) -> &Arc<FloorPlanData> {
        &self.data
    }

    /// Options pre-filled with this feature's viewer settings.
    pub fn viewer_options(&self) -> ViewerOptions {
        ViewerOptions::new().with_settings(self.settings.clone())
    }

    /// Creates a viewer on `host` and returns its id.
    pub fn add_viewer(&mut self, host: Arc<dyn SurfaceHost>, options: ViewerOptions) -> String {
        let id = generate_id();
        let viewer = FloorPlanViewer::new(self.data.clone(), host, options);
        self.viewers.insert(id.clone(), viewer);
        tracing::debug!("Added viewer {} ({} total)", id, self.viewers.len());
        id
    }

    pub fn viewer(&self, id: &str) -> Option<&FloorPlanViewer> {
        self.viewers.get(id)
    }

    pub fn viewer_mut(&mut self, id: &str) -> Option<&mut FloorPlanViewer> {
        self.viewers.get_mut(id)
    }

    /// Disposes and forgets a viewer. Returns `false` for an unknown id.
    pub fn remove_viewer(&mut self, id: &str) -> bool {
        match self.viewers.remove(id) {
            Some(mut viewer) => {
                viewer.dispose();
                tracing::debug!("Removed viewer {}", id);
                true
            }
            None => false,
        }
    }

    pub fn viewer_ids(&self) -> impl Iterator<Item = &str> {
        self.viewers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.viewers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.viewers.is_empty()
    }
}

impl Drop for SynoptiqueFeature {
    fn drop(&mut self) {
        for (_, mut viewer) in std::mem::take(&mut self.viewers) {
            viewer.dispose();
        }
    }
}
