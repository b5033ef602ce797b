use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use synoptiq_core::{DataEvent, EventFilter, Subscription};
use synoptiq_data::{DataPaths, FloorPlanData, MemoryFileStore, PersistTarget};

pub fn features_json() -> Value {
    json!({
        "vertices": [
            [0, 0], [10, 0], [10, 10], [0, 10],
            [20, 0], [30, 0], [30, 10], [20, 10]
        ],
        "features": {
            "A": {"polygons": [{"shell": [0, 1, 2, 3]}]},
            "B": {"polygons": [{"shell": [4, 5, 6, 7]}]}
        }
    })
}

pub fn metadata_json() -> Value {
    json!([
        {"id": "A", "floor_id": 1, "unit_type": "office"},
        {"id": "B", "floor_id": 2, "unit_type": "lab"}
    ])
}

pub fn paths() -> DataPaths {
    DataPaths {
        attributes: Some("plan/attributes.json".to_string()),
        features: Some("plan/features.json".to_string()),
        metadata: Some("plan/metadata.json".to_string()),
        selections: Some("plan/selections.json".to_string()),
        templates: Some("plan/templates.json".to_string()),
    }
}

pub fn store() -> Arc<MemoryFileStore> {
    Arc::new(
        MemoryFileStore::new()
            .with_file("plan/attributes.json", json!([]))
            .with_file("plan/features.json", features_json())
            .with_file("plan/metadata.json", metadata_json())
            .with_file("plan/selections.json", json!({"recent": []}))
            .with_file("plan/templates.json", json!([])),
    )
}

pub fn target() -> PersistTarget {
    PersistTarget::new("exercise-1", "model-1", "token")
}

pub async fn loaded() -> (Arc<MemoryFileStore>, FloorPlanData) {
    let store = store();
    let data = FloorPlanData::new(store.clone());
    data.load_data(&paths(), "token").await.unwrap();
    (store, data)
}

/// Records every event published on a model's bus.
pub struct Recorder {
    pub events: Arc<Mutex<Vec<DataEvent>>>,
    _subscription: Subscription,
}

impl Recorder {
    pub fn attach(data: &FloorPlanData) -> Self {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let subscription = data
            .events()
            .subscribe_scoped(EventFilter::All, move |event| sink.lock().push(event.clone()));
        Self {
            events,
            _subscription: subscription,
        }
    }

    pub fn take(&self) -> Vec<DataEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}
