use serde_json::json;
use std::sync::Arc;
use synoptiq_core::{ActiveFilters, AttributeValue, DataError, DataEvent, Error};
use synoptiq_data::{DataPaths, FloorPlanData, MemoryFileStore};

use crate::fixtures::{self, Recorder};

#[tokio::test]
async fn load_fills_every_slot_and_signals_once() {
    let store = fixtures::store();
    let data = FloorPlanData::new(store);
    let recorder = Recorder::attach(&data);

    data.load_data(&fixtures::paths(), "token").await.unwrap();

    let loaded = data.get_data();
    assert_eq!(loaded.attributes, Some(vec![]));
    assert_eq!(loaded.features.map(|f| f.len()), Some(2));
    assert_eq!(loaded.metadata.map(|m| m.len()), Some(2));
    assert_eq!(loaded.selections, Some(json!({"recent": []})));
    assert_eq!(loaded.templates, Some(json!([])));
    assert_eq!(recorder.take(), vec![DataEvent::ContentsLoaded]);
}

#[tokio::test]
async fn missing_paths_leave_slots_empty() {
    let data = FloorPlanData::new(fixtures::store());
    let paths = DataPaths {
        features: Some("plan/features.json".to_string()),
        ..Default::default()
    };

    data.load_data(&paths, "token").await.unwrap();

    let loaded = data.get_data();
    assert!(loaded.features.is_some());
    assert!(loaded.attributes.is_none());
    assert!(loaded.metadata.is_none());
    assert!(data.get_synoptiques().is_empty());
}

#[tokio::test]
async fn failed_fetch_propagates_without_signal() {
    let store = fixtures::store();
    store.fail_fetch("plan/metadata.json");
    let data = FloorPlanData::new(store);
    let recorder = Recorder::attach(&data);

    let err = data.load_data(&fixtures::paths(), "token").await.unwrap_err();
    assert!(matches!(err, Error::Data(DataError::Fetch { .. })));

    // Slots fetched before the failure keep their value.
    assert!(data.get_data().features.is_some());
    assert!(data.get_data().metadata.is_none());
    assert!(recorder.take().is_empty());
}

#[tokio::test]
async fn malformed_geometry_is_a_decode_error() {
    let store = Arc::new(
        MemoryFileStore::new().with_file("features.json", json!({"vertices": "nope"})),
    );
    let data = FloorPlanData::new(store);
    let paths = DataPaths {
        features: Some("features.json".to_string()),
        ..Default::default()
    };

    let err = data.load_data(&paths, "token").await.unwrap_err();
    assert!(matches!(err, Error::Data(DataError::Decode { .. })));
}

#[tokio::test]
async fn clear_data_resets_slots_and_filters() {
    let (_store, data) = fixtures::loaded().await;
    data.set_active_filters(ActiveFilters::new().with("unit_type", vec!["lab".into()]));
    let recorder = Recorder::attach(&data);

    data.clear_data();

    assert!(!data.is_loaded());
    assert!(data.get_data().metadata.is_none());
    assert!(data.active_filters().is_empty());
    assert!(data.get_unique_floor_ids().is_empty());
    assert_eq!(recorder.take(), vec![DataEvent::DataCleared]);
}

#[tokio::test]
async fn filters_replace_and_signal_with_payload() {
    let (_store, data) = fixtures::loaded().await;
    let recorder = Recorder::attach(&data);

    let filters = ActiveFilters::new().with("floor_id", vec![AttributeValue::from(1)]);
    data.set_active_filters(filters.clone());

    assert_eq!(data.active_filters(), filters);
    assert_eq!(recorder.take(), vec![DataEvent::FiltersChanged(filters)]);
}

#[tokio::test]
async fn floor_ids_are_exact_tokens() {
    let store = Arc::new(MemoryFileStore::new().with_file(
        "metadata.json",
        json!([
            {"id": "a", "floor_id": 1},
            {"id": "b", "floor_id": "1"}
        ]),
    ));
    let data = FloorPlanData::new(store);
    let paths = DataPaths {
        metadata: Some("metadata.json".to_string()),
        ..Default::default()
    };
    data.load_data(&paths, "token").await.unwrap();

    // A number and a string are different floors.
    assert_eq!(data.get_unique_floor_ids().len(), 2);
}
