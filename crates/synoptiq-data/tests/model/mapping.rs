use synoptiq_core::DataEvent;
use synoptiq_data::FloorPlanData;

use crate::fixtures::{self, Recorder};

async fn with_category() -> (FloorPlanData, String, String) {
    let (_store, data) = fixtures::loaded().await;
    let target = fixtures::target();
    let synoptique_id = data
        .add_synoptique("Usage", &target)
        .await
        .unwrap()
        .unwrap();
    let category = data
        .add_category_to_synoptique(&synoptique_id, "Office", "#ff0000", &target)
        .await
        .unwrap();
    (data, synoptique_id, category.id)
}

#[tokio::test]
async fn assignment_is_idempotent() {
    let (data, s, c) = with_category().await;
    let recorder = Recorder::attach(&data);

    assert!(data.assign_category_to_feature(&s, Some(c.as_str()), "A"));
    let after_first = data.get_synoptique(&s).unwrap().mapping;
    assert!(!data.assign_category_to_feature(&s, Some(c.as_str()), "A"));
    assert_eq!(data.get_synoptique(&s).unwrap().mapping, after_first);

    let events = recorder.take();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], DataEvent::CategoryMappingChanged(_)));
}

#[tokio::test]
async fn clearing_removes_the_entry() {
    let (data, s, c) = with_category().await;

    assert!(data.assign_category_to_feature(&s, Some(c.as_str()), "A"));
    assert!(data.assign_category_to_feature(&s, None, "A"));
    assert!(!data.get_synoptique(&s).unwrap().mapping.contains_key("A"));

    // Clearing an absent entry is not a change.
    assert!(!data.assign_category_to_feature(&s, None, "A"));
}

#[tokio::test]
async fn mapping_event_carries_full_list() {
    let (data, s, c) = with_category().await;
    let recorder = Recorder::attach(&data);

    data.assign_category_to_feature(&s, Some(c.as_str()), "B");

    match recorder.take().as_slice() {
        [DataEvent::CategoryMappingChanged(list)] => {
            assert_eq!(list.len(), 1);
            assert_eq!(list[0].mapping.get("B"), Some(&c));
        }
        other => panic!("unexpected events: {:?}", other),
    }
}

#[tokio::test]
async fn invalid_arguments_have_no_side_effects() {
    let (data, s, c) = with_category().await;
    let recorder = Recorder::attach(&data);

    assert!(!data.assign_category_to_feature("unknown", Some(c.as_str()), "A"));
    assert!(!data.assign_category_to_feature(&s, Some(c.as_str()), ""));
    assert!(!data.assign_category_to_feature(&s, Some("no-such-category"), "A"));
    assert!(!data.assign_category_to_feature("", None, "A"));

    assert!(data.get_synoptique(&s).unwrap().mapping.is_empty());
    assert!(recorder.take().is_empty());
}

#[tokio::test]
async fn assignment_does_not_save_until_asked() {
    let (store, data) = fixtures::loaded().await;
    let target = fixtures::target();
    let s = data.add_synoptique("Usage", &target).await.unwrap().unwrap();
    let c = data
        .add_category_to_synoptique(&s, "Office", "#ff0000", &target)
        .await
        .unwrap();
    let saves = store.save_count();

    data.assign_category_to_feature(&s, Some(c.id.as_str()), "A");
    assert_eq!(store.save_count(), saves);

    data.save_attributes(&target).await.unwrap();
    let saved = store.last_save().unwrap();
    assert_eq!(saved.relative_path, "ais/attributes");
    assert_eq!(saved.file_name, "model-1");
    assert_eq!(saved.data[0]["mapping"]["A"], serde_json::json!(c.id));
}
