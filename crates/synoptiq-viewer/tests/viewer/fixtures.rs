use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use synoptiq_core::Rgba;
use synoptiq_data::{DataPaths, FloorPlanData, MemoryFileStore, PersistTarget};
use synoptiq_viewer::{FloorPlanViewer, PixmapHost, PointerEvent, ViewerOptions};

pub const WIDTH: u32 = 100;
pub const HEIGHT: u32 = 100;

/// Room A spans 0..10 on floor 1, room B spans 20..30 on floor 2.
///
/// With a 100x100 host and 20 px padding the fitted camera has scale 2 and
/// translation (20, 40): A's centre lands on (30, 50) and B's on (70, 50).
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

pub const A_CENTER: (f64, f64) = (30.0, 50.0);
pub const B_CENTER: (f64, f64) = (70.0, 50.0);

pub fn paths() -> DataPaths {
    DataPaths {
        attributes: Some("plan/attributes.json".to_string()),
        features: Some("plan/features.json".to_string()),
        metadata: Some("plan/metadata.json".to_string()),
        selections: None,
        templates: None,
    }
}

pub fn store_with(features: Value, metadata: Value) -> Arc<MemoryFileStore> {
    Arc::new(
        MemoryFileStore::new()
            .with_file("plan/attributes.json", json!([]))
            .with_file("plan/features.json", features)
            .with_file("plan/metadata.json", metadata),
    )
}

pub fn target() -> PersistTarget {
    PersistTarget::new("exercise-1", "model-1", "token")
}

pub fn unloaded() -> Arc<FloorPlanData> {
    Arc::new(FloorPlanData::new(store_with(features_json(), metadata_json())))
}

pub async fn loaded() -> Arc<FloorPlanData> {
    let data = unloaded();
    data.load_data(&paths(), "token").await.unwrap();
    data
}

/// Adds a synoptique with one category and returns their ids.
pub async fn synoptique(data: &FloorPlanData, color: &str) -> (String, String) {
    let synoptique_id = data
        .add_synoptique("Usage", &target())
        .await
        .unwrap()
        .unwrap();
    let category = data
        .add_category_to_synoptique(&synoptique_id, "Office", color, &target())
        .await
        .unwrap();
    (synoptique_id, category.id)
}

pub fn open(data: &Arc<FloorPlanData>, options: ViewerOptions) -> (Arc<PixmapHost>, FloorPlanViewer) {
    let host = Arc::new(PixmapHost::new(WIDTH, HEIGHT));
    let viewer = FloorPlanViewer::new(data.clone(), host.clone(), options);
    (host, viewer)
}

pub fn pixel(host: &PixmapHost, (x, y): (f64, f64)) -> Rgba {
    host.pixel(x as u32, y as u32).unwrap()
}

pub fn assert_close(actual: Rgba, expected: Rgba) {
    let near = |a: u8, b: u8| (a as i16 - b as i16).abs() <= 2;
    assert!(
        near(actual.r, expected.r)
            && near(actual.g, expected.g)
            && near(actual.b, expected.b)
            && near(actual.a, expected.a),
        "{actual} != {expected}"
    );
}

/// Press and release at the same spot, quickly enough to be a click.
pub fn click(viewer: &FloorPlanViewer, (x, y): (f64, f64), secondary: bool) {
    let down = if secondary {
        PointerEvent::secondary(x, y)
    } else {
        PointerEvent::primary(x, y)
    };
    viewer.on_pointer_down(&down);
    let up = down.after(&down, Duration::from_millis(50));
    viewer.on_pointer_up(&up);
}
