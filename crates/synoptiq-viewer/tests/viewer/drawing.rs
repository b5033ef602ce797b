use crate::fixtures::*;
use synoptiq_core::{ActiveFilters, Rgba};
use synoptiq_viewer::ViewerOptions;

const RED: Rgba = Rgba::opaque(255, 0, 0);

#[tokio::test]
async fn test_default_fill_without_synoptique() {
    let data = loaded().await;
    let (host, _viewer) = open(&data, ViewerOptions::new());
    assert_close(pixel(&host, A_CENTER), Rgba::new(150, 150, 150, 77));
    assert_close(pixel(&host, B_CENTER), Rgba::new(150, 150, 150, 77));
    assert_eq!(pixel(&host, (50.0, 50.0)).a, 0);
}

#[tokio::test]
async fn test_category_color_fill() {
    let data = loaded().await;
    let (synoptique_id, category_id) = synoptique(&data, "#ff0000").await;
    assert!(data.assign_category_to_feature(&synoptique_id, Some(category_id.as_str()), "A"));

    let (host, _viewer) = open(&data, ViewerOptions::new().with_synoptique(&synoptique_id));
    assert_eq!(pixel(&host, A_CENTER), RED);
    // Unassigned features are outlines only
    assert_eq!(pixel(&host, B_CENTER).a, 0);
}

#[tokio::test]
async fn test_filtered_out_feature_is_muted() {
    let data = loaded().await;
    let (synoptique_id, category_id) = synoptique(&data, "#ff0000").await;
    data.assign_category_to_feature(&synoptique_id, Some(category_id.as_str()), "A");
    let (host, _viewer) = open(&data, ViewerOptions::new().with_synoptique(&synoptique_id));
    assert_eq!(pixel(&host, A_CENTER), RED);

    data.set_active_filters(ActiveFilters::new().with("unit_type", vec!["lab".into()]));
    assert_eq!(pixel(&host, A_CENTER).a, 0);

    data.set_active_filters(ActiveFilters::new());
    assert_eq!(pixel(&host, A_CENTER), RED);
}

#[tokio::test]
async fn test_other_floor_is_not_drawn() {
    let data = loaded().await;
    let (host, _viewer) = open(&data, ViewerOptions::new().with_floor(1));
    assert_close(pixel(&host, A_CENTER), Rgba::new(150, 150, 150, 77));
    // Room B and its border are absent
    assert_eq!(pixel(&host, B_CENTER).a, 0);
    assert_eq!(pixel(&host, (60.0, 50.0)).a, 0);
}

#[tokio::test]
async fn test_mapping_change_redraws() {
    let data = loaded().await;
    let (synoptique_id, category_id) = synoptique(&data, "#ff0000").await;
    let (host, _viewer) = open(&data, ViewerOptions::new().with_synoptique(&synoptique_id));
    assert_eq!(pixel(&host, B_CENTER).a, 0);

    data.assign_category_to_feature(&synoptique_id, Some(category_id.as_str()), "B");
    assert_eq!(pixel(&host, B_CENTER), RED);

    data.assign_category_to_feature(&synoptique_id, None, "B");
    assert_eq!(pixel(&host, B_CENTER).a, 0);
}

#[tokio::test]
async fn test_category_removal_redraws() {
    let data = loaded().await;
    let (synoptique_id, category_id) = synoptique(&data, "#ff0000").await;
    data.assign_category_to_feature(&synoptique_id, Some(category_id.as_str()), "A");
    let (host, _viewer) = open(&data, ViewerOptions::new().with_synoptique(&synoptique_id));

    assert!(data
        .remove_category_from_synoptique(&synoptique_id, &category_id, &target())
        .await
        .unwrap());
    assert_eq!(pixel(&host, A_CENTER).a, 0);
}

#[tokio::test]
async fn test_unparsable_category_color_uses_fallback() {
    let data = loaded().await;
    let (synoptique_id, category_id) = synoptique(&data, "not-a-color").await;
    data.assign_category_to_feature(&synoptique_id, Some(category_id.as_str()), "A");
    let (host, _viewer) = open(&data, ViewerOptions::new().with_synoptique(&synoptique_id));
    assert_eq!(pixel(&host, A_CENTER), Rgba::opaque(128, 128, 128));
}

#[tokio::test]
async fn test_clear_data_blanks_surface() {
    let data = loaded().await;
    let (host, _viewer) = open(&data, ViewerOptions::new());
    assert!(pixel(&host, A_CENTER).a > 0);

    data.clear_data();
    assert_eq!(pixel(&host, A_CENTER).a, 0);
}

#[tokio::test]
async fn test_png_export() {
    let data = loaded().await;
    let (host, _viewer) = open(&data, ViewerOptions::new());
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("floor.png");
    host.save_png(&path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
}
