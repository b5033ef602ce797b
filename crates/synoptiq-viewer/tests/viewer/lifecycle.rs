use crate::fixtures::*;
use synoptiq_core::{ActiveFilters, AttributeValue, Palette};
use synoptiq_viewer::{SynoptiqueFeature, ViewerOptions};

#[tokio::test]
async fn test_dispose_detaches_and_unsubscribes() {
    let data = loaded().await;
    let baseline = data.events().subscriber_count();
    let (host, mut viewer) = open(&data, ViewerOptions::new());
    assert!(data.events().subscriber_count() > baseline);

    viewer.dispose();
    assert!(viewer.is_disposed());
    assert!(!host.is_attached());
    assert_eq!(data.events().subscriber_count(), baseline);

    // Later notifications reach nobody and nothing panics
    data.set_active_filters(ActiveFilters::new());
    viewer.draw();
    viewer.dispose();
}

#[tokio::test]
async fn test_drop_disposes() {
    let data = loaded().await;
    let (host, viewer) = open(&data, ViewerOptions::new());
    drop(viewer);
    assert!(!host.is_attached());
    assert_eq!(data.events().subscriber_count(), 0);
}

#[tokio::test]
async fn test_viewers_share_data_but_not_state() {
    let data = loaded().await;
    let (synoptique_id, category_id) = synoptique(&data, "#ff0000").await;
    let (left_host, left) = open(&data, ViewerOptions::new().with_floor(1));
    let (right_host, right) = open(&data, ViewerOptions::new().with_synoptique(&synoptique_id));

    left.on_wheel(&synoptiq_viewer::WheelEvent {
        x: 10.0,
        y: 10.0,
        delta_y: -1.0,
    });
    assert_ne!(left.camera(), right.camera());

    data.assign_category_to_feature(&synoptique_id, Some(category_id.as_str()), "A");
    assert_eq!(pixel(&right_host, A_CENTER), synoptiq_core::Rgba::opaque(255, 0, 0));
    // The left viewer has no synoptique selected
    assert_ne!(left_host.pixel(30, 50), right_host.pixel(30, 50));
}

#[tokio::test]
async fn test_registry_with_palette() {
    let store = store_with(features_json(), metadata_json());
    let mut config = synoptiq_settings::Config::default();
    config.viewer = synoptiq_settings::ViewerSettings::for_palette(Palette::Dark);
    let mut feature = SynoptiqueFeature::from_config(store, &config);
    feature.data().load_data(&paths(), "token").await.unwrap();

    let host = std::sync::Arc::new(synoptiq_viewer::PixmapHost::new(WIDTH, HEIGHT));
    let id = feature.add_viewer(host.clone(), feature.viewer_options().with_floor(2));
    let viewer = feature.viewer(&id).unwrap();
    assert_eq!(viewer.get_feature_at_point(25.0, 5.0), Some("B".to_string()));
    assert_eq!(viewer.floor_id(), Some(AttributeValue::from(2)));

    assert!(feature.remove_viewer(&id));
    assert!(!host.is_attached());
}

#[tokio::test]
async fn test_invalid_settings_fall_back_to_defaults() {
    let data = loaded().await;
    let mut settings = synoptiq_settings::ViewerSettings::default();
    settings.min_scale = -1.0;
    let (_host, viewer) = open(&data, ViewerOptions::new().with_settings(settings));
    assert_eq!(viewer.camera().scale(), 2.0);
}
