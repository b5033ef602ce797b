use crate::fixtures::*;
use proptest::prelude::*;
use synoptiq_viewer::{Camera, ViewerOptions};

#[test]
fn test_fit_to_bounds_centres_content() {
    let mut camera = Camera::new(100.0, 100.0);
    assert!(camera.fit_to_bounds(0.0, 0.0, 30.0, 10.0, 20.0));
    assert_eq!(camera.scale(), 2.0);
    assert_eq!(camera.translation(), (20.0, 40.0));
    assert_eq!(camera.world_to_screen(15.0, 5.0), (50.0, 50.0));
}

#[test]
fn test_fit_to_degenerate_bounds_is_noop() {
    let mut camera = Camera::new(100.0, 100.0);
    assert!(!camera.fit_to_bounds(5.0, 0.0, 5.0, 10.0, 20.0));
    assert!(!camera.fit_to_bounds(0.0, 3.0, 10.0, 3.0, 20.0));
    assert_eq!(camera, Camera::new(100.0, 100.0));
}

#[test]
fn test_zoom_is_clamped() {
    let mut camera = Camera::new(100.0, 100.0);
    for _ in 0..200 {
        camera.zoom_at(10.0, 10.0, 1.1, 0.1, 1000.0);
    }
    assert_eq!(camera.scale(), 1000.0);

    for _ in 0..400 {
        camera.zoom_at(10.0, 10.0, 0.9, 0.1, 1000.0);
    }
    assert_eq!(camera.scale(), 0.1);
}

#[test]
fn test_resize_keeps_centre() {
    let mut camera = Camera::new(100.0, 100.0);
    camera.fit_to_bounds(0.0, 0.0, 30.0, 10.0, 20.0);
    let centre = camera.screen_to_world(50.0, 50.0);

    camera.resize(300.0, 160.0);
    assert_eq!(camera.size(), (300.0, 160.0));
    assert_eq!(camera.screen_to_world(150.0, 80.0), centre);
    assert_eq!(camera.scale(), 2.0);
}

#[tokio::test]
async fn test_viewer_centres_on_load() {
    let data = loaded().await;
    let (_host, viewer) = open(&data, ViewerOptions::new());
    let camera = viewer.camera();
    assert_eq!(camera.scale(), 2.0);
    assert_eq!(camera.translation(), (20.0, 40.0));
}

#[tokio::test]
async fn test_viewer_built_before_load_centres_once_loaded() {
    let data = unloaded();
    let (host, viewer) = open(&data, ViewerOptions::new());
    assert_eq!(viewer.camera().scale(), 1.0);

    data.load_data(&paths(), "token").await.unwrap();
    assert_eq!(viewer.camera().scale(), 2.0);
    assert!(pixel(&host, A_CENTER).a > 0);

    // A reload keeps the user's camera
    viewer.on_wheel(&synoptiq_viewer::WheelEvent {
        x: 50.0,
        y: 50.0,
        delta_y: -1.0,
    });
    data.load_data(&paths(), "token").await.unwrap();
    assert!((viewer.camera().scale() - 2.2).abs() < 1e-9);
}

#[tokio::test]
async fn test_handle_resize() {
    let data = loaded().await;
    let (host, viewer) = open(&data, ViewerOptions::new());
    host.set_client_size(200, 100);
    viewer.handle_resize();

    let camera = viewer.camera();
    assert_eq!(camera.size(), (200.0, 100.0));
    assert_eq!(camera.world_to_screen(15.0, 5.0), (100.0, 50.0));
    assert_eq!(host.snapshot().map(|p| p.width()), Some(200));
    assert!(pixel(&host, (80.0, 50.0)).a > 0);
}

#[tokio::test]
async fn test_center_view_restores_fit() {
    let data = loaded().await;
    let (_host, viewer) = open(&data, ViewerOptions::new());
    viewer.on_wheel(&synoptiq_viewer::WheelEvent {
        x: 0.0,
        y: 0.0,
        delta_y: 1.0,
    });
    assert_ne!(viewer.camera().scale(), 2.0);

    assert!(viewer.center_view());
    assert_eq!(viewer.camera().translation(), (20.0, 40.0));
}

proptest! {
    #[test]
    fn prop_screen_world_round_trip(
        scale in 0.1f64..1000.0,
        tx in -1.0e4f64..1.0e4,
        ty in -1.0e4f64..1.0e4,
        x in -1.0e4f64..1.0e4,
        y in -1.0e4f64..1.0e4,
    ) {
        let mut camera = Camera::new(800.0, 600.0);
        camera.set_transform(scale, tx, ty);
        let (sx, sy) = camera.world_to_screen(x, y);
        let (wx, wy) = camera.screen_to_world(sx, sy);
        let tolerance = 1e-6 * (1.0 + x.abs().max(y.abs()));
        prop_assert!((wx - x).abs() <= tolerance);
        prop_assert!((wy - y).abs() <= tolerance);
    }

    #[test]
    fn prop_zoom_keeps_anchor(
        factor in 0.5f64..2.0,
        sx in 0.0f64..800.0,
        sy in 0.0f64..600.0,
    ) {
        let mut camera = Camera::new(800.0, 600.0);
        camera.set_transform(3.0, 12.0, -40.0);
        let before = camera.screen_to_world(sx, sy);
        camera.zoom_at(sx, sy, factor, 0.1, 1000.0);
        let after = camera.screen_to_world(sx, sy);
        prop_assert!((before.0 - after.0).abs() < 1e-6);
        prop_assert!((before.1 - after.1).abs() < 1e-6);
    }
}
