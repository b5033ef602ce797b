use crate::fixtures::*;
use std::time::Duration;
use synoptiq_core::ActiveFilters;
use synoptiq_viewer::{
    Cursor, InteractionState, KeyEvent, PointerButton, PointerEvent, ViewerOptions, WheelEvent,
};

async fn assigning() -> (
    std::sync::Arc<synoptiq_data::FloorPlanData>,
    String,
    String,
    std::sync::Arc<synoptiq_viewer::PixmapHost>,
    synoptiq_viewer::FloorPlanViewer,
) {
    let data = loaded().await;
    let (synoptique_id, category_id) = synoptique(&data, "#ff0000").await;
    let (host, viewer) = open(
        &data,
        ViewerOptions::new()
            .with_synoptique(&synoptique_id)
            .with_category(&category_id),
    );
    (data, synoptique_id, category_id, host, viewer)
}

fn category_of(data: &synoptiq_data::FloorPlanData, synoptique_id: &str, feature: &str) -> Option<String> {
    data.get_synoptique(synoptique_id)
        .and_then(|s| s.mapping.get(feature).cloned())
}

#[tokio::test]
async fn test_click_assigns() {
    let (data, synoptique_id, category_id, host, viewer) = assigning().await;
    assert_eq!(viewer.cursor(), Cursor::Crosshair);
    assert_eq!(host.cursor(), Some(Cursor::Crosshair));

    click(&viewer, A_CENTER, false);
    assert_eq!(category_of(&data, &synoptique_id, "A"), Some(category_id));
    assert_eq!(viewer.interaction_state(), InteractionState::Idle);
}

#[tokio::test]
async fn test_slow_click_does_nothing() {
    let (data, synoptique_id, _, _host, viewer) = assigning().await;
    let down = PointerEvent::primary(A_CENTER.0, A_CENTER.1);
    viewer.on_pointer_down(&down);
    viewer.on_pointer_up(&down.after(&down, Duration::from_millis(400)));
    assert_eq!(category_of(&data, &synoptique_id, "A"), None);
}

#[tokio::test]
async fn test_click_on_empty_space_does_nothing() {
    let (data, synoptique_id, _, _host, viewer) = assigning().await;
    click(&viewer, (50.0, 50.0), false);
    assert!(data.get_synoptique(&synoptique_id).unwrap().mapping.is_empty());
}

#[tokio::test]
async fn test_drag_assigns_every_feature_crossed() {
    let (data, synoptique_id, category_id, _host, viewer) = assigning().await;
    viewer.on_pointer_down(&PointerEvent::primary(25.0, 50.0));
    assert_eq!(viewer.interaction_state(), InteractionState::Assigning);

    viewer.on_pointer_move(&PointerEvent::primary(30.0, 50.0));
    assert!(viewer.is_dragging());
    assert_eq!(category_of(&data, &synoptique_id, "A"), Some(category_id.clone()));

    viewer.on_pointer_move(&PointerEvent::primary(50.0, 50.0));
    viewer.on_pointer_move(&PointerEvent::primary(70.0, 50.0));
    assert_eq!(category_of(&data, &synoptique_id, "B"), Some(category_id));

    viewer.on_pointer_up(&PointerEvent::primary(70.0, 50.0));
    assert!(!viewer.is_dragging());
    assert_eq!(viewer.interaction_state(), InteractionState::Idle);
}

#[tokio::test]
async fn test_drag_within_one_feature_mutates_once() {
    let (data, synoptique_id, _, _host, viewer) = assigning().await;
    let events = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = events.clone();
    let _subscription = data.events().subscribe_scoped(
        synoptiq_core::EventFilter::Categories(vec![synoptiq_core::EventCategory::Mapping]),
        move |_| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        },
    );

    viewer.on_pointer_down(&PointerEvent::primary(22.0, 45.0));
    for x in [26.0, 28.0, 30.0, 32.0, 34.0] {
        viewer.on_pointer_move(&PointerEvent::primary(x, 50.0));
    }
    viewer.on_pointer_up(&PointerEvent::primary(34.0, 50.0));

    assert_eq!(events.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert!(category_of(&data, &synoptique_id, "A").is_some());
}

#[tokio::test]
async fn test_secondary_click_unassigns() {
    let (data, synoptique_id, category_id, _host, viewer) = assigning().await;
    data.assign_category_to_feature(&synoptique_id, Some(category_id.as_str()), "A");

    let down = PointerEvent::secondary(A_CENTER.0, A_CENTER.1);
    assert!(viewer.on_pointer_down(&down).prevent_default);
    assert_eq!(viewer.cursor(), Cursor::Cell);
    assert!(viewer.on_context_menu(PointerButton::Secondary).prevent_default);
    viewer.on_pointer_up(&down.after(&down, Duration::from_millis(30)));

    assert_eq!(category_of(&data, &synoptique_id, "A"), None);
}

#[tokio::test]
async fn test_secondary_drag_unassigns() {
    let (data, synoptique_id, category_id, _host, viewer) = assigning().await;
    data.assign_category_to_feature(&synoptique_id, Some(category_id.as_str()), "A");
    data.assign_category_to_feature(&synoptique_id, Some(category_id.as_str()), "B");

    viewer.on_pointer_down(&PointerEvent::secondary(25.0, 50.0));
    viewer.on_pointer_move(&PointerEvent::secondary(30.0, 50.0));
    viewer.on_pointer_move(&PointerEvent::secondary(70.0, 50.0));
    viewer.on_pointer_up(&PointerEvent::secondary(70.0, 50.0));

    assert!(data.get_synoptique(&synoptique_id).unwrap().mapping.is_empty());
}

#[tokio::test]
async fn test_without_category_primary_is_idle() {
    let data = loaded().await;
    let (synoptique_id, _) = synoptique(&data, "#ff0000").await;
    let (_host, viewer) = open(&data, ViewerOptions::new().with_synoptique(&synoptique_id));

    assert_eq!(viewer.cursor(), Cursor::Default);
    click(&viewer, A_CENTER, false);
    assert!(data.get_synoptique(&synoptique_id).unwrap().mapping.is_empty());
}

#[tokio::test]
async fn test_filtered_out_features_are_not_assigned() {
    let (data, synoptique_id, _, _host, viewer) = assigning().await;
    data.set_active_filters(ActiveFilters::new().with("unit_type", vec!["lab".into()]));
    click(&viewer, A_CENTER, false);
    assert_eq!(category_of(&data, &synoptique_id, "A"), None);
}

#[tokio::test]
async fn test_space_pans() {
    let (data, synoptique_id, _, _host, viewer) = assigning().await;
    let before = viewer.camera().translation();

    assert!(viewer.on_key_down(&KeyEvent::space()).prevent_default);
    assert_eq!(viewer.cursor(), Cursor::Grab);

    viewer.on_pointer_down(&PointerEvent::primary(30.0, 50.0));
    assert_eq!(viewer.interaction_state(), InteractionState::Panning);
    assert_eq!(viewer.cursor(), Cursor::Grabbing);
    viewer.on_pointer_move(&PointerEvent::primary(40.0, 45.0));
    viewer.on_pointer_up(&PointerEvent::primary(40.0, 45.0));

    let after = viewer.camera().translation();
    assert_eq!((after.0 - before.0, after.1 - before.1), (10.0, -5.0));
    assert!(data.get_synoptique(&synoptique_id).unwrap().mapping.is_empty());

    viewer.on_key_up(&KeyEvent::space());
    assert_eq!(viewer.cursor(), Cursor::Crosshair);
}

#[tokio::test]
async fn test_wheel_zooms_around_pointer() {
    let (_data, _, _, _host, viewer) = assigning().await;
    let camera = viewer.camera();
    let anchor = camera.screen_to_world(30.0, 50.0);

    assert!(
        viewer
            .on_wheel(&WheelEvent {
                x: 30.0,
                y: 50.0,
                delta_y: -1.0
            })
            .prevent_default
    );
    let zoomed = viewer.camera();
    assert!((zoomed.scale() - camera.scale() * 1.1).abs() < 1e-9);
    let (x, y) = zoomed.screen_to_world(30.0, 50.0);
    assert!((x - anchor.0).abs() < 1e-9 && (y - anchor.1).abs() < 1e-9);

    viewer.on_wheel(&WheelEvent {
        x: 30.0,
        y: 50.0,
        delta_y: 3.0,
    });
    assert!((viewer.camera().scale() - camera.scale() * 1.1 * 0.9).abs() < 1e-9);
}

#[tokio::test]
async fn test_leave_cancels_stroke() {
    let (data, synoptique_id, _, _host, viewer) = assigning().await;
    viewer.on_pointer_down(&PointerEvent::primary(22.0, 50.0));
    viewer.on_pointer_leave();
    assert_eq!(viewer.interaction_state(), InteractionState::Idle);

    viewer.on_pointer_move(&PointerEvent::primary(30.0, 50.0));
    assert!(data.get_synoptique(&synoptique_id).unwrap().mapping.is_empty());
}

#[tokio::test]
async fn test_selecting_synoptique_clears_category() {
    let (data, synoptique_id, category_id, _host, viewer) = assigning().await;
    assert_eq!(viewer.selected_category(), Some(category_id.clone()));

    let (other_id, _) = synoptique(&data, "#00ff00").await;
    viewer.set_selected_synoptique(Some(other_id.as_str()));
    assert_eq!(viewer.selected_synoptique(), Some(other_id));
    assert_eq!(viewer.selected_category(), None);
    assert_eq!(viewer.cursor(), Cursor::Default);

    viewer.set_selected_synoptique(Some(synoptique_id.as_str()));
    viewer.set_selected_category(Some(category_id.as_str()));
    assert_eq!(viewer.cursor(), Cursor::Crosshair);

    viewer.set_selected_synoptique(None);
    assert!(!viewer.on_context_menu(PointerButton::Secondary).prevent_default);
}

#[tokio::test]
async fn test_reselecting_same_synoptique_keeps_category() {
    let (data, synoptique_id, category_id, _host, viewer) = assigning().await;

    viewer.set_selected_synoptique(Some(synoptique_id.as_str()));
    assert_eq!(viewer.selected_category(), Some(category_id.clone()));
    assert_eq!(viewer.cursor(), Cursor::Crosshair);

    click(&viewer, A_CENTER, false);
    assert_eq!(category_of(&data, &synoptique_id, "A"), Some(category_id));
}
