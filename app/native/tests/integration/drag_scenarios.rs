//! End-to-end drags and resizes through the layout actor.

use std::time::{Duration, Instant};

use dashgrid_lib::config::DragConfig;
use dashgrid_lib::drag::{DragController, DragError, DragPhase};
use dashgrid_lib::grid::{
    GridCell, GridMetrics, Point, WidgetSize, default_catalog, default_layout, find_position,
    layout_bottom, layout_for_catalog,
};
use dashgrid_lib::store::{DragId, HostEvent, LiveRearrange};

use crate::common::{assert_valid, spawn_default};

/// Horizontal translation that moves a small widget one column right.
const ONE_COLUMN: f64 = 172.0;

// ============================================================================
// Scenario A: default layout
// ============================================================================

#[test]
fn test_default_catalog_fills_four_rows() {
    let placed = layout_for_catalog(&default_catalog());
    assert_eq!(placed, default_layout());
    assert_eq!(layout_bottom(&placed), 4);
    assert_valid(&placed);

    // Every row is a uniform small-cell row, so the content is exactly
    // padding + 4 rows + 3 gaps + padding.
    let metrics = GridMetrics::default();
    assert!((metrics.content_height(&placed) - 708.0).abs() < f64::EPSILON);
}

// ============================================================================
// Scenario B: drag onto an occupied cell
// ============================================================================

#[tokio::test]
async fn test_drag_swaps_with_occupant() {
    let (handle, host, metrics) = spawn_default();
    handle.set_edit_mode(true).unwrap();

    let mut controller = DragController::new(handle.clone(), metrics, &DragConfig::default());
    let snapshot = handle.layout().await.unwrap();
    let now = Instant::now();

    controller.begin("steps", snapshot, now).unwrap();
    controller.update(Point::new(ONE_COLUMN / 2.0, 0.0), now).unwrap();
    let committed = controller
        .end(Point::new(ONE_COLUMN, 0.0), now + Duration::from_millis(250))
        .await
        .unwrap();
    assert_eq!(committed, GridCell::new(1, 1));
    assert!(controller.phase().is_idle());

    let layout = handle.layout().await.unwrap();
    assert_valid(&layout);
    assert_eq!(find_position(&layout, "steps").unwrap().anchor(), GridCell::new(1, 1));
    assert_eq!(find_position(&layout, "water").unwrap().anchor(), GridCell::new(0, 1));
    for id in ["weather", "sleep", "mood", "focus", "tasks"] {
        let before = find_position(&default_layout(), id).unwrap().anchor();
        assert_eq!(find_position(&layout, id).unwrap().anchor(), before, "{id} moved");
    }

    let events = host.events();
    assert_eq!(
        events.last(),
        Some(&HostEvent::PositionChange { id: "steps".into(), grid_x: 1, grid_y: 1 })
    );

    handle.shutdown().unwrap();
}

#[tokio::test]
async fn test_live_preview_never_mutates_committed_layout() {
    let (handle, host, metrics) = spawn_default();
    handle.set_edit_mode(true).unwrap();

    let mut controller = DragController::new(handle.clone(), metrics, &DragConfig::default());
    let snapshot = handle.layout().await.unwrap();
    let now = Instant::now();

    controller.begin("steps", snapshot, now).unwrap();
    let sent = controller.update(Point::new(ONE_COLUMN, 0.0), now).unwrap();
    assert_eq!(sent, Some(GridCell::new(1, 1)));

    // Wait for the actor to pick the preview up from the live channel.
    let preview = tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            if let Some(preview) = handle.preview().await.unwrap() {
                break preview;
            }
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("live preview never reached the store");

    assert_eq!(preview.widget_id, "steps");
    assert_eq!(preview.target, GridCell::new(1, 1));
    assert_eq!(find_position(&preview.positions, "steps").unwrap().anchor(), GridCell::new(1, 1));
    assert_eq!(find_position(&preview.positions, "water").unwrap().anchor(), GridCell::new(0, 1));
    assert!(host.events().contains(&HostEvent::LiveRearrange { id: "steps".into(), grid_x: 1, grid_y: 1 }));

    let layout = handle.layout().await.unwrap();
    assert_eq!(layout.as_ref(), default_layout().as_slice());

    controller.cancel().unwrap();
    assert_eq!(handle.preview().await.unwrap(), None);
    assert_eq!(handle.layout().await.unwrap().as_ref(), default_layout().as_slice());
    assert!(!host.events().iter().any(|e| matches!(e, HostEvent::PositionChange { .. })));

    handle.shutdown().unwrap();
}

#[tokio::test]
async fn test_preview_after_commit_is_discarded() {
    let (handle, host, _) = spawn_default();
    let drag_id = DragId::now_v7();

    handle.set_edit_mode(true).unwrap();
    assert!(handle.begin_drag(drag_id, "mood").await.unwrap());
    let committed = handle.commit_drag(drag_id, "mood", GridCell::new(0, 2)).await.unwrap();
    assert_eq!(committed, Some(GridCell::new(0, 2)));

    // A preview for the finished drag arrives late.
    handle
        .send_live(LiveRearrange { drag_id, widget_id: "mood".into(), target: GridCell::new(0, 0) })
        .unwrap();
    tokio::task::yield_now().await;

    let layout = handle.layout().await.unwrap();
    assert_eq!(find_position(&layout, "mood").unwrap().anchor(), GridCell::new(0, 2));
    assert_eq!(find_position(&layout, "sleep").unwrap().anchor(), GridCell::new(1, 2));
    assert_eq!(handle.preview().await.unwrap(), None);

    let events = host.events();
    assert_eq!(
        events.last(),
        Some(&HostEvent::PositionChange { id: "mood".into(), grid_x: 0, grid_y: 2 })
    );

    handle.shutdown().unwrap();
}

#[tokio::test]
async fn test_drag_outside_edit_mode_is_ignored() {
    let (handle, host, metrics) = spawn_default();

    let mut controller = DragController::new(handle.clone(), metrics, &DragConfig::default());
    let snapshot = handle.layout().await.unwrap();
    let now = Instant::now();

    controller.begin("steps", snapshot, now).unwrap();
    let result = controller.end(Point::new(ONE_COLUMN, 0.0), now).await;
    assert!(matches!(result, Err(DragError::Rejected(id)) if id == "steps"));
    assert!(controller.phase().is_idle());

    assert_eq!(handle.layout().await.unwrap().as_ref(), default_layout().as_slice());
    assert!(host.events().is_empty());

    handle.shutdown().unwrap();
}

#[tokio::test]
async fn test_controller_rejects_overlapping_gestures() {
    let (handle, _, metrics) = spawn_default();
    handle.set_edit_mode(true).unwrap();

    let mut controller = DragController::new(handle.clone(), metrics, &DragConfig::default());
    let snapshot = handle.layout().await.unwrap();
    let now = Instant::now();

    controller.begin("steps", snapshot.clone(), now).unwrap();
    assert!(matches!(
        controller.begin("water", snapshot.clone(), now),
        Err(DragError::NotIdle("Dragging"))
    ));
    assert!(matches!(controller.begin("ghost", snapshot, now), Err(DragError::NotIdle(_))));

    controller.cancel().unwrap();
    assert!(matches!(controller.phase(), DragPhase::Cancelled(_)));
    controller.settle();
    assert!(controller.phase().is_idle());

    handle.shutdown().unwrap();
}

// ============================================================================
// Scenario C: resize into an occupied footprint
// ============================================================================

#[tokio::test]
async fn test_resize_relocates_to_free_rectangle() {
    let (handle, host, _) = spawn_default();

    handle.resize("tasks", WidgetSize::Large).unwrap();
    let layout = handle.layout().await.unwrap();
    assert_valid(&layout);

    let tasks = find_position(&layout, "tasks").unwrap();
    assert_eq!(tasks.size, WidgetSize::Large);
    assert_eq!((tasks.width, tasks.height), (2, 2));
    assert_eq!(tasks.anchor(), GridCell::new(0, 4));

    for before in default_layout().iter().filter(|p| p.id != "tasks") {
        assert_eq!(find_position(&layout, &before.id).unwrap().anchor(), before.anchor());
    }

    assert_eq!(
        host.events(),
        vec![
            HostEvent::Resize { id: "tasks".into(), size: WidgetSize::Large },
            HostEvent::PositionChange { id: "tasks".into(), grid_x: 0, grid_y: 4 },
        ]
    );

    handle.shutdown().unwrap();
}

#[tokio::test]
async fn test_resize_to_disallowed_size_is_rejected() {
    let (handle, host, _) = spawn_default();

    handle.resize("mood", WidgetSize::Large).unwrap();
    assert_eq!(handle.layout().await.unwrap().as_ref(), default_layout().as_slice());
    assert!(host.events().is_empty());

    handle.shutdown().unwrap();
}
