mod common;

use common::point_region;
use dz::geometry::bounding_box;
use dz::models::{Action, Coverage, LatLon};
use dz::services::{CameraCommand, CameraLog, ViewportController};

#[test]
fn test_fit_to_all_covers_every_region() {
    let controller = ViewportController::default();
    let mut map = CameraLog::new();
    let regions = vec![point_region("a", 0.0, 0.0), point_region("b", 10.0, 10.0)];

    let points = match controller.fit_to_all(&regions, &mut map) {
        Some(CameraCommand::FitBounds { points }) => points,
        other => panic!("expected fit bounds, got {:?}", other),
    };
    assert!(points.contains(&LatLon::new(0.0, 0.0)));
    assert!(points.contains(&LatLon::new(10.0, 10.0)));

    let bbox = bounding_box(&points).unwrap();
    assert!(bbox.contains(&LatLon::new(0.0, 0.0)));
    assert!(bbox.contains(&LatLon::new(10.0, 10.0)));
    assert_eq!(map.commands().len(), 1);
}

#[test]
fn test_fit_to_all_includes_ring_vertices() {
    let controller = ViewportController::default();
    let mut map = CameraLog::new();
    let mut area = point_region("area", 1.0, 1.0);
    area.coverage = Coverage::IncludeArea {
        ring: vec![LatLon::new(0.0, 0.0), LatLon::new(0.0, 20.0), LatLon::new(-5.0, 20.0)],
    };

    let Some(CameraCommand::FitBounds { points }) = controller.fit_to_all(&[area], &mut map) else {
        panic!("expected fit bounds");
    };
    let bbox = bounding_box(&points).unwrap();
    assert_eq!(bbox.min, LatLon::new(-5.0, 0.0));
    assert_eq!(bbox.max, LatLon::new(1.0, 20.0));
}

#[test]
fn test_fit_to_all_with_nothing_leaves_map_alone() {
    let controller = ViewportController::default();
    let mut map = CameraLog::new();
    assert_eq!(controller.fit_to_all(&[], &mut map), None);
    assert!(map.commands().is_empty());
}

#[test]
fn test_empty_catalog_uses_default_view() {
    let controller = ViewportController::new(LatLon::new(-38.4, -63.6), 4);
    let mut map = CameraLog::new();
    let mut broken = point_region("broken", f64::NAN, f64::NAN);
    broken.coverage = Coverage::Point { action: Action::Exclude };

    let cmd = controller.fit_to_all_or_default(&[broken], &mut map);
    assert_eq!(cmd, CameraCommand::Center { point: LatLon::new(-38.4, -63.6), zoom: 4 });
    assert_eq!(map.last(), Some(&cmd));
}
