use dz::geometry::{dominant_ring, polygon_area};
use dz::models::{LatLon, PlaceGeometry, Position};

/// Closed rectangle in GeoJSON (lon, lat) order.
fn rect(width: f64, height: f64) -> Vec<Position> {
    vec![
        vec![0.0, 0.0],
        vec![width, 0.0],
        vec![width, height],
        vec![0.0, height],
        vec![0.0, 0.0],
    ]
}

#[test]
fn test_area_is_invariant_under_rotation() {
    let ring = vec![
        LatLon::new(0.0, 0.0),
        LatLon::new(0.0, 4.0),
        LatLon::new(2.0, 5.0),
        LatLon::new(3.0, 1.0),
    ];
    let expected = polygon_area(&ring);
    assert!(expected > 0.0);
    for shift in 1..ring.len() {
        let mut rotated = ring.clone();
        rotated.rotate_left(shift);
        let area = polygon_area(&rotated);
        assert!((area - expected).abs() < 1e-12, "rotation {} changed the area", shift);
    }
}

#[test]
fn test_unit_square_has_area_one() {
    let square = [
        LatLon::new(0.0, 0.0),
        LatLon::new(1.0, 0.0),
        LatLon::new(1.0, 1.0),
        LatLon::new(0.0, 1.0),
    ];
    assert_eq!(polygon_area(&square), 1.0);
}

#[test]
fn test_dominant_ring_picks_largest_parcel_in_any_order() {
    let orders: [[f64; 3]; 3] = [[1.0, 5.0, 3.0], [5.0, 3.0, 1.0], [3.0, 1.0, 5.0]];
    for widths in orders {
        let geometry = PlaceGeometry::MultiPolygon {
            coordinates: widths.iter().map(|w| vec![rect(*w, 1.0)]).collect(),
        };
        let ring = dominant_ring(&geometry).expect("a ring");
        assert_eq!(polygon_area(&ring), 5.0, "order {:?}", widths);
    }
}

#[test]
fn test_empty_multipolygon_has_no_ring() {
    let geometry = PlaceGeometry::MultiPolygon {
        coordinates: vec![vec![vec![]], vec![]],
    };
    assert_eq!(dominant_ring(&geometry), None);
}

#[test]
fn test_polygon_outer_ring_is_flipped_to_lat_lon() {
    let geometry = PlaceGeometry::Polygon {
        coordinates: vec![vec![
            vec![-58.4, -34.6],
            vec![-58.3, -34.6],
            vec![-58.3, -34.5],
            vec![-58.4, -34.6],
        ]],
    };
    let ring = dominant_ring(&geometry).expect("a ring");
    assert_eq!(ring.len(), 4);
    assert_eq!(ring[0], LatLon::new(-34.6, -58.4));
    assert_eq!(ring[2], LatLon::new(-34.5, -58.3));
}

#[test]
fn test_geojson_geometry_parses_from_provider_json() {
    let value = serde_json::json!({
        "type": "Polygon",
        "coordinates": [[[10.0, 1.0], [11.0, 1.0], [11.0, 2.0], [10.0, 1.0]]]
    });
    let geometry = PlaceGeometry::from_value(&value).expect("polygon");
    assert_eq!(geometry.kind(), "Polygon");

    let point = serde_json::json!({ "type": "Point", "coordinates": [10.0, 1.0] });
    assert_eq!(PlaceGeometry::from_value(&point), None);
}
