//! Planar geometry over geographic coordinates.
//!
//! Areas are computed in degree² with longitude as `x` and latitude as `y`.
//! They are only meant for comparing rings of the same search result, never
//! for display.

use crate::models::{LatLon, PlaceGeometry, Position, Ring};

/// Shoelace sum over the ring, wrapping last -> first.
///
/// Positive for counter-clockwise winding in (lon, lat) space, negative for
/// clockwise. Fewer than three points yields 0.
pub fn signed_area(ring: &[LatLon]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        let (xi, yi) = (ring[i].lon, ring[i].lat);
        let (xj, yj) = (ring[j].lon, ring[j].lat);
        sum += xi * yj - xj * yi;
    }
    sum / 2.0
}

/// Unsigned polygon area in degree².
///
/// ```
/// use dz::geometry::polygon_area;
/// use dz::models::LatLon;
///
/// let square = [
///     LatLon::new(0.0, 0.0),
///     LatLon::new(0.0, 1.0),
///     LatLon::new(1.0, 1.0),
///     LatLon::new(1.0, 0.0),
/// ];
/// assert_eq!(polygon_area(&square), 1.0);
/// ```
pub fn polygon_area(ring: &[LatLon]) -> f64 {
    signed_area(ring).abs()
}

/// Convert a GeoJSON ring from provider (lon, lat) order into a [`Ring`].
/// Positions with fewer than two components are skipped.
pub fn flip_ring(positions: &[Position]) -> Ring {
    positions
        .iter()
        .filter_map(|p| LatLon::from_lon_lat(p))
        .collect()
}

/// Pick the ring with the strictly greatest area. Ties keep the first
/// encountered; empty rings are skipped.
pub fn largest_ring<I>(rings: I) -> Option<Ring>
where
    I: IntoIterator<Item = Ring>,
{
    let mut best: Option<(f64, Ring)> = None;
    for ring in rings.into_iter().filter(|r| !r.is_empty()) {
        let area = polygon_area(&ring);
        match &best {
            Some((best_area, _)) if area <= *best_area => {}
            _ => best = Some((area, ring)),
        }
    }
    best.map(|(_, ring)| ring)
}

/// The single outer ring to keep for a geocoded area, in (lat, lon) order.
///
/// A `Polygon` yields its outer ring. A `MultiPolygon` yields the outer ring
/// of its largest constituent; the other parcels are dropped. Holes are
/// never kept.
pub fn dominant_ring(geometry: &PlaceGeometry) -> Option<Ring> {
    match geometry {
        PlaceGeometry::Polygon { coordinates } => coordinates
            .first()
            .map(|outer| flip_ring(outer))
            .filter(|ring| !ring.is_empty()),
        PlaceGeometry::MultiPolygon { coordinates } => largest_ring(
            coordinates
                .iter()
                .filter_map(|polygon| polygon.first())
                .map(|outer| flip_ring(outer)),
        ),
        PlaceGeometry::Other => None,
    }
}

/// Drop a repeated closing vertex and consecutive duplicates.
///
/// Returns `None` when fewer than three distinct points remain or any
/// vertex is not finite.
pub fn normalize_ring(ring: &[LatLon]) -> Option<Ring> {
    if ring.iter().any(|p| !p.is_valid()) {
        return None;
    }

    let mut out: Ring = Vec::with_capacity(ring.len());
    for point in ring {
        if out.last() != Some(point) {
            out.push(*point);
        }
    }
    while out.len() > 1 && out.first() == out.last() {
        out.pop();
    }

    let mut distinct: Vec<&LatLon> = Vec::with_capacity(out.len());
    for p in &out {
        if !distinct.contains(&p) {
            distinct.push(p);
        }
    }
    if distinct.len() < 3 {
        return None;
    }
    Some(out)
}

/// Axis-aligned bounds of a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: LatLon,
    pub max: LatLon,
}

impl BoundingBox {
    pub fn contains(&self, p: &LatLon) -> bool {
        p.lat >= self.min.lat
            && p.lat <= self.max.lat
            && p.lon >= self.min.lon
            && p.lon <= self.max.lon
    }

    pub fn center(&self) -> LatLon {
        LatLon::new((self.min.lat + self.max.lat) / 2.0, (self.min.lon + self.max.lon) / 2.0)
    }
}

/// Bounds of all valid points; `None` when there are none.
pub fn bounding_box(points: &[LatLon]) -> Option<BoundingBox> {
    let mut valid = points.iter().filter(|p| p.is_valid());
    let first = *valid.next()?;
    let mut bbox = BoundingBox { min: first, max: first };
    for p in valid {
        bbox.min.lat = bbox.min.lat.min(p.lat);
        bbox.min.lon = bbox.min.lon.min(p.lon);
        bbox.max.lat = bbox.max.lat.max(p.lat);
        bbox.max.lon = bbox.max.lon.max(p.lon);
    }
    Some(bbox)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(f64, f64)]) -> Ring {
        points.iter().map(|&(lat, lon)| LatLon::new(lat, lon)).collect()
    }

    #[test]
    fn test_signed_area_follows_winding() {
        // counter-clockwise in (lon, lat): (0,0) -> (2,0) -> (2,2) -> (0,2)
        let ccw = ring(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
        assert_eq!(signed_area(&ccw), 4.0);
        let cw: Ring = ccw.iter().rev().copied().collect();
        assert_eq!(signed_area(&cw), -4.0);
    }

    #[test]
    fn test_degenerate_ring_has_zero_area() {
        assert_eq!(polygon_area(&[]), 0.0);
        assert_eq!(polygon_area(&ring(&[(0.0, 0.0), (1.0, 1.0)])), 0.0);
    }

    #[test]
    fn test_closed_ring_area_matches_open_ring() {
        let open = ring(&[(0.0, 0.0), (0.0, 3.0), (2.0, 3.0), (2.0, 0.0)]);
        let mut closed = open.clone();
        closed.push(open[0]);
        assert_eq!(polygon_area(&open), polygon_area(&closed));
    }

    #[test]
    fn test_flip_ring_skips_short_positions() {
        let flipped = flip_ring(&[vec![10.0, 20.0], vec![1.0], vec![11.0, 21.0, 5.0]]);
        assert_eq!(flipped, ring(&[(20.0, 10.0), (21.0, 11.0)]));
    }

    #[test]
    fn test_largest_ring_tie_keeps_first() {
        let a = ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        let b = ring(&[(5.0, 5.0), (5.0, 6.0), (6.0, 6.0), (6.0, 5.0)]);
        assert_eq!(largest_ring(vec![a.clone(), b]), Some(a));
    }

    #[test]
    fn test_dominant_ring_ignores_holes() {
        let geometry = PlaceGeometry::Polygon {
            coordinates: vec![
                vec![vec![0.0, 0.0], vec![4.0, 0.0], vec![4.0, 4.0], vec![0.0, 4.0]],
                vec![vec![1.0, 1.0], vec![2.0, 1.0], vec![2.0, 2.0]],
            ],
        };
        assert_eq!(dominant_ring(&geometry).map(|r| r.len()), Some(4));
    }

    #[test]
    fn test_dominant_ring_of_empty_polygon_is_none() {
        let geometry = PlaceGeometry::Polygon { coordinates: vec![vec![]] };
        assert_eq!(dominant_ring(&geometry), None);
        assert_eq!(dominant_ring(&PlaceGeometry::Polygon { coordinates: vec![] }), None);
        assert_eq!(dominant_ring(&PlaceGeometry::Other), None);
    }

    #[test]
    fn test_normalize_ring_drops_closing_vertex() {
        let closed = ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (0.0, 0.0)]);
        assert_eq!(normalize_ring(&closed), Some(ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)])));
    }

    #[test]
    fn test_normalize_ring_rejects_degenerate_input() {
        assert_eq!(normalize_ring(&ring(&[(0.0, 0.0), (0.0, 0.0), (1.0, 1.0), (0.0, 0.0)])), None);
        assert_eq!(normalize_ring(&ring(&[(0.0, 0.0), (f64::NAN, 1.0), (1.0, 1.0)])), None);
    }

    #[test]
    fn test_bounding_box_skips_invalid_points() {
        let bbox = bounding_box(&[
            LatLon::new(1.0, -3.0),
            LatLon::new(f64::NAN, 100.0),
            LatLon::new(-2.0, 4.0),
        ])
        .unwrap();
        assert_eq!(bbox.min, LatLon::new(-2.0, -3.0));
        assert_eq!(bbox.max, LatLon::new(1.0, 4.0));
        assert_eq!(bbox.center(), LatLon::new(-0.5, 0.5));
        assert!(bounding_box(&[]).is_none());
    }
}
