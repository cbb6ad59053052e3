use serde::Serialize;

use crate::config;
use crate::models::{Coverage, LatLon, NewRegion, Region};

/// A camera request for the map widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CameraCommand {
    FitBounds { points: Vec<LatLon> },
    Center { point: LatLon, zoom: u8 },
}

/// Handle to a live map widget, obtained when the widget is created and
/// passed to the controller for each call.
pub trait MapHandle: Send {
    fn fit_bounds(&mut self, points: &[LatLon]);
    fn set_view(&mut self, center: LatLon, zoom: u8);
}

/// Map handle that records commands instead of driving a widget. The web UI
/// serializes the last command for the browser; the CLI prints it.
#[derive(Debug, Default, Clone)]
pub struct CameraLog {
    commands: Vec<CameraCommand>,
}

impl CameraLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&CameraCommand> {
        self.commands.last()
    }

    pub fn commands(&self) -> &[CameraCommand] {
        &self.commands
    }
}

impl MapHandle for CameraLog {
    fn fit_bounds(&mut self, points: &[LatLon]) {
        self.commands.push(CameraCommand::FitBounds { points: points.to_vec() });
    }

    fn set_view(&mut self, center: LatLon, zoom: u8) {
        self.commands.push(CameraCommand::Center { point: center, zoom });
    }
}

/// Reference point (when valid) followed by every ring vertex.
pub fn extent_points(reference_point: &LatLon, coverage: &Coverage) -> Vec<LatLon> {
    let mut points = Vec::new();
    if reference_point.is_valid() {
        points.push(*reference_point);
    }
    if let Some(ring) = coverage.ring() {
        points.extend(ring.iter().filter(|p| p.is_valid()).copied());
    }
    points
}

/// Computes camera moves for region sets.
#[derive(Debug, Clone)]
pub struct ViewportController {
    default_center: LatLon,
    default_zoom: u8,
    point_zoom: u8,
    region_zoom: u8,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(
            LatLon::new(config::DEFAULT_MAP_CENTER_LAT, config::DEFAULT_MAP_CENTER_LON),
            config::DEFAULT_MAP_ZOOM,
        )
    }
}

impl ViewportController {
    pub fn new(default_center: LatLon, default_zoom: u8) -> Self {
        Self {
            default_center,
            default_zoom,
            point_zoom: config::POINT_ZOOM,
            region_zoom: config::REGION_ZOOM,
        }
    }

    pub fn from_env() -> Self {
        let (center, zoom) = config::get_default_map_view();
        Self::new(center, zoom)
    }

    /// Fit to more than one point, center on exactly one, do nothing for none.
    pub fn fit_points(
        &self,
        points: Vec<LatLon>,
        map: &mut dyn MapHandle,
    ) -> Option<CameraCommand> {
        match points.len() {
            0 => None,
            1 => {
                map.set_view(points[0], self.point_zoom);
                Some(CameraCommand::Center { point: points[0], zoom: self.point_zoom })
            }
            _ => {
                map.fit_bounds(&points);
                Some(CameraCommand::FitBounds { points })
            }
        }
    }

    pub fn fit_to_region(&self, region: &Region, map: &mut dyn MapHandle) -> Option<CameraCommand> {
        self.fit_points(extent_points(&region.reference_point, &region.coverage), map)
    }

    pub fn fit_to_pending(
        &self,
        region: &NewRegion,
        map: &mut dyn MapHandle,
    ) -> Option<CameraCommand> {
        self.fit_points(extent_points(&region.reference_point, &region.coverage), map)
    }

    /// Fit to the union of every region's extent.
    pub fn fit_to_all(&self, regions: &[Region], map: &mut dyn MapHandle) -> Option<CameraCommand> {
        let points = regions
            .iter()
            .flat_map(|r| extent_points(&r.reference_point, &r.coverage))
            .collect();
        self.fit_points(points, map)
    }

    /// Initial view for a page load: the most recently added region (the
    /// last one in backend order) at region zoom, or the country default.
    pub fn fit_to_all_or_default(
        &self,
        regions: &[Region],
        map: &mut dyn MapHandle,
    ) -> CameraCommand {
        let latest = regions.iter().rev().find(|r| r.reference_point.is_valid());
        let (point, zoom) = match latest {
            Some(region) => (region.reference_point, self.region_zoom),
            None => (self.default_center, self.default_zoom),
        };
        map.set_view(point, zoom);
        CameraCommand::Center { point, zoom }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Action;

    fn region(id: &str, lat: f64, lon: f64, coverage: Coverage) -> Region {
        Region {
            id: id.into(),
            name: id.into(),
            reference_point: LatLon::new(lat, lon),
            coverage,
        }
    }

    #[test]
    fn test_point_only_region_centers() {
        let controller = ViewportController::default();
        let mut map = CameraLog::new();
        let r = region("a", 1.0, 2.0, Coverage::Point { action: Action::Include });
        let cmd = controller.fit_to_region(&r, &mut map).unwrap();
        let expected =
            CameraCommand::Center { point: LatLon::new(1.0, 2.0), zoom: config::POINT_ZOOM };
        assert_eq!(cmd, expected);
        assert_eq!(map.last(), Some(&cmd));
    }

    #[test]
    fn test_area_region_fits_point_and_vertices() {
        let controller = ViewportController::default();
        let mut map = CameraLog::new();
        let ring = vec![LatLon::new(0.0, 0.0), LatLon::new(0.0, 1.0), LatLon::new(1.0, 1.0)];
        let r = region("a", 0.5, 0.5, Coverage::ExcludeArea { ring });
        match controller.fit_to_region(&r, &mut map) {
            Some(CameraCommand::FitBounds { points }) => {
                assert_eq!(points.len(), 4);
                assert_eq!(points[0], LatLon::new(0.5, 0.5));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_reference_point_is_skipped() {
        let controller = ViewportController::default();
        let mut map = CameraLog::new();
        let r = region("a", f64::NAN, 0.0, Coverage::Point { action: Action::Include });
        assert_eq!(controller.fit_to_region(&r, &mut map), None);
        assert!(map.commands().is_empty());
    }

    #[test]
    fn test_initial_view_uses_latest_region() {
        let controller = ViewportController::new(LatLon::new(-38.0, -63.0), 4);
        let mut map = CameraLog::new();
        let regions = vec![
            region("old", 1.0, 1.0, Coverage::Point { action: Action::Include }),
            region("new", 2.0, 2.0, Coverage::Point { action: Action::Include }),
        ];
        let cmd = controller.fit_to_all_or_default(&regions, &mut map);
        let expected =
            CameraCommand::Center { point: LatLon::new(2.0, 2.0), zoom: config::REGION_ZOOM };
        assert_eq!(cmd, expected);
    }

    #[test]
    fn test_initial_view_without_regions_uses_default() {
        let controller = ViewportController::new(LatLon::new(-38.0, -63.0), 4);
        let mut map = CameraLog::new();
        let cmd = controller.fit_to_all_or_default(&[], &mut map);
        assert_eq!(cmd, CameraCommand::Center { point: LatLon::new(-38.0, -63.0), zoom: 4 });
    }
}
