use serde::Serialize;

use super::coordinate::LatLon;
use super::geometry::PlaceGeometry;

/// A candidate returned by the place-search provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub display_name: String,
    pub point: LatLon,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<PlaceGeometry>,
}

/// A lightweight candidate used for type-ahead suggestions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub label: String,
    pub point: LatLon,
}

impl From<&Place> for Suggestion {
    fn from(place: &Place) -> Self {
        Self {
            label: place.display_name.clone(),
            point: place.point,
        }
    }
}
