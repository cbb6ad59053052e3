use serde::{Deserialize, Serialize};

use super::coordinate::{LatLon, Ring};
use super::region::{Action, Coverage, NewRegion, Region};
use crate::error::RegionError;
use crate::geometry::largest_ring;

/// A scalar the backend may send as a JSON number or as a string: ids and
/// latitude/longitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl NumberOrText {
    pub fn as_text(&self) -> String {
        match self {
            NumberOrText::Integer(n) => n.to_string(),
            NumberOrText::Number(n) => n.to_string(),
            NumberOrText::Text(s) => s.clone(),
        }
    }
}

/// Wire shape of a delivery location as exchanged with the backend.
/// Rings are lists of `[lat, lon]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NumberOrText>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub action: Action,
    pub latitude: NumberOrText,
    pub longitude: NumberOrText,
    #[serde(default)]
    pub included_polygons: Vec<Vec<[f64; 2]>>,
    #[serde(default)]
    pub excluded_polygons: Vec<Vec<[f64; 2]>>,
}

fn rings_to_wire(ring: Option<&Ring>) -> Vec<Vec<[f64; 2]>> {
    ring.map(|r| vec![r.iter().map(LatLon::as_pair).collect()])
        .unwrap_or_default()
}

fn rings_from_wire(rings: &[Vec<[f64; 2]>]) -> Vec<Ring> {
    rings
        .iter()
        .map(|r| r.iter().copied().map(LatLon::from).collect::<Ring>())
        .collect()
}

impl From<&NewRegion> for RegionRecord {
    fn from(region: &NewRegion) -> Self {
        let (included, excluded) = match &region.coverage {
            Coverage::Point { .. } => (Vec::new(), Vec::new()),
            Coverage::IncludeArea { ring } => (rings_to_wire(Some(ring)), Vec::new()),
            Coverage::ExcludeArea { ring } => (Vec::new(), rings_to_wire(Some(ring))),
        };
        Self {
            id: None,
            name: region.name.clone(),
            action: region.coverage.action(),
            latitude: NumberOrText::Number(region.reference_point.lat),
            longitude: NumberOrText::Number(region.reference_point.lon),
            included_polygons: included,
            excluded_polygons: excluded,
        }
    }
}

impl TryFrom<RegionRecord> for Region {
    type Error = RegionError;

    fn try_from(record: RegionRecord) -> Result<Self, Self::Error> {
        let id = record
            .id
            .as_ref()
            .map(NumberOrText::as_text)
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| RegionError::Decode(format!("location '{}' has no id", record.name)))?;

        let lat = record.latitude.as_text();
        let lon = record.longitude.as_text();
        let reference_point = LatLon::parse(&lat, &lon)
            .ok_or(RegionError::InvalidCoordinates { lat, lon })?;

        let (matching, other) = match record.action {
            Action::Include => (&record.included_polygons, &record.excluded_polygons),
            Action::Exclude => (&record.excluded_polygons, &record.included_polygons),
        };
        if !other.is_empty() {
            tracing::warn!(
                id = %id,
                action = %record.action,
                "Location carries polygons for the opposite action; ignoring them"
            );
        }
        let ring = largest_ring(rings_from_wire(matching));

        Ok(Region {
            id,
            name: record.name,
            reference_point,
            coverage: Coverage::new(record.action, ring),
        })
    }
}
