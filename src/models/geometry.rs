use serde::{Deserialize, Serialize};

/// A GeoJSON position as sent by the provider: `[lon, lat]` with an
/// optional altitude we ignore.
pub type Position = Vec<f64>;

/// Area geometry attached to a geocoding candidate.
///
/// Only polygonal shapes are modelled. Anything else (points, lines,
/// collections) deserializes to [`PlaceGeometry::Other`] and is treated as
/// "no polygon".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlaceGeometry {
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    #[serde(other)]
    Other,
}

impl PlaceGeometry {
    /// Lenient conversion from raw JSON. Malformed geometry is `None`, which
    /// callers treat the same as a missing polygon.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        match serde_json::from_value::<PlaceGeometry>(value.clone()) {
            Ok(PlaceGeometry::Other) => None,
            Ok(geometry) => Some(geometry),
            Err(e) => {
                tracing::debug!(%e, "Ignoring malformed place geometry");
                None
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PlaceGeometry::Polygon { .. } => "Polygon",
            PlaceGeometry::MultiPolygon { .. } => "MultiPolygon",
            PlaceGeometry::Other => "Other",
        }
    }
}
