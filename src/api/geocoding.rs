use serde::Deserialize;
use serde_json::Value;

use crate::error::RegionError;
use crate::models::{LatLon, Place, PlaceGeometry};
use super::client::api_call;

/// Nominatim search result
#[derive(Debug, Clone, Deserialize)]
struct RawPlace {
    #[serde(default)]
    display_name: String,
    lat: Value,
    lon: Value,
    #[serde(default, alias = "geometry")]
    geojson: Option<Value>,
}

fn coordinate_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

impl RawPlace {
    fn into_place(self) -> Result<Place, RegionError> {
        let lat = coordinate_text(&self.lat);
        let lon = coordinate_text(&self.lon);
        let point = LatLon::parse(&lat, &lon).ok_or(RegionError::InvalidCoordinates { lat, lon })?;
        let geometry = self.geojson.as_ref().and_then(PlaceGeometry::from_value);
        Ok(Place {
            display_name: self.display_name,
            point,
            geometry,
        })
    }
}

/// Options for a place search
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub limit: usize,
    pub with_polygon: bool,
    pub country_codes: Option<String>,
}

/// Decode a search payload. The first result must carry usable
/// coordinates; later results with bad coordinates are dropped.
pub fn parse_places(payload: Value) -> Result<Vec<Place>, RegionError> {
    let raw: Vec<RawPlace> = serde_json::from_value(payload)
        .map_err(|e| RegionError::Geocoding(format!("Failed to parse results: {}", e)))?;

    let mut places = Vec::with_capacity(raw.len());
    for (idx, candidate) in raw.into_iter().enumerate() {
        match candidate.into_place() {
            Ok(place) => places.push(place),
            Err(e) if idx == 0 => return Err(e),
            Err(e) => tracing::debug!(%e, "Dropping candidate with unusable coordinates"),
        }
    }
    Ok(places)
}

/// Free-text place search against a Nominatim-compatible endpoint.
pub async fn search_places(
    client: &reqwest::Client,
    geocoder_base_url: &str,
    query: &str,
    options: &SearchOptions,
) -> Result<Vec<Place>, RegionError> {
    let mut params = vec![
        ("q".to_string(), query.to_string()),
        ("format".to_string(), "jsonv2".to_string()),
        ("limit".to_string(), options.limit.max(1).to_string()),
    ];
    if options.with_polygon {
        params.push(("polygon_geojson".to_string(), "1".to_string()));
    }
    if let Some(codes) = &options.country_codes {
        params.push(("countrycodes".to_string(), codes.clone()));
    }

    let payload = api_call(client, geocoder_base_url, "", "GET", "/search", None, Some(params))
        .await
        .map_err(|e| match e {
            RegionError::Api { status, body } => {
                RegionError::Geocoding(format!("HTTP {}: {}", status, body))
            }
            RegionError::Decode(d) => RegionError::Geocoding(d),
            other => other,
        })?;
    let places = parse_places(payload)?;
    tracing::debug!(query, count = places.len(), "Geocoder answered");
    Ok(places)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_places_reads_string_coordinates_and_polygon() {
        let payload = serde_json::json!([{
            "display_name": "Palermo, Buenos Aires",
            "lat": "-34.58",
            "lon": "-58.42",
            "geojson": {
                "type": "Polygon",
                "coordinates": [[
                    [-58.43, -34.59],
                    [-58.41, -34.59],
                    [-58.41, -34.57],
                    [-58.43, -34.57]
                ]]
            }
        }]);
        let places = parse_places(payload).unwrap();
        assert_eq!(places[0].point, LatLon::new(-34.58, -58.42));
        assert_eq!(places[0].geometry.as_ref().map(|g| g.kind()), Some("Polygon"));
    }

    #[test]
    fn test_point_geometry_is_treated_as_no_polygon() {
        let payload = serde_json::json!([{
            "display_name": "A corner",
            "lat": 1.0,
            "lon": 2.0,
            "geometry": {"type": "Point", "coordinates": [2.0, 1.0]}
        }]);
        let places = parse_places(payload).unwrap();
        assert!(places[0].geometry.is_none());
    }

    #[test]
    fn test_first_candidate_with_nan_coordinates_fails() {
        let payload = serde_json::json!([{"display_name": "x", "lat": "NaN", "lon": "2"}]);
        assert!(matches!(parse_places(payload), Err(RegionError::InvalidCoordinates { .. })));
    }

    #[test]
    fn test_malformed_payload_is_a_geocoding_error() {
        let payload = serde_json::json!({"error": "Unable to geocode"});
        assert!(matches!(parse_places(payload), Err(RegionError::Geocoding(_))));
    }

    #[test]
    fn test_empty_result_set_is_ok() {
        assert!(parse_places(serde_json::json!([])).unwrap().is_empty());
    }
}
