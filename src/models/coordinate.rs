use serde::{Deserialize, Serialize};

/// A geographic coordinate in (latitude, longitude) order.
///
/// Geocoding providers hand out GeoJSON positions in (lon, lat) order; use
/// [`LatLon::from_lon_lat`] when converting those.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// An ordered sequence of coordinates describing a polygon boundary.
/// The closing vertex may or may not repeat the first one.
pub type Ring = Vec<LatLon>;

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build a coordinate from a GeoJSON position (`[lon, lat, ...]`).
    /// Returns `None` for positions with fewer than two components.
    pub fn from_lon_lat(position: &[f64]) -> Option<Self> {
        match position {
            [lon, lat, ..] => Some(Self::new(*lat, *lon)),
            _ => None,
        }
    }

    /// Parse the string pair a geocoder returns for `lat`/`lon`.
    /// Both parts must parse as finite numbers.
    ///
    /// ```
    /// use dz::models::LatLon;
    ///
    /// assert_eq!(LatLon::parse("-34.6", "-58.4"), Some(LatLon::new(-34.6, -58.4)));
    /// assert_eq!(LatLon::parse("NaN", "1"), None);
    /// assert_eq!(LatLon::parse("", "1"), None);
    /// ```
    pub fn parse(lat: &str, lon: &str) -> Option<Self> {
        let lat = lat.trim().parse::<f64>().ok()?;
        let lon = lon.trim().parse::<f64>().ok()?;
        let point = Self::new(lat, lon);
        point.is_valid().then_some(point)
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    pub fn as_pair(&self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}

impl From<[f64; 2]> for LatLon {
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl std::fmt::Display for LatLon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lon)
    }
}
