/// Error types shared by the geocoding, backend and session layers
use thiserror::Error;

/// Errors that can occur while searching, persisting or loading regions
#[derive(Debug, Error)]
pub enum RegionError {
    /// Place-search provider failed or answered with something unreadable
    #[error("Geocoding failed: {0}")]
    Geocoding(String),

    /// Place-search provider returned an empty result set
    #[error("No place found for '{0}'")]
    NotFound(String),

    /// Latitude/longitude did not parse as finite numbers
    #[error("Invalid coordinates: lat={lat}, lon={lon}")]
    InvalidCoordinates { lat: String, lon: String },

    /// Backend rejected a create or delete call
    #[error("Backend rejected the request: {0}")]
    Persistence(String),

    /// Transport-level failure (DNS, TLS, connection reset, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// Response body could not be decoded into the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// No catalog id was given and none is stored in the session
    #[error("No catalog selected")]
    NoCatalogSelected,

    /// Session file could not be read or written
    #[error("Session error: {0}")]
    Session(String),
}

impl RegionError {
    /// Message suitable for a toast/flash or a CLI error line.
    pub fn user_message(&self) -> String {
        match self {
            RegionError::NotFound(query) => format!("Nothing found for \"{}\".", query),
            RegionError::InvalidCoordinates { .. } => {
                "The place was found but its coordinates are not usable.".to_string()
            }
            RegionError::Geocoding(_) => {
                "Address search is unavailable right now, please try again.".to_string()
            }
            RegionError::Network(_) => "Could not reach the server, please try again.".to_string(),
            RegionError::Persistence(detail) => {
                format!("The delivery area could not be saved: {}", detail)
            }
            RegionError::Api { status, .. } => {
                format!("The server answered with an error (HTTP {}).", status)
            }
            RegionError::Decode(_) => "The server sent an unexpected response.".to_string(),
            RegionError::NoCatalogSelected => {
                "Select a catalog first (use `dz catalog use <id>` or ?catalog=<id>).".to_string()
            }
            RegionError::Session(detail) => format!("Session could not be saved: {}", detail),
        }
    }

    /// True for the two outcomes that are "nothing usable found" rather than a fault.
    pub fn is_no_result(&self) -> bool {
        matches!(self, RegionError::NotFound(_) | RegionError::InvalidCoordinates { .. })
    }
}

impl From<reqwest::Error> for RegionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RegionError::Decode(e.to_string())
        } else {
            RegionError::Network(e.to_string())
        }
    }
}
