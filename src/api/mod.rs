// Atomic API modules
pub mod client;
pub mod backend;
pub mod geocoding;
pub mod regions;

// Re-export commonly used functions
pub use client::{api_call, build_http_client, set_silent};
pub use backend::{Geocoder, HttpRegionBackend, NominatimGeocoder, RegionBackend};
pub use geocoding::{search_places, SearchOptions};
pub use regions::{create_region, delete_region, load_regions};
