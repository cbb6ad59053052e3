use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::LatLon;

// Default configuration constants
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_API_BASE_URL: &str = "";
pub const DEFAULT_API_TOKEN: &str = "";
pub const DEFAULT_GEOCODER_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_SESSION_FILE: &str = "session.json";
pub const DEFAULT_SUGGEST_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

// Whole-country view shown when a catalog has no regions yet
pub const DEFAULT_MAP_CENTER_LAT: f64 = 39.8283;
pub const DEFAULT_MAP_CENTER_LON: f64 = -98.5795;
pub const DEFAULT_MAP_ZOOM: u8 = 4;

// Zoom used when centering on a single point or on the latest region
pub const POINT_ZOOM: u8 = 15;
pub const REGION_ZOOM: u8 = 12;

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

pub fn get_api_base_url() -> String {
    let raw = env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
    sanitize_base_url(&raw)
}

pub fn get_api_token() -> String {
    env::var("API_TOKEN").unwrap_or_else(|_| DEFAULT_API_TOKEN.to_string())
}

pub fn get_geocoder_base_url() -> String {
    let raw = env::var("GEOCODER_BASE_URL").unwrap_or_default();
    if raw.trim().is_empty() {
        DEFAULT_GEOCODER_BASE_URL.to_string()
    } else {
        sanitize_base_url(&raw)
    }
}

/// Comma separated ISO country codes restricting geocoder results, e.g. `us,ca`.
pub fn get_geocoder_country_codes() -> Option<String> {
    let raw = env::var("GEOCODER_COUNTRY_CODES").unwrap_or_default();
    let codes: Vec<String> = raw
        .split(',')
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .collect();
    if codes.is_empty() {
        None
    } else {
        Some(codes.join(","))
    }
}

pub fn get_session_file() -> PathBuf {
    let raw = env::var("SESSION_FILE").unwrap_or_default();
    if raw.trim().is_empty() {
        PathBuf::from(DEFAULT_SESSION_FILE)
    } else {
        PathBuf::from(raw.trim())
    }
}

pub fn get_suggest_debounce() -> Duration {
    let ms = env::var("SUGGEST_DEBOUNCE_MS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_SUGGEST_DEBOUNCE_MS);
    Duration::from_millis(ms)
}

/// Map view used when there is nothing to focus on.
pub fn get_default_map_view() -> (LatLon, u8) {
    let lat = parse_env_f64("MAP_DEFAULT_LAT").unwrap_or(DEFAULT_MAP_CENTER_LAT);
    let lon = parse_env_f64("MAP_DEFAULT_LON").unwrap_or(DEFAULT_MAP_CENTER_LON);
    let zoom = env::var("MAP_DEFAULT_ZOOM")
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .unwrap_or(DEFAULT_MAP_ZOOM);
    (LatLon::new(lat, lon), zoom)
}

fn parse_env_f64(key: &str) -> Option<f64> {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

pub fn sanitize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "http://localhost:5000".to_string()
    } else {
        trimmed.to_string()
    }
}
