//! Async seams over the two remote services.
//!
//! The creation flow, the region store and the suggestion feed only talk to
//! these traits, so they can run against the HTTP clients below or against
//! in-memory fakes in tests.

use async_trait::async_trait;

use crate::error::RegionError;
use crate::models::{NewRegion, Place, Region};
use super::geocoding::{search_places, SearchOptions};
use super::regions::{create_region, delete_region, load_regions};

/// Place-search provider.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Exact search: candidates with polygon geometry when available.
    async fn search(&self, query: &str) -> Result<Vec<Place>, RegionError>;

    /// Type-ahead search: point-only candidates, small limit.
    async fn suggest(&self, query: &str) -> Result<Vec<Place>, RegionError>;
}

/// Backend storage of delivery regions, scoped by catalog id.
#[async_trait]
pub trait RegionBackend: Send + Sync {
    async fn list(&self, catalog_id: &str) -> Result<Vec<Region>, RegionError>;

    async fn create(
        &self,
        catalog_id: &str,
        region: &NewRegion,
    ) -> Result<Option<Region>, RegionError>;

    async fn delete(&self, catalog_id: &str, region_id: &str) -> Result<(), RegionError>;
}

/// [`Geocoder`] backed by a Nominatim-compatible HTTP API.
#[derive(Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    country_codes: Option<String>,
    suggestion_limit: usize,
}

impl NominatimGeocoder {
    pub fn new(client: reqwest::Client, base_url: String, country_codes: Option<String>) -> Self {
        Self {
            client,
            base_url,
            country_codes,
            suggestion_limit: crate::config::DEFAULT_SUGGESTION_LIMIT,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<Place>, RegionError> {
        let options = SearchOptions {
            limit: 1,
            with_polygon: true,
            country_codes: self.country_codes.clone(),
        };
        search_places(&self.client, &self.base_url, query, &options).await
    }

    async fn suggest(&self, query: &str) -> Result<Vec<Place>, RegionError> {
        let options = SearchOptions {
            limit: self.suggestion_limit,
            with_polygon: false,
            country_codes: self.country_codes.clone(),
        };
        search_places(&self.client, &self.base_url, query, &options).await
    }
}

/// [`RegionBackend`] backed by the marketplace REST API.
#[derive(Clone)]
pub struct HttpRegionBackend {
    client: reqwest::Client,
    api_base_url: String,
    api_token: String,
}

impl HttpRegionBackend {
    pub fn new(client: reqwest::Client, api_base_url: String, api_token: String) -> Self {
        Self {
            client,
            api_base_url,
            api_token,
        }
    }
}

#[async_trait]
impl RegionBackend for HttpRegionBackend {
    async fn list(&self, catalog_id: &str) -> Result<Vec<Region>, RegionError> {
        load_regions(&self.client, &self.api_base_url, &self.api_token, catalog_id).await
    }

    async fn create(
        &self,
        catalog_id: &str,
        region: &NewRegion,
    ) -> Result<Option<Region>, RegionError> {
        create_region(&self.client, &self.api_base_url, &self.api_token, catalog_id, region).await
    }

    async fn delete(&self, catalog_id: &str, region_id: &str) -> Result<(), RegionError> {
        delete_region(&self.client, &self.api_base_url, &self.api_token, catalog_id, region_id)
            .await
    }
}
