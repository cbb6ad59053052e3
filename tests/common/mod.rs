#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use dz::api::{Geocoder, RegionBackend};
use dz::models::{Action, Coverage, LatLon, NewRegion, Place, PlaceGeometry, Region, RegionRecord};
use dz::RegionError;

pub fn place(name: &str, lat: f64, lon: f64, geometry: Option<PlaceGeometry>) -> Place {
    Place {
        display_name: name.to_string(),
        point: LatLon::new(lat, lon),
        geometry,
    }
}

pub fn point_region(id: &str, lat: f64, lon: f64) -> Region {
    Region {
        id: id.to_string(),
        name: id.to_string(),
        reference_point: LatLon::new(lat, lon),
        coverage: Coverage::Point { action: Action::Include },
    }
}

/// Geocoder answering from a canned list. Suggestions can be slowed down per query.
#[derive(Default)]
pub struct FakeGeocoder {
    places: Vec<Place>,
    failure: Option<String>,
    suggest_delays: HashMap<String, Duration>,
    search_calls: AtomicUsize,
    suggest_calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub fn with_places(places: Vec<Place>) -> Self {
        Self {
            places,
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn delay_suggest(mut self, query: &str, delay: Duration) -> Self {
        self.suggest_delays.insert(query.to_string(), delay);
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn suggest_calls(&self) -> usize {
        self.suggest_calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    fn answer(&self, query: &str) -> Result<Vec<Place>, RegionError> {
        self.queries.lock().unwrap().push(query.to_string());
        match &self.failure {
            Some(message) => Err(RegionError::Geocoding(message.clone())),
            None => Ok(self.places.clone()),
        }
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<Place>, RegionError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.answer(query)
    }

    async fn suggest(&self, query: &str) -> Result<Vec<Place>, RegionError> {
        self.suggest_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.suggest_delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        let mut places = self.answer(query)?;
        for p in &mut places {
            p.display_name = format!("{} ({})", p.display_name, query);
        }
        Ok(places)
    }
}

/// In-memory backend that stores what it is sent.
#[derive(Default)]
pub struct FakeBackend {
    regions: Mutex<Vec<Region>>,
    created: Mutex<Vec<RegionRecord>>,
    next_id: AtomicUsize,
    pub echo_created: bool,
    pub fail_create: AtomicBool,
    pub fail_list: AtomicBool,
    pub fail_delete: AtomicBool,
    create_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn with_regions(regions: Vec<Region>) -> Self {
        let next = regions.len();
        Self {
            regions: Mutex::new(regions),
            next_id: AtomicUsize::new(next),
            ..Self::default()
        }
    }

    pub fn echoing(mut self) -> Self {
        self.echo_created = true;
        self
    }

    pub fn created(&self) -> Vec<RegionRecord> {
        self.created.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Vec<Region> {
        self.regions.lock().unwrap().clone()
    }
}

#[async_trait]
impl RegionBackend for FakeBackend {
    async fn list(&self, _catalog_id: &str) -> Result<Vec<Region>, RegionError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(RegionError::Network("connection reset".into()));
        }
        Ok(self.regions.lock().unwrap().clone())
    }

    async fn create(
        &self,
        _catalog_id: &str,
        region: &NewRegion,
    ) -> Result<Option<Region>, RegionError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(RegionError::Persistence("catalog is read-only".into()));
        }
        self.created.lock().unwrap().push(RegionRecord::from(region));
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let stored = Region {
            id: format!("loc-{}", id),
            name: region.name.clone(),
            reference_point: region.reference_point,
            coverage: region.coverage.clone(),
        };
        self.regions.lock().unwrap().push(stored.clone());
        Ok(self.echo_created.then_some(stored))
    }

    async fn delete(&self, _catalog_id: &str, region_id: &str) -> Result<(), RegionError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(RegionError::Persistence("locked".into()));
        }
        // unknown ids are already gone
        self.regions.lock().unwrap().retain(|r| r.id != region_id);
        Ok(())
    }
}
