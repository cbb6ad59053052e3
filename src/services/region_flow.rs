use crate::api::{Geocoder, RegionBackend};
use crate::error::RegionError;
use crate::geometry::{dominant_ring, normalize_ring};
use crate::models::{Action, Coverage, NewRegion, Place, Region};

use super::region_store::RegionStore;
use super::viewport::{CameraCommand, MapHandle, ViewportController};

/// Stages of adding a region from a text query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStage {
    Idle,
    Searching,
    Resolved,
    Persisting,
    Committed,
    Failed,
}

/// Result of a successful submission.
#[derive(Debug, Clone)]
pub struct Committed {
    /// What was sent to the backend.
    pub pending: NewRegion,
    /// The stored region, when the backend echoed it or it could be found in
    /// the refreshed list.
    pub region: Option<Region>,
    /// Whether the cached list was re-read after the create call.
    pub list_refreshed: bool,
    pub camera: Option<CameraCommand>,
}

/// Turn the first geocoder candidate into a pending region.
///
/// Area geometry is reduced to its dominant ring; a missing, unknown or
/// degenerate geometry gives a point-only region.
pub fn pending_region(place: &Place, query: &str, action: Action) -> NewRegion {
    let ring = place
        .geometry
        .as_ref()
        .and_then(dominant_ring)
        .and_then(|ring| normalize_ring(&ring));
    let name = if place.display_name.trim().is_empty() {
        query.trim().to_string()
    } else {
        place.display_name.clone()
    };
    NewRegion {
        name,
        reference_point: place.point,
        coverage: Coverage::new(action, ring),
    }
}

/// Search -> persist -> refresh -> refit, one submission at a time.
///
/// Every failure ends in `Failed` and then back to `Idle`; nothing is
/// retried automatically.
pub struct RegionCreationFlow<'a> {
    geocoder: &'a dyn Geocoder,
    backend: &'a dyn RegionBackend,
    viewport: &'a ViewportController,
    stage: FlowStage,
    history: Vec<FlowStage>,
}

impl<'a> RegionCreationFlow<'a> {
    pub fn new(
        geocoder: &'a dyn Geocoder,
        backend: &'a dyn RegionBackend,
        viewport: &'a ViewportController,
    ) -> Self {
        Self {
            geocoder,
            backend,
            viewport,
            stage: FlowStage::Idle,
            history: vec![FlowStage::Idle],
        }
    }

    pub fn stage(&self) -> FlowStage {
        self.stage
    }

    /// Every stage entered since the flow was created, starting with `Idle`.
    pub fn history(&self) -> &[FlowStage] {
        &self.history
    }

    fn enter(&mut self, stage: FlowStage) {
        tracing::debug!(from = ?self.stage, to = ?stage, "Region flow transition");
        self.stage = stage;
        self.history.push(stage);
    }

    fn fail(&mut self, e: RegionError) -> RegionError {
        if e.is_no_result() {
            tracing::info!(%e, "Region search found nothing usable");
        } else {
            tracing::warn!(%e, "Region creation failed");
        }
        self.enter(FlowStage::Failed);
        self.enter(FlowStage::Idle);
        e
    }

    /// Geocode `query` and return the pending region without persisting it.
    pub async fn resolve(&mut self, query: &str, action: Action) -> Result<NewRegion, RegionError> {
        self.enter(FlowStage::Searching);
        let query = query.trim();
        if query.is_empty() {
            return Err(self.fail(RegionError::NotFound(String::new())));
        }

        let places = match self.geocoder.search(query).await {
            Ok(places) => places,
            Err(e) => return Err(self.fail(e)),
        };
        let Some(place) = places.first() else {
            return Err(self.fail(RegionError::NotFound(query.to_string())));
        };
        if !place.point.is_valid() {
            return Err(self.fail(RegionError::InvalidCoordinates {
                lat: place.point.lat.to_string(),
                lon: place.point.lon.to_string(),
            }));
        }

        let pending = pending_region(place, query, action);
        tracing::info!(
            name = %pending.name,
            action = %action,
            vertices = pending.coverage.ring().map(|r| r.len()).unwrap_or(0),
            "Place resolved"
        );
        self.enter(FlowStage::Resolved);
        Ok(pending)
    }

    /// Full submission: resolve, create on the backend for the store's
    /// catalog, re-read the list and refit the map to the new region.
    pub async fn submit(
        &mut self,
        store: &mut RegionStore,
        query: &str,
        action: Action,
        map: &mut dyn MapHandle,
    ) -> Result<Committed, RegionError> {
        let pending = self.resolve(query, action).await?;

        self.enter(FlowStage::Persisting);
        let echoed = match self.backend.create(store.catalog_id(), &pending).await {
            Ok(echoed) => echoed,
            Err(e) => return Err(self.fail(e)),
        };

        let list_refreshed = match store.refresh(self.backend).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(%e, "Region saved but the list could not be re-read");
                false
            }
        };

        let region = echoed.or_else(|| {
            store
                .regions()
                .iter()
                .rev()
                .find(|r| r.name == pending.name && r.reference_point == pending.reference_point)
                .cloned()
        });

        let camera = match &region {
            Some(region) => self.viewport.fit_to_region(region, map),
            None => self.viewport.fit_to_pending(&pending, map),
        };

        self.enter(FlowStage::Committed);
        tracing::info!(catalog_id = store.catalog_id(), name = %pending.name, "Region committed");
        self.enter(FlowStage::Idle);

        Ok(Committed {
            pending,
            region,
            list_refreshed,
            camera,
        })
    }
}
