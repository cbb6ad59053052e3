use crate::api::RegionBackend;
use crate::error::RegionError;
use crate::models::Region;

/// Cached copy of one catalog's delivery regions.
///
/// The cache is only ever replaced by a backend read or shrunk after the
/// backend confirmed a delete; it is never appended to optimistically.
#[derive(Debug, Clone)]
pub struct RegionStore {
    catalog_id: String,
    regions: Vec<Region>,
}

impl RegionStore {
    pub fn new(catalog_id: impl Into<String>) -> Self {
        Self {
            catalog_id: catalog_id.into(),
            regions: Vec::new(),
        }
    }

    /// Create a store and fill it from the backend.
    pub async fn load(
        catalog_id: impl Into<String>,
        backend: &dyn RegionBackend,
    ) -> Result<Self, RegionError> {
        let mut store = Self::new(catalog_id);
        store.refresh(backend).await?;
        Ok(store)
    }

    pub fn catalog_id(&self) -> &str {
        &self.catalog_id
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, region_id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == region_id)
    }

    /// Most recently added region, in backend order.
    pub fn latest(&self) -> Option<&Region> {
        self.regions.last()
    }

    /// Replace the cache with the backend's current list.
    pub async fn refresh(&mut self, backend: &dyn RegionBackend) -> Result<usize, RegionError> {
        let regions = backend.list(&self.catalog_id).await?;
        tracing::debug!(
            catalog_id = %self.catalog_id,
            count = regions.len(),
            "Region list refreshed"
        );
        self.regions = regions;
        Ok(self.regions.len())
    }

    /// Delete on the backend, then drop from the cache and re-read the list.
    /// The cache is untouched when the backend refuses.
    pub async fn remove(
        &mut self,
        backend: &dyn RegionBackend,
        region_id: &str,
    ) -> Result<(), RegionError> {
        backend.delete(&self.catalog_id, region_id).await?;
        self.regions.retain(|r| r.id != region_id);
        tracing::info!(catalog_id = %self.catalog_id, region_id, "Region deleted");

        if let Err(e) = self.refresh(backend).await {
            tracing::warn!(%e, "Region list refresh after delete failed; keeping local copy");
        }
        Ok(())
    }
}
