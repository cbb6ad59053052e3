use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RegionError;
use crate::models::LatLon;

/// The last address the user geocoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastAddress {
    pub label: String,
    pub point: LatLon,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct SessionData {
    #[serde(default)]
    selected_catalog: Option<String>,
    #[serde(default)]
    last_address: Option<LastAddress>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

/// Per-user state that survives restarts: selected catalog and last address.
///
/// Loaded once at startup, changed only through the setters below and
/// written back with [`SessionContext::persist`].
#[derive(Debug, Clone)]
pub struct SessionContext {
    path: PathBuf,
    data: SessionData,
}

impl SessionContext {
    /// An empty session that will be written to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: SessionData::default(),
        }
    }

    /// Load the session file. A missing or unreadable file gives an empty session.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match tokio::fs::read_to_string(&path).await {
            Ok(text) => match serde_json::from_str::<SessionData>(&text) {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!(
                        %e,
                        path = %path.display(),
                        "Session file is corrupt; starting empty"
                    );
                    SessionData::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SessionData::default(),
            Err(e) => {
                tracing::warn!(
                    %e,
                    path = %path.display(),
                    "Session file unreadable; starting empty"
                );
                SessionData::default()
            }
        };
        Self { path, data }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn selected_catalog(&self) -> Option<&str> {
        self.data.selected_catalog.as_deref()
    }

    pub fn select_catalog(&mut self, catalog_id: &str) {
        let trimmed = catalog_id.trim();
        self.data.selected_catalog = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self.data.updated_at = Some(Utc::now());
    }

    pub fn last_address(&self) -> Option<&LastAddress> {
        self.data.last_address.as_ref()
    }

    pub fn set_last_address(&mut self, label: &str, point: LatLon) {
        self.data.last_address = Some(LastAddress {
            label: label.to_string(),
            point,
        });
        self.data.updated_at = Some(Utc::now());
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.data.updated_at
    }

    /// An explicit catalog id wins over the stored one.
    pub fn resolve_catalog(&self, explicit: Option<&str>) -> Result<String, RegionError> {
        explicit
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .or_else(|| self.selected_catalog())
            .map(str::to_string)
            .ok_or(RegionError::NoCatalogSelected)
    }

    pub async fn persist(&self) -> Result<(), RegionError> {
        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| RegionError::Session(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| RegionError::Session(format!("{}: {}", self.path.display(), e)))?;
        tracing::debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut session = SessionContext::load(&path).await;
        assert_eq!(session.selected_catalog(), None);
        session.select_catalog(" cat-9 ");
        session.set_last_address("Main St 1", LatLon::new(1.0, 2.0));
        session.persist().await.unwrap();

        let reloaded = SessionContext::load(&path).await;
        assert_eq!(reloaded.selected_catalog(), Some("cat-9"));
        assert_eq!(reloaded.last_address().map(|a| a.point), Some(LatLon::new(1.0, 2.0)));
        assert!(reloaded.updated_at().is_some());
    }

    #[tokio::test]
    async fn test_corrupt_file_gives_empty_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, "{not json").await.unwrap();
        let session = SessionContext::load(&path).await;
        assert_eq!(session.selected_catalog(), None);
    }

    #[test]
    fn test_resolve_catalog_prefers_explicit() {
        let mut session = SessionContext::empty("unused.json");
        assert!(matches!(session.resolve_catalog(None), Err(RegionError::NoCatalogSelected)));
        session.select_catalog("stored");
        assert_eq!(session.resolve_catalog(None).unwrap(), "stored");
        assert_eq!(session.resolve_catalog(Some("given")).unwrap(), "given");
        assert_eq!(session.resolve_catalog(Some("  ")).unwrap(), "stored");
    }
}
