use std::sync::{Arc, Mutex};

use crate::api::{Geocoder, RegionBackend};
use crate::services::{SessionContext, ViewportController};

#[derive(Clone)]
pub struct AppState {
    pub geocoder: Arc<dyn Geocoder>,
    pub backend: Arc<dyn RegionBackend>,
    pub viewport: ViewportController,
    /// Selected catalog and last address; written back on every change.
    pub session: Arc<Mutex<SessionContext>>,
    /// Messages shown once on the next rendered page.
    pub flash_store: Arc<Mutex<Vec<String>>>,
    pub api_base_url: String,
    pub geocoder_base_url: String,
}

impl AppState {
    pub fn push_flash(&self, message: impl Into<String>) {
        if let Ok(mut flashes) = self.flash_store.lock() {
            flashes.push(message.into());
        }
    }

    pub fn take_flash_messages(&self) -> Vec<String> {
        self.flash_store
            .lock()
            .map(|mut flashes| std::mem::take(&mut *flashes))
            .unwrap_or_default()
    }

    /// Copy of the session for reads that must not hold the lock across an await.
    pub fn session_snapshot(&self) -> Option<SessionContext> {
        self.session.lock().ok().map(|s| s.clone())
    }

    /// Apply `change` to the session and write it to disk.
    pub async fn update_session<F>(&self, change: F)
    where
        F: FnOnce(&mut SessionContext),
    {
        let snapshot = match self.session.lock() {
            Ok(mut session) => {
                change(&mut session);
                session.clone()
            }
            Err(_) => return,
        };
        if let Err(e) = snapshot.persist().await {
            tracing::warn!(%e, "Failed to persist session");
        }
    }
}
