//! Shared handler state.

use std::sync::Arc;

use guest_config::GuestConfig;
use guest_store::{GuestListService, HouseholdStore, StoreError};

use crate::error::ApiError;

/// Handle threaded into every request.
///
/// `service` is `None` when no bucket is configured; every guest-list
/// request then answers 500.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    service: Option<Arc<GuestListService>>,
}

impl AppState {
    pub fn new(service: GuestListService) -> Self {
        Self {
            service: Some(Arc::new(service)),
        }
    }

    #[must_use]
    pub const fn unconfigured() -> Self {
        Self { service: None }
    }

    /// Build the S3-backed service when a bucket is configured.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the S3 client cannot be built.
    pub fn from_config(config: &GuestConfig) -> Result<Self, StoreError> {
        if !config.s3.has_bucket() {
            return Ok(Self::unconfigured());
        }
        let store = HouseholdStore::from_config(&config.s3, config.server.fanout())?;
        Ok(Self::new(GuestListService::new(store)))
    }

    pub(crate) fn service(&self) -> Result<&GuestListService, ApiError> {
        self.service.as_deref().ok_or(ApiError::MissingBucket)
    }
}
