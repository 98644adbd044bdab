//! Read-side queries: the public listing and tracking lookups

use crate::config::ListingConfig;
use crate::error::{Result, ServiceError};
use ifta_domain::traits::{RequestQuery, RequestStore};
use ifta_domain::{RequestId, RequestSummary, TrackingStatus};
use std::sync::Arc;

/// Public, PII-free reads over the store
pub struct ListingQuery<S> {
    store: Arc<S>,
    config: ListingConfig,
}

impl<S> Clone for ListingQuery<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S> ListingQuery<S>
where
    S: RequestStore,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    /// Create a listing query with default configuration
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, ListingConfig::default())
    }

    /// Create a listing query with the given configuration
    pub fn with_config(store: Arc<S>, config: ListingConfig) -> Self {
        Self { store, config }
    }

    /// Listing configuration in effect
    pub fn config(&self) -> &ListingConfig {
        &self.config
    }

    /// Most recently answered requests, newest answer first
    ///
    /// Returns an empty list, not an error, when nothing has been answered.
    pub fn list_recent_answered(&self, limit: usize) -> Result<Vec<RequestSummary>> {
        let requests = self
            .store
            .query(&RequestQuery::recent_answered(limit))
            .map_err(ServiceError::storage)?;

        Ok(requests
            .iter()
            .filter_map(RequestSummary::from_answered)
            .collect())
    }

    /// [`list_recent_answered`](Self::list_recent_answered) with the caller's
    /// limit clamped to the configured bounds
    pub fn list_recent(&self, requested: Option<usize>) -> Result<Vec<RequestSummary>> {
        self.list_recent_answered(self.config.clamp(requested))
    }

    /// Status of a request, as shown to whoever holds its tracking id
    pub fn tracking_status(&self, id: RequestId) -> Result<TrackingStatus> {
        self.store
            .find_by_id(id)
            .map_err(ServiceError::storage)?
            .map(|request| TrackingStatus::from(&request))
            .ok_or(ServiceError::NotFound(id))
    }
}
