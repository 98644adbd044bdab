//! Submission service: validate and persist new fatwa requests

use crate::error::{Result, ServiceError};
use ifta_domain::traits::RequestStore;
use ifta_domain::{NewRequest, RequestId, Submission};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Accepts questions from visitors
///
/// Each successful call persists exactly one `Pending` request and returns
/// its tracking id. Store failures are returned, not retried.
///
/// # Examples
///
/// ```
/// use ifta_domain::Submission;
/// use ifta_service::SubmissionService;
/// use ifta_store::SqliteStore;
/// use std::sync::Arc;
///
/// let store = Arc::new(SqliteStore::open_in_memory().unwrap());
/// let service = SubmissionService::new(store);
///
/// let tracking_id = service
///     .submit(Submission {
///         name: "Ali".to_string(),
///         email: "a@b.com".to_string(),
///         phone: None,
///         category: "Fasting".to_string(),
///         question: "Is travel fasting exempt?".to_string(),
///     })
///     .unwrap();
/// println!("Tracking id: {}", tracking_id);
/// ```
pub struct SubmissionService<S> {
    store: Arc<S>,
}

impl<S> Clone for SubmissionService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> SubmissionService<S>
where
    S: RequestStore,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    /// Create a submission service over a shared store handle
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validate and persist a submission, returning its tracking id
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Validation`] when a mandatory field is blank or the
    ///   email is malformed; nothing is persisted
    /// - [`ServiceError::Storage`] when the store rejects the write
    pub fn submit(&self, submission: Submission) -> Result<RequestId> {
        let request = NewRequest::new(submission).inspect_err(|e| {
            debug!(reason = %e, "Rejected submission");
        })?;

        let stored = self.store.insert(request).map_err(|e| {
            error!(error = %e, "Failed to persist submission");
            ServiceError::storage(e)
        })?;

        info!(
            tracking_id = %stored.id,
            category = %stored.category,
            "Fatwa request submitted"
        );

        Ok(stored.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifta_domain::{RequestStatus, ValidationError};
    use ifta_store::SqliteStore;

    fn service() -> (Arc<SqliteStore>, SubmissionService<SqliteStore>) {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        (Arc::clone(&store), SubmissionService::new(store))
    }

    fn submission() -> Submission {
        Submission {
            name: "Ali".to_string(),
            email: "a@b.com".to_string(),
            phone: None,
            category: "Fasting".to_string(),
            question: "Is travel fasting exempt?".to_string(),
        }
    }

    #[test]
    fn test_submit_creates_pending_request() {
        let (store, service) = service();
        let id = service.submit(submission()).unwrap();

        let stored = store.find_by_id(id).unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::Pending);
        assert_eq!(stored.name, "Ali");
        assert!(stored.answer.is_none());
        assert!(stored.answered_at.is_none());
    }

    #[test]
    fn test_submit_rejects_whitespace_fields() {
        let (store, service) = service();
        let err = service
            .submit(Submission {
                category: "  ".to_string(),
                ..submission()
            })
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::MissingFields(ref fields)) if fields == &["category"]
        ));
        assert_eq!(store.count_by_status().unwrap().total(), 0);
    }

    #[test]
    fn test_submit_rejects_bad_email() {
        let (store, service) = service();
        let err = service
            .submit(Submission {
                email: "a@b".to_string(),
                ..submission()
            })
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::InvalidEmail(_))
        ));
        assert_eq!(store.count_by_status().unwrap().total(), 0);
    }
}
