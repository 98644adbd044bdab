//! Review transition service: answer or reject pending requests

use crate::error::{Result, ServiceError, TransitionError};
use ifta_domain::traits::{RequestStore, TransitionOutcome};
use ifta_domain::{timestamp_now, Request, RequestId, RequestStatus, ReviewDecision, Transition};
use std::sync::Arc;
use tracing::{info, warn};

/// Applies reviewer decisions to pending requests
///
/// A decision only lands on a request that is still `Pending`; the check and
/// the write are one conditional update in the store, so of two reviewers
/// racing on the same request exactly one succeeds.
pub struct ReviewService<S> {
    store: Arc<S>,
}

impl<S> Clone for ReviewService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> ReviewService<S>
where
    S: RequestStore,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    /// Create a review service over a shared store handle
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Record a decision on the request with the given id
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidTransition`] when an answer lacks text or a
    ///   mufti name, or the request is no longer pending
    /// - [`ServiceError::NotFound`] when no request has this id
    /// - [`ServiceError::Storage`] when the store fails
    pub fn review(&self, id: RequestId, decision: ReviewDecision) -> Result<Request> {
        let transition = Self::build_transition(decision)?;

        let outcome = self
            .store
            .transition(id, RequestStatus::Pending, transition)
            .map_err(ServiceError::storage)?;

        match outcome {
            TransitionOutcome::Applied(request) => {
                info!(tracking_id = %id, status = %request.status, "Request reviewed");
                Ok(request)
            }
            TransitionOutcome::NotFound => Err(ServiceError::NotFound(id)),
            TransitionOutcome::Conflict(current) => {
                warn!(tracking_id = %id, status = %current, "Review refused, request already decided");
                Err(ServiceError::InvalidTransition(
                    TransitionError::AlreadyDecided(current),
                ))
            }
        }
    }

    /// Answer a pending request
    pub fn answer(&self, id: RequestId, answer: &str, mufti_name: &str) -> Result<Request> {
        self.review(
            id,
            ReviewDecision::Answer {
                answer: answer.to_string(),
                mufti_name: mufti_name.to_string(),
            },
        )
    }

    /// Reject a pending request
    pub fn reject(&self, id: RequestId) -> Result<Request> {
        self.review(id, ReviewDecision::Reject)
    }

    fn build_transition(decision: ReviewDecision) -> Result<Transition> {
        match decision {
            ReviewDecision::Answer { answer, mufti_name } => {
                let answer = answer.trim();
                let mufti_name = mufti_name.trim();
                if answer.is_empty() {
                    return Err(ServiceError::InvalidTransition(
                        TransitionError::MissingAnswer,
                    ));
                }
                if mufti_name.is_empty() {
                    return Err(ServiceError::InvalidTransition(
                        TransitionError::MissingMuftiName,
                    ));
                }
                Ok(Transition::Answer {
                    answer: answer.to_string(),
                    mufti_name: mufti_name.to_string(),
                    answered_at: timestamp_now(),
                })
            }
            ReviewDecision::Reject => Ok(Transition::Reject),
        }
    }
}
