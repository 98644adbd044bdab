//! Trait definitions for external interactions
//!
//! These traits define the boundary between the request lifecycle and
//! persistence. Implementations live in other crates (ifta-store).

use crate::{NewRequest, Request, RequestId, RequestStatus, Transition};

/// Durable collection of requests
///
/// Methods take `&self`: implementations synchronize internally so one
/// handle can be shared across request handlers.
pub trait RequestStore: Send + Sync {
    /// Error type for store operations
    type Error;

    /// Persist a validated submission as a new `Pending` request
    ///
    /// The store assigns the id and `created_at`.
    fn insert(&self, request: NewRequest) -> Result<Request, Self::Error>;

    /// Get a request by ID; `Ok(None)` when it does not exist
    fn find_by_id(&self, id: RequestId) -> Result<Option<Request>, Self::Error>;

    /// Query requests matching criteria
    fn query(&self, query: &RequestQuery) -> Result<Vec<Request>, Self::Error>;

    /// Apply `transition` only if the request currently has status `expected`
    ///
    /// The status check and the write happen as one atomic step, so two
    /// racing callers cannot both succeed.
    fn transition(
        &self,
        id: RequestId,
        expected: RequestStatus,
        transition: Transition,
    ) -> Result<TransitionOutcome, Self::Error>;

    /// Number of requests in each status
    fn count_by_status(&self) -> Result<StatusCounts, Self::Error>;
}

/// Sort order for [`RequestQuery`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestOrder {
    /// Most recently answered first
    AnsweredAtDesc,

    /// Most recently submitted first
    #[default]
    CreatedAtDesc,
}

/// Query criteria for retrieving requests
///
/// Ties in the sort key are broken by insertion order, newest first.
#[derive(Debug, Clone, Default)]
pub struct RequestQuery {
    /// Filter by status
    pub status: Option<RequestStatus>,

    /// Sort order
    pub order: RequestOrder,

    /// Maximum results to return
    pub limit: Option<usize>,
}

impl RequestQuery {
    /// Answered requests, most recently answered first
    pub fn recent_answered(limit: usize) -> Self {
        Self {
            status: Some(RequestStatus::Answered),
            order: RequestOrder::AnsweredAtDesc,
            limit: Some(limit),
        }
    }
}

/// Result of a conditional [`RequestStore::transition`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The update was applied; carries the updated request
    Applied(Request),

    /// No request has this id
    NotFound,

    /// The request exists but its status was not the expected one
    Conflict(RequestStatus),
}

/// Per-status request counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    /// Requests awaiting review
    pub pending: u64,

    /// Answered requests
    pub answered: u64,

    /// Rejected requests
    pub rejected: u64,
}

impl StatusCounts {
    /// Total number of requests
    pub fn total(&self) -> u64 {
        self.pending + self.answered + self.rejected
    }
}
