//! Public-safe projections of a request
//!
//! Neither projection carries the submitter's name, email or phone.

use crate::{Request, RequestId, RequestStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An answered request as shown on the public listing
///
/// Carries no tracking id, so listing entries cannot be tied back to a
/// submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    /// Question category
    pub category: String,

    /// Question text
    pub question: String,

    /// Answer text
    pub answer: String,

    /// Name of the answering mufti
    pub mufti_name: String,

    /// Time the answer was recorded
    pub answered_at: DateTime<Utc>,
}

impl RequestSummary {
    /// Project an answered request; `None` for anything not answered
    pub fn from_answered(request: &Request) -> Option<Self> {
        if request.status != RequestStatus::Answered {
            return None;
        }
        Some(Self {
            category: request.category.clone(),
            question: request.question.clone(),
            answer: request.answer.clone()?,
            mufti_name: request.mufti_name.clone()?,
            answered_at: request.answered_at?,
        })
    }
}

/// What a submitter sees when checking on their tracking id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingStatus {
    /// Tracking identifier
    pub tracking_id: RequestId,

    /// Review status
    pub status: RequestStatus,

    /// Question category
    pub category: String,

    /// Submission time
    pub created_at: DateTime<Utc>,

    /// Answer time, once answered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answered_at: Option<DateTime<Utc>>,
}

impl From<&Request> for TrackingStatus {
    fn from(request: &Request) -> Self {
        Self {
            tracking_id: request.id,
            status: request.status,
            category: request.category.clone(),
            created_at: request.created_at,
            answered_at: request.answered_at,
        }
    }
}
