//! Request module - the submitted question and its review state

use crate::RequestStatus;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tracking identifier for a request, based on UUIDv7
///
/// UUIDv7 values sort by creation time and need no coordination to stay
/// unique, so the store can mint them without a round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u128);

impl RequestId {
    /// Generate a fresh UUIDv7-based RequestId
    ///
    /// # Examples
    ///
    /// ```
    /// use ifta_domain::RequestId;
    ///
    /// let a = RequestId::new();
    /// let b = RequestId::new();
    /// assert_ne!(a, b);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a RequestId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a RequestId from its hyphenated string form
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s.trim())
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid tracking id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl std::str::FromStr for RequestId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl Serialize for RequestId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RequestId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_string(&s).map_err(serde::de::Error::custom)
    }
}

/// Current time at the millisecond precision the store persists
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// A fatwa request as persisted
///
/// `answer`, `mufti_name` and `answered_at` are present exactly when
/// `status` is [`RequestStatus::Answered`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Tracking identifier
    pub id: RequestId,

    /// Submitter name
    pub name: String,

    /// Contact email
    pub email: String,

    /// Optional phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Question category
    pub category: String,

    /// Question text
    pub question: String,

    /// Review status
    pub status: RequestStatus,

    /// Answer text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,

    /// Reviewer who answered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mufti_name: Option<String>,

    /// Submission time
    pub created_at: DateTime<Utc>,

    /// Answer time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answered_at: Option<DateTime<Utc>>,
}

impl Request {
    /// Check the answer fields agree with the status
    pub fn is_consistent(&self) -> bool {
        let answered_fields = [
            self.answer.is_some(),
            self.mufti_name.is_some(),
            self.answered_at.is_some(),
        ];
        match self.status {
            RequestStatus::Answered => answered_fields.iter().all(|present| *present),
            _ => answered_fields.iter().all(|present| !*present),
        }
    }
}

/// Reviewer decision on a pending request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDecision {
    /// Answer the question
    Answer {
        /// Answer text
        answer: String,
        /// Name of the answering mufti
        mufti_name: String,
    },

    /// Decline the request; no reason is recorded
    Reject,
}

/// A fully-formed state change for the store to apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Pending -> Answered
    Answer {
        /// Answer text
        answer: String,
        /// Name of the answering mufti
        mufti_name: String,
        /// Time the answer was recorded
        answered_at: DateTime<Utc>,
    },

    /// Pending -> Rejected
    Reject,
}

impl Transition {
    /// Status the request holds after this transition
    pub fn target_status(&self) -> RequestStatus {
        match self {
            Transition::Answer { .. } => RequestStatus::Answered,
            Transition::Reject => RequestStatus::Rejected,
        }
    }
}
