//! Status module - lifecycle stages for requests

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status in the request lifecycle
///
/// Requests start out `Pending` and move to exactly one terminal status:
/// - Pending: Submitted, awaiting a reviewer decision
/// - Answered: A mufti has answered the question
/// - Rejected: The request was declined without an answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Awaiting review
    #[default]
    Pending,

    /// Answered by a reviewer (terminal)
    Answered,

    /// Declined by a reviewer (terminal)
    Rejected,
}

impl RequestStatus {
    /// Get the status name as stored and serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Answered => "Answered",
            RequestStatus::Rejected => "Rejected",
        }
    }

    /// Parse a status from a string, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(RequestStatus::Pending),
            "answered" => Some(RequestStatus::Answered),
            "rejected" => Some(RequestStatus::Rejected),
            _ => None,
        }
    }

    /// Whether a reviewer decision has already been recorded
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid request status: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_pending() {
        assert_eq!(RequestStatus::default(), RequestStatus::Pending);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Answered.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_parse_round_trip() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Answered,
            RequestStatus::Rejected,
        ] {
            assert_eq!(RequestStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!("ANSWERED".parse::<RequestStatus>(), Ok(RequestStatus::Answered));
        assert!("closed".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn test_serializes_as_stored_name() {
        let json = serde_json::to_string(&RequestStatus::Answered).unwrap();
        assert_eq!(json, "\"Answered\"");
    }
}
