//! Darul Ifta Domain Layer
//!
//! Core model for the fatwa request lifecycle. This crate does no I/O; it
//! defines the request entity, its status machine, submitter validation,
//! the public projections, the snapshot search filter, and the store trait
//! that the infrastructure layer implements.
//!
//! ## Key Concepts
//!
//! - **Request**: A submitted question, tracked by a [`RequestId`]
//! - **Status**: `Pending` → `Answered` | `Rejected`, never back
//! - **Summary**: The public-safe projection shown on the homepage listing
//! - **Snapshot search**: Case-insensitive substring filter over summaries
//!   already held by the presentation layer
//!
//! ## Architecture
//!
//! - Pure business logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod request;
pub mod search;
pub mod status;
pub mod summary;
pub mod traits;
pub mod validation;

// Re-exports for convenience
pub use request::{timestamp_now, Request, RequestId, ReviewDecision, Transition};
pub use search::SearchEntry;
pub use status::RequestStatus;
pub use summary::{RequestSummary, TrackingStatus};
pub use validation::{NewRequest, Submission, ValidationError};
