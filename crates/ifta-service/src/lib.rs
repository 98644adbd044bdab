//! Darul Ifta Services
//!
//! Application layer for the fatwa request lifecycle.
//!
//! # Overview
//!
//! - [`SubmissionService`]: validates visitor input and persists a new
//!   `Pending` request, returning its tracking id
//! - [`ReviewService`]: moves a `Pending` request to `Answered` or
//!   `Rejected` with a single conditional update
//! - [`ListingQuery`]: the homepage listing of recently answered requests
//!   and tracking-id status lookups, both free of submitter PII
//!
//! Every service holds an `Arc` of the store handle it was given. None of
//! them retry on storage failure; that is left to the caller.
//!
//! # Usage
//!
//! ```
//! use ifta_domain::Submission;
//! use ifta_service::{ListingQuery, ReviewService, SubmissionService};
//! use ifta_store::SqliteStore;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(SqliteStore::open_in_memory()?);
//!
//! let id = SubmissionService::new(Arc::clone(&store)).submit(Submission {
//!     name: "Ali".to_string(),
//!     email: "a@b.com".to_string(),
//!     phone: None,
//!     category: "Fasting".to_string(),
//!     question: "Is travel fasting exempt?".to_string(),
//! })?;
//!
//! ReviewService::new(Arc::clone(&store)).answer(id, "Yes, under conditions...", "Mufti X")?;
//!
//! let recent = ListingQuery::new(store).list_recent_answered(6)?;
//! assert_eq!(recent[0].mufti_name, "Mufti X");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod listing;
mod review;
mod submission;

pub use config::ListingConfig;
pub use error::{Result, ServiceError, StorageSource, TransitionError};
pub use listing::ListingQuery;
pub use review::ReviewService;
pub use submission::SubmissionService;
