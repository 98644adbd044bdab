//! Operator command implementations.
//!
//! Each command runs directly against the configured store and writes
//! plain-text output to the supplied writer.

use crate::cli::{DecisionCommand, RecentArgs, ReviewArgs, SearchArgs, StatusArgs};
use crate::error::{Result, ServerError};
use ifta_domain::search::{filter, SearchEntry};
use ifta_domain::{RequestId, ReviewDecision};
use ifta_service::{ListingConfig, ListingQuery, ReviewService};
use ifta_store::SqliteStore;
use std::io::Write;
use std::sync::Arc;

/// Characters of answer text shown per search hit
const PREVIEW_CHARS: usize = 60;

fn parse_id(raw: &str) -> Result<RequestId> {
    RequestId::from_string(raw).map_err(ServerError::InvalidInput)
}

/// Execute the review command.
pub fn execute_review<W: Write>(
    args: ReviewArgs,
    store: &Arc<SqliteStore>,
    out: &mut W,
) -> Result<()> {
    let id = parse_id(&args.id)?;
    let decision = match args.decision {
        DecisionCommand::Answer { mufti, answer } => ReviewDecision::Answer {
            answer,
            mufti_name: mufti,
        },
        DecisionCommand::Reject => ReviewDecision::Reject,
    };

    let request = ReviewService::new(Arc::clone(store)).review(id, decision)?;
    writeln!(out, "{} -> {}", request.id, request.status)?;
    Ok(())
}

/// Execute the recent command.
pub fn execute_recent<W: Write>(
    args: RecentArgs,
    store: &Arc<SqliteStore>,
    listing: &ListingConfig,
    out: &mut W,
) -> Result<()> {
    let query = ListingQuery::with_config(Arc::clone(store), listing.clone());
    let summaries = query.list_recent(args.limit)?;

    if summaries.is_empty() {
        writeln!(out, "No answered questions yet")?;
        return Ok(());
    }

    for summary in summaries {
        writeln!(
            out,
            "[{}] {} ({}, {})",
            summary.category,
            summary.question,
            summary.mufti_name,
            summary.answered_at.format("%Y-%m-%d")
        )?;
    }
    Ok(())
}

/// Execute the search command.
///
/// Searches the same snapshot the public listing returns.
pub fn execute_search<W: Write>(
    args: SearchArgs,
    store: &Arc<SqliteStore>,
    listing: &ListingConfig,
    out: &mut W,
) -> Result<()> {
    let query = ListingQuery::with_config(Arc::clone(store), listing.clone());
    let snapshot: Vec<SearchEntry> = query
        .list_recent(args.limit)?
        .iter()
        .map(SearchEntry::from)
        .collect();

    let hits = filter(&snapshot, &args.query);
    if hits.is_empty() {
        writeln!(out, "No matches for \"{}\"", args.query.trim())?;
        return Ok(());
    }

    for entry in hits {
        writeln!(out, "{} [{}]", entry.title, entry.category)?;
        writeln!(out, "    {}", entry.preview(PREVIEW_CHARS))?;
    }
    Ok(())
}

/// Execute the status command.
pub fn execute_status<W: Write>(
    args: StatusArgs,
    store: &Arc<SqliteStore>,
    out: &mut W,
) -> Result<()> {
    let id = parse_id(&args.id)?;
    let status = ListingQuery::new(Arc::clone(store)).tracking_status(id)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&status)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifta_domain::traits::RequestStore;
    use ifta_domain::{RequestStatus, Submission};
    use ifta_service::{ServiceError, SubmissionService};

    fn seeded_store() -> (Arc<SqliteStore>, RequestId) {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let id = SubmissionService::new(Arc::clone(&store))
            .submit(Submission {
                name: "Ali".to_string(),
                email: "a@b.com".to_string(),
                phone: None,
                category: "Zakat".to_string(),
                question: "Is zakat due on savings?".to_string(),
            })
            .unwrap();
        (store, id)
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_review_then_recent_and_search() {
        let (store, id) = seeded_store();

        let mut buf = Vec::new();
        execute_review(
            ReviewArgs {
                id: id.to_string(),
                decision: DecisionCommand::Answer {
                    mufti: "Mufti X".to_string(),
                    answer: "Yes, once the nisab is reached".to_string(),
                },
            },
            &store,
            &mut buf,
        )
        .unwrap();
        assert!(output(buf).contains("Answered"));

        let mut buf = Vec::new();
        execute_recent(RecentArgs { limit: None }, &store, &ListingConfig::default(), &mut buf)
            .unwrap();
        let text = output(buf);
        assert!(text.contains("[Zakat] Is zakat due on savings? (Mufti X"));
        assert!(!text.contains("a@b.com"));

        let mut buf = Vec::new();
        execute_search(
            SearchArgs {
                query: "NISAB".to_string(),
                limit: None,
            },
            &store,
            &ListingConfig::default(),
            &mut buf,
        )
        .unwrap();
        assert!(output(buf).contains("Is zakat due on savings? [Zakat]"));
    }

    #[test]
    fn test_search_without_matches() {
        let (store, _) = seeded_store();
        let mut buf = Vec::new();
        execute_search(
            SearchArgs {
                query: "prayer".to_string(),
                limit: None,
            },
            &store,
            &ListingConfig::default(),
            &mut buf,
        )
        .unwrap();
        assert_eq!(output(buf), "No matches for \"prayer\"\n");
    }

    #[test]
    fn test_reject_twice_conflicts() {
        let (store, id) = seeded_store();
        let reject = || ReviewArgs {
            id: id.to_string(),
            decision: DecisionCommand::Reject,
        };

        execute_review(reject(), &store, &mut Vec::new()).unwrap();
        let err = execute_review(reject(), &store, &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            ServerError::Service(ServiceError::InvalidTransition(_))
        ));
        assert_eq!(
            store.find_by_id(id).unwrap().unwrap().status,
            RequestStatus::Rejected
        );
    }

    #[test]
    fn test_status_output_and_bad_id() {
        let (store, id) = seeded_store();

        let mut buf = Vec::new();
        execute_status(StatusArgs { id: id.to_string() }, &store, &mut buf).unwrap();
        let text = output(buf);
        assert!(text.contains("\"status\": \"Pending\""));
        assert!(!text.contains("Ali"));

        let err = execute_status(
            StatusArgs {
                id: "not-an-id".to_string(),
            },
            &store,
            &mut Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ServerError::InvalidInput(_)));
    }
}
