//! Search-as-you-type over an already fetched snapshot
//!
//! The filter never touches a store. It works on [`SearchEntry`] values the
//! presentation layer built once from the listing response, and recomputes
//! from scratch on every keystroke: snapshots are a handful to a few hundred
//! entries.

use crate::RequestSummary;
use serde::{Deserialize, Serialize};

/// One searchable entry in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntry {
    /// Question shown as the result title
    pub title: String,

    /// Answer text shown under the title
    pub snippet: String,

    /// Question category
    pub category: String,

    /// Name of the answering mufti
    pub mufti_name: String,
}

impl SearchEntry {
    /// Snippet cut to at most `max_chars` characters, with `...` appended
    /// when anything was cut
    pub fn preview(&self, max_chars: usize) -> String {
        match self.snippet.char_indices().nth(max_chars) {
            Some((cut, _)) => format!("{}...", &self.snippet[..cut]),
            None => self.snippet.clone(),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        [&self.title, &self.snippet, &self.category, &self.mufti_name]
            .into_iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

impl From<&RequestSummary> for SearchEntry {
    fn from(summary: &RequestSummary) -> Self {
        Self {
            title: summary.question.clone(),
            snippet: summary.answer.clone(),
            category: summary.category.clone(),
            mufti_name: summary.mufti_name.clone(),
        }
    }
}

/// Lower-case and trim a raw query
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Entries whose title, snippet, category or mufti name contain `query`
///
/// Matching is a case-insensitive substring test. An empty (or all
/// whitespace) query matches nothing; the caller hides its results panel
/// instead of showing the whole snapshot. Results keep snapshot order.
///
/// # Examples
///
/// ```
/// use ifta_domain::search::{filter, SearchEntry};
///
/// let snapshot = vec![SearchEntry {
///     title: "Is travel fasting exempt?".to_string(),
///     snippet: "Yes, under conditions".to_string(),
///     category: "Fasting".to_string(),
///     mufti_name: "Mufti X".to_string(),
/// }];
///
/// assert_eq!(filter(&snapshot, "FAST").len(), 1);
/// assert!(filter(&snapshot, "   ").is_empty());
/// ```
pub fn filter<'a>(snapshot: &'a [SearchEntry], query: &str) -> Vec<&'a SearchEntry> {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return Vec::new();
    }
    snapshot.iter().filter(|entry| entry.matches(&needle)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, snippet: &str, category: &str, mufti: &str) -> SearchEntry {
        SearchEntry {
            title: title.to_string(),
            snippet: snippet.to_string(),
            category: category.to_string(),
            mufti_name: mufti.to_string(),
        }
    }

    fn snapshot() -> Vec<SearchEntry> {
        vec![
            entry("Is travel fasting exempt?", "Yes, under conditions", "Fasting", "Mufti X"),
            entry("Zakat on savings", "Due after one lunar year", "Fiqh", "Mufti Y"),
            entry("Prayer while travelling", "Shorten the four-unit prayers", "Salah", "Mufti X"),
        ]
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let snapshot = snapshot();
        assert!(filter(&snapshot, "").is_empty());
        assert!(filter(&snapshot, " \t ").is_empty());
    }

    #[test]
    fn test_matches_each_field() {
        let snapshot = snapshot();
        assert_eq!(filter(&snapshot, "zakat")[0].title, "Zakat on savings");
        assert_eq!(filter(&snapshot, "lunar")[0].title, "Zakat on savings");
        assert_eq!(filter(&snapshot, "salah")[0].title, "Prayer while travelling");
        assert_eq!(filter(&snapshot, "mufti y")[0].title, "Zakat on savings");
    }

    #[test]
    fn test_case_insensitive() {
        let snapshot = snapshot();
        assert_eq!(filter(&snapshot, "FIQH"), filter(&snapshot, "fiqh"));
        assert_eq!(filter(&snapshot, "  Fiqh ").len(), 1);
    }

    #[test]
    fn test_result_keeps_snapshot_order() {
        let snapshot = snapshot();
        let titles: Vec<&str> = filter(&snapshot, "mufti x")
            .into_iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Is travel fasting exempt?", "Prayer while travelling"]);
    }

    #[test]
    fn test_no_match() {
        assert!(filter(&snapshot(), "inheritance").is_empty());
    }

    #[test]
    fn test_non_ascii_query() {
        let snapshot = vec![entry("روزہ اور سفر", "جی ہاں", "روزہ", "مفتی")];
        assert_eq!(filter(&snapshot, "روزہ").len(), 1);
    }

    #[test]
    fn test_preview() {
        let e = entry("t", "abcdef", "c", "m");
        assert_eq!(e.preview(3), "abc...");
        assert_eq!(e.preview(6), "abcdef");
        assert_eq!(e.preview(60), "abcdef");

        let urdu = entry("t", "جی ہاں", "c", "m");
        assert_eq!(urdu.preview(2), "جی...");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_entry() -> impl Strategy<Value = SearchEntry> {
        ("[a-zA-Z ]{0,16}", "[a-zA-Z ]{0,24}", "[a-zA-Z]{0,8}", "[a-zA-Z ]{0,10}").prop_map(
            |(title, snippet, category, mufti_name)| SearchEntry {
                title,
                snippet,
                category,
                mufti_name,
            },
        )
    }

    proptest! {
        /// Property: Filtering twice gives the same result and leaves the snapshot alone
        #[test]
        fn test_filter_idempotent(
            snapshot in prop::collection::vec(arb_entry(), 0..20),
            query in "[a-zA-Z ]{0,4}",
        ) {
            let before = snapshot.clone();
            let first = filter(&snapshot, &query);
            let second = filter(&snapshot, &query);
            prop_assert_eq!(first, second);
            prop_assert_eq!(snapshot, before);
        }

        /// Property: Query case never changes the result
        #[test]
        fn test_filter_case_insensitive(
            snapshot in prop::collection::vec(arb_entry(), 0..20),
            query in "[a-zA-Z]{1,3}",
        ) {
            prop_assert_eq!(
                filter(&snapshot, &query.to_uppercase()),
                filter(&snapshot, &query.to_lowercase())
            );
        }

        /// Property: Results are a subsequence of the snapshot
        #[test]
        fn test_filter_preserves_order(
            snapshot in prop::collection::vec(arb_entry(), 0..20),
            query in "[a-z]{1,2}",
        ) {
            let results = filter(&snapshot, &query);
            let mut positions = results.iter().map(|r| {
                snapshot.iter().position(|e| std::ptr::eq(e, *r)).unwrap()
            });
            let mut last = None;
            for pos in &mut positions {
                prop_assert!(last.map_or(true, |l| l < pos));
                last = Some(pos);
            }
        }
    }
}
