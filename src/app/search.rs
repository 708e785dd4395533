//! Fuzzy ranking of packages against a search query.
//!
//! Candidates are matched as `"<name> <url>"` with the Skim algorithm. Ranking
//! is deterministic: higher score first, ties broken by original position. The
//! result is a list of indices into the input, so callers can map back without
//! cloning or reordering their data.

use crate::domain::Package;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Text a package is matched against.
#[must_use]
pub fn candidate_text(package: &Package) -> String {
    format!("{} {}", package.name, package.url)
}

/// Ranks `packages` against `query`, returning indices of the matches.
///
/// An empty (or whitespace-only) query matches everything in input order.
///
/// # Example
///
/// ```
/// use modstash::app::search::rank;
/// use modstash::domain::Package;
///
/// let packages = vec![
///     Package::new(1, "log", "github.com/charmbracelet/log", None),
///     Package::new(2, "cobra", "github.com/spf13/cobra", None),
/// ];
/// assert_eq!(rank(&packages, "cob"), vec![1]);
/// assert_eq!(rank(&packages, ""), vec![0, 1]);
/// ```
#[must_use]
pub fn rank(packages: &[Package], query: &str) -> Vec<usize> {
    let query = query.trim();
    if query.is_empty() {
        return (0..packages.len()).collect();
    }

    let _span = tracing::debug_span!("fuzzy_rank",
        candidates = packages.len(),
        query_len = query.len()
    ).entered();

    let matcher = SkimMatcherV2::default();
    let mut scored: Vec<(i64, usize)> = packages
        .iter()
        .enumerate()
        .filter_map(|(idx, package)| {
            matcher
                .fuzzy_match(&candidate_text(package), query)
                .map(|score| (score, idx))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    tracing::debug!(matched = scored.len(), "fuzzy ranking complete");
    scored.into_iter().map(|(_, idx)| idx).collect()
}

/// Character ranges of `text` matched by `query`, for highlighting.
///
/// Consecutive matched characters are coalesced into one `(start, end)` range
/// (exclusive end, character indices).
#[must_use]
pub fn highlight_ranges(text: &str, query: &str) -> Vec<(usize, usize)> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let Some((_score, indices)) = SkimMatcherV2::default().fuzzy_indices(text, query) else {
        return Vec::new();
    };

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end = idx + 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packages() -> Vec<Package> {
        vec![
            Package::new(1, "log", "github.com/charmbracelet/log", None),
            Package::new(2, "lipgloss", "github.com/charmbracelet/lipgloss", None),
            Package::new(3, "cobra", "github.com/spf13/cobra", None),
        ]
    }

    #[test]
    fn no_match_yields_empty() {
        assert!(rank(&packages(), "zzzz").is_empty());
    }

    #[test]
    fn url_text_is_searchable() {
        let ranked = rank(&packages(), "spf13");
        assert_eq!(ranked, vec![2]);
    }

    #[test]
    fn ranking_is_deterministic_and_leaves_input_alone() {
        let input = packages();
        let before = input.clone();
        let first = rank(&input, "charm");
        let second = rank(&input, "charm");
        assert_eq!(first, second);
        assert_eq!(input, before);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let twins = vec![
            Package::new(1, "same", "x.io/same", None),
            Package::new(2, "same", "x.io/same", None),
        ];
        assert_eq!(rank(&twins, "same"), vec![0, 1]);
    }

    #[test]
    fn highlight_ranges_are_coalesced() {
        let ranges = highlight_ranges("cobra", "cob");
        assert_eq!(ranges, vec![(0, 3)]);
        assert!(highlight_ranges("cobra", "").is_empty());
    }
}
