//! Contributor rank derivation.
//!
//! A rank is a pure function of how many published terms a contributor has
//! authored. Ranks are computed in a batch over the whole catalog and written
//! back to the profile store through a holding file (see [`holding`]).

pub mod holding;

use std::collections::{BTreeMap, HashSet};

use crate::models::{Rank, Term};

/// Minimum post count for each tier, ascending.
pub const THRESHOLDS: [u32; 8] = [0, 1, 5, 10, 20, 50, 100, 200];

/// Highest tier index.
pub const MAX_TIER: usize = THRESHOLDS.len() - 1;

/// Computed ranks keyed by username.
pub type RankMap = BTreeMap<String, Rank>;

/// Derive the rank for a post count.
pub fn compute_rank(posts_count: u32) -> Rank {
    let current = THRESHOLDS
        .iter()
        .rposition(|&threshold| posts_count >= threshold)
        .unwrap_or(0);

    let remaining_for_next_rank = if current == MAX_TIER {
        0
    } else {
        THRESHOLDS[current + 1] - posts_count
    };

    Rank {
        current,
        posts_count,
        remaining_for_next_rank,
    }
}

/// Count the given terms per author and rank each one.
///
/// Every term passed in is counted; callers choose the collection (the
/// catalog passes its published terms). An author listed twice on the same
/// term is credited once. Authors with no terms are absent from the result.
pub fn compute_all_ranks(terms: &[Term]) -> RankMap {
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();

    for term in terms {
        let mut seen = HashSet::new();
        for author in &term.metadata.authors {
            if author.is_empty() || !seen.insert(author.as_str()) {
                continue;
            }
            *counts.entry(author.as_str()).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .map(|(author, count)| (author.to_string(), compute_rank(count)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authored(id: i64, authors: &[&str]) -> Term {
        let mut term = Term {
            id,
            ..Default::default()
        };
        term.metadata.authors = authors.iter().map(|a| a.to_string()).collect();
        term
    }

    fn rank(current: usize, posts_count: u32, remaining_for_next_rank: u32) -> Rank {
        Rank {
            current,
            posts_count,
            remaining_for_next_rank,
        }
    }

    #[test]
    fn test_compute_rank_zero() {
        assert_eq!(compute_rank(0), rank(0, 0, 1));
    }

    #[test]
    fn test_compute_rank_exact_threshold_reaches_tier() {
        assert_eq!(compute_rank(1), rank(1, 1, 4));
        assert_eq!(compute_rank(5), rank(2, 5, 5));
        assert_eq!(compute_rank(50), rank(5, 50, 50));
    }

    #[test]
    fn test_compute_rank_between_thresholds() {
        assert_eq!(compute_rank(4), rank(1, 4, 1));
        assert_eq!(compute_rank(12), rank(3, 12, 8));
        assert_eq!(compute_rank(199), rank(6, 199, 1));
    }

    #[test]
    fn test_compute_rank_top_tier() {
        assert_eq!(compute_rank(200), rank(7, 200, 0));
        assert_eq!(compute_rank(500), rank(7, 500, 0));
    }

    #[test]
    fn test_compute_rank_tier_is_unique_for_all_counts() {
        for count in 0..=300u32 {
            let r = compute_rank(count);
            assert!(THRESHOLDS[r.current] <= count);
            assert!(r.current == MAX_TIER || count < THRESHOLDS[r.current + 1]);
            assert_eq!(r.posts_count, count);
        }
    }

    #[test]
    fn test_compute_all_ranks_scenario() {
        let mut terms = Vec::new();
        let mut id = 0;
        for _ in 0..5 {
            id += 1;
            terms.push(authored(id, &["alice"]));
        }
        for _ in 0..12 {
            id += 1;
            terms.push(authored(id, &["bob"]));
        }

        let ranks = compute_all_ranks(&terms);
        assert_eq!(ranks.len(), 2);
        assert_eq!(ranks["alice"], rank(2, 5, 5));
        assert_eq!(ranks["bob"], rank(3, 12, 8));
    }

    #[test]
    fn test_compute_all_ranks_credits_every_coauthor_once() {
        let terms = vec![
            authored(1, &["alice", "bob", "alice"]),
            authored(2, &["bob"]),
        ];
        let ranks = compute_all_ranks(&terms);
        assert_eq!(ranks["alice"].posts_count, 1);
        assert_eq!(ranks["bob"].posts_count, 2);
    }

    #[test]
    fn test_compute_all_ranks_counts_every_given_term() {
        let mut draft = authored(1, &["alice"]);
        draft.publish = false;

        let ranks = compute_all_ranks(&[draft]);
        assert_eq!(ranks.get("alice").map(|r| r.posts_count), Some(1));
    }

    #[test]
    fn test_compute_all_ranks_skips_contributors() {
        let mut contributed = authored(1, &[]);
        contributed.metadata.contributors = vec!["dave".to_string()];

        assert!(compute_all_ranks(&[contributed]).is_empty());
    }
}
