//! Per-profile term listings.
//!
//! All filters preserve the order of the source collection.

use std::collections::HashSet;

use serde::Deserialize;

use crate::models::Term;

/// Terms whose author list contains `author`.
pub fn terms_by_author(author: &str, terms: &[Term]) -> Vec<Term> {
    terms
        .iter()
        .filter(|t| t.metadata.authors.iter().any(|a| a == author))
        .cloned()
        .collect()
}

/// Terms whose contributor list contains `contributor`.
pub fn terms_by_contributor(contributor: &str, terms: &[Term]) -> Vec<Term> {
    terms
        .iter()
        .filter(|t| t.metadata.contributors.iter().any(|c| c == contributor))
        .cloned()
        .collect()
}

/// Authored terms followed by contributed-only terms, unique by id.
pub fn combined_terms(author: &str, contributor: &str, terms: &[Term]) -> Vec<Term> {
    let authored = terms_by_author(author, terms);
    let contributed = terms_by_contributor(contributor, terms);

    let mut seen: HashSet<i64> = HashSet::with_capacity(authored.len() + contributed.len());
    authored
        .into_iter()
        .chain(contributed)
        .filter(|t| seen.insert(t.id))
        .collect()
}

/// Which of a profile's terms to list.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TermScope {
    #[default]
    All,
    Authored,
    Contributed,
}

/// Terms related to `username` in the given scope.
pub fn terms_for_profile(username: &str, scope: TermScope, terms: &[Term]) -> Vec<Term> {
    match scope {
        TermScope::All => combined_terms(username, username, terms),
        TermScope::Authored => terms_by_author(username, terms),
        TermScope::Contributed => terms_by_contributor(username, terms),
    }
}
