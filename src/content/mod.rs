//! Content file loading and the in-memory term catalog.
//!
//! Content files are flat JSON arrays. A missing or malformed file degrades to
//! an empty collection with a warning; nothing here fails the caller.

use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::identity::{find_slug_collisions, AuthorDirectory};
use crate::models::{Profile, Term};
use crate::rank::{compute_all_ranks, RankMap};

/// Read a JSON array from disk, degrading to empty on any failure.
pub async fn load_json_array<T: DeserializeOwned>(path: &Path, label: &str) -> Vec<T> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("No {} file at {:?}, using an empty collection", label, path);
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!("Failed to read {} file {:?}: {}", label, path, e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(items) => {
            tracing::debug!("Loaded {} {} records from {:?}", items.len(), label, path);
            items
        }
        Err(e) => {
            tracing::warn!("Failed to parse {} file {:?}: {}", label, path, e);
            Vec::new()
        }
    }
}

pub async fn load_terms(path: &Path) -> Vec<Term> {
    load_json_array(path, "terms").await
}

pub async fn load_profiles(path: &Path) -> Vec<Profile> {
    load_json_array(path, "profiles").await
}

/// Loaded terms with usernames as the author/contributor identifiers.
#[derive(Debug, Default)]
pub struct TermCatalog {
    terms: Vec<Term>,
    published: Vec<Term>,
    slug_index: HashMap<String, usize>,
    directory: AuthorDirectory,
    ranks: RankMap,
}

impl TermCatalog {
    /// Normalize authorship through the directory, index slugs and compute
    /// ranks from the published terms.
    pub fn build(mut terms: Vec<Term>, directory: AuthorDirectory) -> Self {
        for term in &mut terms {
            directory.normalize_term(term);
        }

        for collision in find_slug_collisions(&terms) {
            tracing::warn!(
                "Slug {:?} is shared by terms {:?}; the first one is served",
                collision.slug,
                collision.term_ids
            );
        }

        let published: Vec<Term> = terms.iter().filter(|t| t.publish).cloned().collect();
        let mut slug_index = HashMap::with_capacity(published.len());
        for (idx, term) in published.iter().enumerate() {
            slug_index.entry(term.slug()).or_insert(idx);
        }

        // Drafts earn no rank.
        let ranks = compute_all_ranks(&published);

        Self {
            terms,
            published,
            slug_index,
            directory,
            ranks,
        }
    }

    /// Every loaded term, drafts included, in collection order.
    pub fn all(&self) -> &[Term] {
        &self.terms
    }

    /// Published terms in collection order.
    pub fn published(&self) -> &[Term] {
        &self.published
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Term> {
        self.slug_index.get(slug).map(|&idx| &self.published[idx])
    }

    pub fn find_by_id(&self, id: i64) -> Option<&Term> {
        self.published.iter().find(|t| t.id == id)
    }

    pub fn ranks(&self) -> &RankMap {
        &self.ranks
    }

    pub fn directory(&self) -> &AuthorDirectory {
        &self.directory
    }
}
