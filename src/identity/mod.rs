//! Slug and identity utilities.
//!
//! Usernames are the canonical contributor identifier. Content files may still
//! credit people by display name, so [`AuthorDirectory`] maps both forms onto
//! the username and is passed explicitly to whatever needs the translation.

use std::collections::{BTreeMap, HashMap};

use crate::models::{Profile, Term};

/// Lowercase a title and replace whitespace runs and underscores with hyphens.
pub fn transform_to_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_whitespace = false;

    for ch in title.trim().chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if ch == '_' {
            slug.push('-');
        } else {
            slug.extend(ch.to_lowercase());
        }
    }

    slug
}

/// Two or more terms deriving the same slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugCollision {
    pub slug: String,
    /// Term ids in collection order.
    pub term_ids: Vec<i64>,
}

/// Find every slug shared by more than one term.
pub fn find_slug_collisions(terms: &[Term]) -> Vec<SlugCollision> {
    let mut by_slug: BTreeMap<String, Vec<i64>> = BTreeMap::new();
    for term in terms {
        by_slug.entry(term.slug()).or_default().push(term.id);
    }

    by_slug
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(slug, term_ids)| SlugCollision { slug, term_ids })
        .collect()
}

/// Lookup table from usernames and display names to usernames.
#[derive(Debug, Clone, Default)]
pub struct AuthorDirectory {
    by_key: HashMap<String, String>,
}

impl AuthorDirectory {
    /// Build the directory from the profile collection.
    ///
    /// Usernames win over display names when the two collide.
    pub fn from_profiles(profiles: &[Profile]) -> Self {
        let mut by_key = HashMap::with_capacity(profiles.len() * 2);

        for profile in profiles {
            let name = profile.name.trim();
            if !name.is_empty() {
                by_key
                    .entry(name.to_string())
                    .or_insert_with(|| profile.username.clone());
            }
        }
        for profile in profiles {
            by_key.insert(profile.username.clone(), profile.username.clone());
        }

        Self { by_key }
    }

    /// Canonical username for a raw author reference.
    ///
    /// Unknown identifiers are returned unchanged.
    pub fn canonical<'a>(&'a self, raw: &'a str) -> &'a str {
        let key = raw.trim();
        self.by_key.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Rewrite a term's author and contributor lists to usernames, dropping
    /// duplicates while keeping first-seen order.
    pub fn normalize_term(&self, term: &mut Term) {
        term.metadata.authors = self.normalize_list(&term.metadata.authors);
        term.metadata.contributors = self.normalize_list(&term.metadata.contributors);
    }

    fn normalize_list(&self, raw: &[String]) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(raw.len());
        for entry in raw {
            let canonical = self.canonical(entry);
            if canonical.is_empty() || out.iter().any(|e| e == canonical) {
                continue;
            }
            out.push(canonical.to_string());
        }
        out
    }
}
