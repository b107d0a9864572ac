//! Profile reconciliation.
//!
//! Three sources describe a contributor: the stored profile collection, the
//! rank map computed from the term catalog, and the session cookie fragment.
//! [`resolve_profile`] is the one place that decides how they combine:
//!
//! 1. a stored profile for the username is the base record;
//! 2. a rank map entry for that username replaces the stored rank;
//! 3. without a stored profile, a session fragment for the same username
//!    yields a minimal contributor profile;
//! 4. otherwise there is no profile.

use serde::Serialize;

use crate::models::{Profile, Rank, Role, SessionProfileFragment, SocialLinks};
use crate::rank::RankMap;

/// Resolve the profile for `username` from all available sources.
pub fn resolve_profile(
    profiles: &[Profile],
    ranks: Option<&RankMap>,
    session: Option<&SessionProfileFragment>,
    username: &str,
) -> Option<Profile> {
    if let Some(stored) = profiles.iter().find(|p| p.username == username) {
        let mut profile = stored.clone();
        if let Some(rank) = ranks.and_then(|r| r.get(&profile.username)) {
            profile.rank = *rank;
        }
        return Some(profile);
    }

    session
        .filter(|fragment| fragment.username == username)
        .map(profile_from_fragment)
}

/// Minimal profile synthesized from a session fragment.
pub fn profile_from_fragment(fragment: &SessionProfileFragment) -> Profile {
    Profile {
        id: fragment.id.unwrap_or(0),
        email: fragment.email.clone().unwrap_or_default(),
        name: fragment
            .name
            .clone()
            .unwrap_or_else(|| fragment.username.clone()),
        username: fragment.username.clone(),
        role: Role::Contributor,
        social: SocialLinks::default(),
        thumbnail: fragment.thumbnail.clone().unwrap_or_default(),
        intro: String::new(),
        show_links: fragment.show_links.unwrap_or_default(),
        rank: Rank::default(),
    }
}

/// Apply fresh ranks to a whole profile listing.
pub fn apply_ranks(profiles: &[Profile], ranks: &RankMap) -> Vec<Profile> {
    profiles
        .iter()
        .map(|p| {
            let mut profile = p.clone();
            if let Some(rank) = ranks.get(&profile.username) {
                profile.rank = *rank;
            }
            profile
        })
        .collect()
}

/// Whether the session belongs to the owner of `username`'s profile.
pub fn is_owner(viewer: Option<&SessionProfileFragment>, username: &str) -> bool {
    viewer.is_some_and(|v| !v.username.is_empty() && v.username == username)
}

/// A resolved profile as presented to a particular viewer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub profile: Profile,
    pub is_owner: bool,
}

/// Resolve a profile and project it for the viewer: owners see the full
/// record, everyone else the public view.
pub fn resolve_view(
    profiles: &[Profile],
    ranks: Option<&RankMap>,
    viewer: Option<&SessionProfileFragment>,
    username: &str,
) -> Option<ProfileView> {
    let profile = resolve_profile(profiles, ranks, viewer, username)?;
    let owner = is_owner(viewer, username);
    let profile = if owner { profile } else { profile.public_view() };
    Some(ProfileView {
        profile,
        is_owner: owner,
    })
}

/// Extract the session fragment from a `Cookie` header value.
///
/// The cookie value is URL-encoded JSON. Any decode or parse failure, or a
/// fragment without a username, yields `None`.
pub fn parse_session_cookie(header: &str, cookie_name: &str) -> Option<SessionProfileFragment> {
    let value = header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name.trim() == cookie_name).then(|| value.trim())
    })?;

    let decoded = match urlencoding::decode(value) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::debug!("Session cookie is not valid UTF-8 after decoding: {}", e);
            return None;
        }
    };

    match serde_json::from_str::<SessionProfileFragment>(&decoded) {
        Ok(fragment) if !fragment.username.trim().is_empty() => Some(fragment),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("Session cookie is not a profile fragment: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContactVisibility;
    use crate::rank::compute_rank;

    fn stored(username: &str) -> Profile {
        Profile {
            id: 10,
            email: format!("{}@example.com", username),
            name: username.to_uppercase(),
            username: username.to_string(),
            role: Role::Owner,
            social: SocialLinks {
                github: Some(format!("{}-gh", username)),
                linkedin: None,
            },
            thumbnail: "https://example.com/a.png".to_string(),
            intro: "hello".to_string(),
            show_links: ContactVisibility {
                email: false,
                github: true,
                linkedin: false,
            },
            rank: compute_rank(1),
        }
    }

    fn fragment(username: &str) -> SessionProfileFragment {
        SessionProfileFragment {
            username: username.to_string(),
            id: Some(77),
            name: Some("Session Name".to_string()),
            thumbnail: Some("https://example.com/s.png".to_string()),
            email: Some("s@example.com".to_string()),
            show_links: None,
        }
    }

    #[test]
    fn test_stored_profile_wins_over_session() {
        let profiles = vec![stored("alice")];
        let session = fragment("alice");
        let resolved = resolve_profile(&profiles, None, Some(&session), "alice").unwrap();
        assert_eq!(resolved.id, 10);
        assert_eq!(resolved.role, Role::Owner);
        assert_eq!(resolved.rank, compute_rank(1));
    }

    #[test]
    fn test_rank_map_overrides_stored_rank() {
        let profiles = vec![stored("alice")];
        let mut ranks = RankMap::new();
        ranks.insert("alice".to_string(), compute_rank(12));
        ranks.insert("bob".to_string(), compute_rank(3));

        let resolved = resolve_profile(&profiles, Some(&ranks), None, "alice").unwrap();
        assert_eq!(resolved.rank, compute_rank(12));
        assert_eq!(resolved.email, "alice@example.com");
    }

    #[test]
    fn test_session_fallback_synthesizes_contributor() {
        let session = fragment("carol");
        let mut ranks = RankMap::new();
        ranks.insert("carol".to_string(), compute_rank(30));

        let resolved = resolve_profile(&[], Some(&ranks), Some(&session), "carol").unwrap();
        assert_eq!(resolved.role, Role::Contributor);
        assert_eq!(resolved.id, 77);
        assert_eq!(resolved.name, "Session Name");
        assert_eq!(
            resolved.rank,
            Rank {
                current: 0,
                posts_count: 0,
                remaining_for_next_rank: 1
            }
        );
    }

    #[test]
    fn test_session_for_other_user_is_ignored() {
        let session = fragment("carol");
        assert!(resolve_profile(&[stored("alice")], None, Some(&session), "dave").is_none());
    }

    #[test]
    fn test_no_source_is_absent() {
        assert!(resolve_profile(&[], None, None, "nobody").is_none());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let profiles = vec![stored("alice"), stored("bob")];
        let mut ranks = RankMap::new();
        ranks.insert("bob".to_string(), compute_rank(7));
        let session = fragment("alice");

        for username in ["alice", "bob", "zed"] {
            let first = resolve_profile(&profiles, Some(&ranks), Some(&session), username);
            let second = resolve_profile(&profiles, Some(&ranks), Some(&session), username);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_fragment_without_name_uses_username() {
        let fragment = SessionProfileFragment {
            username: "erin".to_string(),
            ..Default::default()
        };
        let profile = profile_from_fragment(&fragment);
        assert_eq!(profile.name, "erin");
        assert_eq!(profile.id, 0);
        assert_eq!(profile.show_links, ContactVisibility::default());
    }

    #[test]
    fn test_apply_ranks() {
        let mut ranks = RankMap::new();
        ranks.insert("bob".to_string(), compute_rank(20));
        let profiles = apply_ranks(&[stored("alice"), stored("bob")], &ranks);
        assert_eq!(profiles[0].rank, compute_rank(1));
        assert_eq!(profiles[1].rank.current, 4);
    }

    #[test]
    fn test_view_for_owner_and_visitor() {
        let profiles = vec![stored("alice")];
        let owner = fragment("alice");
        let visitor = fragment("bob");

        let own = resolve_view(&profiles, None, Some(&owner), "alice").unwrap();
        assert!(own.is_owner);
        assert_eq!(own.profile.email, "alice@example.com");

        let other = resolve_view(&profiles, None, Some(&visitor), "alice").unwrap();
        assert!(!other.is_owner);
        assert!(other.profile.email.is_empty());
        assert_eq!(other.profile.social.github.as_deref(), Some("alice-gh"));

        let anonymous = resolve_view(&profiles, None, None, "alice").unwrap();
        assert!(!anonymous.is_owner);
    }

    #[test]
    fn test_parse_session_cookie() {
        let value = urlencoding::encode(r#"{"username":"alice","id":3,"name":"앨리스"}"#);
        let header = format!("theme=dark; diki_session={}; other=1", value);

        let fragment = parse_session_cookie(&header, "diki_session").unwrap();
        assert_eq!(fragment.username, "alice");
        assert_eq!(fragment.name.as_deref(), Some("앨리스"));
    }

    #[test]
    fn test_parse_session_cookie_rejects_garbage() {
        assert!(parse_session_cookie("diki_session=%7Bnope", "diki_session").is_none());
        assert!(parse_session_cookie("theme=dark", "diki_session").is_none());
        let empty = urlencoding::encode(r#"{"username":""}"#);
        assert!(parse_session_cookie(&format!("diki_session={}", empty), "diki_session").is_none());
    }
}
