//! Contributor profile model.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    #[default]
    Contributor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Contributor => "contributor",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Role::Owner),
            "contributor" => Ok(Role::Contributor),
            other => Err(format!("unknown role {:?}", other)),
        }
    }
}

/// Derived contributor tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Rank {
    pub current: usize,
    pub posts_count: u32,
    pub remaining_for_next_rank: u32,
}

impl Default for Rank {
    fn default() -> Self {
        Self {
            current: 0,
            posts_count: 0,
            remaining_for_next_rank: 1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

/// Which contact fields are visible to other viewers.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactVisibility {
    #[serde(default)]
    pub email: bool,
    #[serde(default)]
    pub github: bool,
    #[serde(default)]
    pub linkedin: bool,
}

/// A registered contributor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    #[serde(default)]
    pub email: String,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub social: SocialLinks,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub show_links: ContactVisibility,
    #[serde(default)]
    pub rank: Rank,
}

impl Profile {
    /// The profile as seen by someone other than its owner.
    pub fn public_view(&self) -> Profile {
        let mut view = self.clone();
        if !view.show_links.email {
            view.email = String::new();
        }
        if !view.show_links.github {
            view.social.github = None;
        }
        if !view.show_links.linkedin {
            view.social.linkedin = None;
        }
        view
    }
}

/// Partial profile carried in the session cookie.
///
/// The cookie is verified upstream; only these fields are read from it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionProfileFragment {
    pub username: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub show_links: Option<ContactVisibility>,
}

/// One row of the rank holding artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RankUpdate {
    pub username: String,
    pub rank: Rank,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> Profile {
        Profile {
            id: 1,
            email: "alice@example.com".to_string(),
            name: "Alice Kim".to_string(),
            username: "alice".to_string(),
            role: Role::Owner,
            social: SocialLinks {
                github: Some("alice-gh".to_string()),
                linkedin: Some("alice-in".to_string()),
            },
            thumbnail: String::new(),
            intro: String::new(),
            show_links: ContactVisibility {
                email: false,
                github: true,
                linkedin: false,
            },
            rank: Rank::default(),
        }
    }

    #[test]
    fn test_rank_serializes_camel_case() {
        let json = serde_json::to_value(Rank {
            current: 2,
            posts_count: 5,
            remaining_for_next_rank: 5,
        })
        .unwrap();
        assert_eq!(json["postsCount"], 5);
        assert_eq!(json["remainingForNextRank"], 5);
    }

    #[test]
    fn test_profile_defaults_on_deserialize() {
        let profile: Profile =
            serde_json::from_str(r#"{"id": 9, "name": "Bob", "username": "bob"}"#).unwrap();
        assert_eq!(profile.role, Role::Contributor);
        assert_eq!(profile.rank, Rank::default());
        assert!(!profile.show_links.email);
    }

    #[test]
    fn test_public_view_hides_private_links() {
        let view = sample_profile().public_view();
        assert!(view.email.is_empty());
        assert_eq!(view.social.github.as_deref(), Some("alice-gh"));
        assert!(view.social.linkedin.is_none());
    }

    #[test]
    fn test_role_round_trip_strings() {
        assert_eq!(Role::Owner.as_str().parse::<Role>(), Ok(Role::Owner));
        assert_eq!("contributor".parse::<Role>(), Ok(Role::Contributor));
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_session_fragment_reads_show_links() {
        let fragment: SessionProfileFragment = serde_json::from_str(
            r#"{"username": "alice", "id": 3, "showLinks": {"email": true}, "extra": 1}"#,
        )
        .unwrap();
        assert_eq!(fragment.id, Some(3));
        assert!(fragment.show_links.unwrap().email);
    }
}
