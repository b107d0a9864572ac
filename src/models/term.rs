//! Term model matching the glossary content file.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bilingual title of a term.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TermTitle {
    pub ko: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
    /// Auxiliary search keywords (abbreviations, alternate spellings).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub etc: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TermDescription {
    #[serde(default)]
    pub short: String,
    #[serde(default)]
    pub full: String,
}

/// Authorship and timestamps of a term.
///
/// `authors` and `contributors` hold usernames once the catalog has been
/// normalized through an [`AuthorDirectory`](crate::identity::AuthorDirectory).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TermMetadata {
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub contributors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A tag on a term, optionally linking to another term's page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TermTag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TermDifficulty {
    /// 1 (introductory) to 5 (expert).
    pub level: u8,
    #[serde(default)]
    pub description: String,
}

impl Default for TermDifficulty {
    fn default() -> Self {
        Self {
            level: 1,
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleRelevance {
    /// 1 to 5.
    pub score: u8,
    #[serde(default)]
    pub description: String,
}

impl Default for RoleRelevance {
    fn default() -> Self {
        Self {
            score: 1,
            description: String::new(),
        }
    }
}

/// How relevant a term is to each data role.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TermRelevance {
    #[serde(default)]
    pub analyst: RoleRelevance,
    #[serde(default)]
    pub engineer: RoleRelevance,
    #[serde(default)]
    pub scientist: RoleRelevance,
}

/// A glossary entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Term {
    pub id: i64,
    pub title: TermTitle,
    #[serde(default)]
    pub description: TermDescription,
    #[serde(default)]
    pub metadata: TermMetadata,
    #[serde(default)]
    pub tags: Vec<TermTag>,
    #[serde(default)]
    pub difficulty: TermDifficulty,
    #[serde(default)]
    pub relevance: TermRelevance,
    /// Drafts are marked explicitly; an absent flag means published.
    #[serde(default = "default_publish")]
    pub publish: bool,
}

fn default_publish() -> bool {
    true
}

impl Default for Term {
    fn default() -> Self {
        Self {
            id: 0,
            title: TermTitle::default(),
            description: TermDescription::default(),
            metadata: TermMetadata::default(),
            tags: Vec::new(),
            difficulty: TermDifficulty::default(),
            relevance: TermRelevance::default(),
            publish: true,
        }
    }
}

impl Term {
    /// Canonical URL slug. Falls back to the id when there is no English title.
    pub fn slug(&self) -> String {
        match self.title.en.as_deref().map(str::trim) {
            Some(en) if !en.is_empty() => crate::identity::transform_to_slug(en),
            _ => self.id.to_string(),
        }
    }

    /// Last modification time: `updated_at`, then `created_at`.
    ///
    /// Unparseable timestamps count as absent.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.metadata
            .updated_at
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| self.metadata.created_at.as_deref().and_then(parse_timestamp))
    }
}

/// Parse the timestamp formats found in the content file.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_deserialize_minimal_term() {
        let term: Term = serde_json::from_str(r#"{"id": 3, "title": {"ko": "회귀"}}"#).unwrap();
        assert_eq!(term.id, 3);
        assert!(term.publish);
        assert!(term.metadata.authors.is_empty());
        assert_eq!(term.difficulty.level, 1);
    }

    #[test]
    fn test_deserialize_full_term() {
        let json = r#"{
            "id": 7,
            "title": {"ko": "랜덤 포레스트", "en": "Random Forest", "etc": ["RF"]},
            "description": {"short": "앙상블", "full": "결정 트리 앙상블"},
            "metadata": {
                "authors": ["alice"],
                "contributors": ["bob"],
                "created_at": "2024-01-02",
                "updated_at": "2024-03-04T10:00:00+09:00"
            },
            "tags": [{"name": "Decision Tree", "internal_link": "/posts/decision-tree"}],
            "difficulty": {"level": 3, "description": "중급"},
            "relevance": {
                "analyst": {"score": 2, "description": ""},
                "engineer": {"score": 3, "description": ""},
                "scientist": {"score": 5, "description": ""}
            },
            "publish": false
        }"#;
        let term: Term = serde_json::from_str(json).unwrap();
        assert!(!term.publish);
        assert_eq!(term.title.etc, vec!["RF"]);
        assert_eq!(term.relevance.scientist.score, 5);
        assert_eq!(
            term.tags[0].internal_link.as_deref(),
            Some("/posts/decision-tree")
        );
    }

    #[test]
    fn test_slug_from_english_title() {
        let term = Term {
            id: 1,
            title: TermTitle {
                ko: "정규 분포".to_string(),
                en: Some("Normal Distribution".to_string()),
                etc: vec![],
            },
            ..Default::default()
        };
        assert_eq!(term.slug(), "normal-distribution");
    }

    #[test]
    fn test_slug_falls_back_to_id() {
        let term = Term {
            id: 42,
            title: TermTitle {
                ko: "정규 분포".to_string(),
                en: Some("  ".to_string()),
                etc: vec![],
            },
            ..Default::default()
        };
        assert_eq!(term.slug(), "42");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let date = parse_timestamp("2024-01-10").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 1, 10));

        let rfc = parse_timestamp("2024-03-04T01:30:00+09:00").unwrap();
        assert_eq!((rfc.day(), rfc.hour()), (3, 16));

        let spaced = parse_timestamp("2024-05-06 07:08:09").unwrap();
        assert_eq!(spaced.minute(), 8);

        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_last_modified_prefers_updated_at() {
        let mut term = Term::default();
        term.metadata.created_at = Some("2024-01-01".to_string());
        term.metadata.updated_at = Some("2024-02-01".to_string());
        assert_eq!(term.last_modified().unwrap().month(), 2);

        term.metadata.updated_at = Some("garbage".to_string());
        assert_eq!(term.last_modified().unwrap().month(), 1);

        term.metadata.created_at = None;
        assert!(term.last_modified().is_none());
    }
}
