//! Profile repository.
//!
//! Multi-row writes run inside a single transaction so they land all-or-nothing.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{ContactVisibility, Profile, Rank, RankUpdate, SocialLinks};

const PROFILE_COLUMNS: &str = "id, username, email, name, role, github, linkedin, thumbnail, intro, \
     show_email, show_github, show_linkedin, rank_current, rank_posts_count, rank_remaining";

/// Result of a rank write-back commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankCommit {
    pub updated: usize,
    /// Usernames with no stored profile.
    pub unmatched: Vec<String>,
}

/// Database repository for profile operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all profiles.
    pub async fn list_profiles(&self) -> Result<Vec<Profile>, AppError> {
        let sql = format!("SELECT {} FROM profiles ORDER BY id, username", PROFILE_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(profile_from_row).collect())
    }

    /// Get a profile by username.
    pub async fn get_profile(&self, username: &str) -> Result<Option<Profile>, AppError> {
        let sql = format!("SELECT {} FROM profiles WHERE username = ?", PROFILE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(profile_from_row))
    }

    /// Upsert profiles by username, leaving stored ranks untouched on update.
    pub async fn import_profiles(&self, profiles: &[Profile]) -> Result<usize, AppError> {
        let now = Utc::now().to_rfc3339();
        let mut imported = 0;
        let mut tx = self.pool.begin().await?;

        for profile in profiles {
            if profile.username.trim().is_empty() {
                tracing::warn!("Skipping profile {} without a username", profile.id);
                continue;
            }

            sqlx::query(
                r#"INSERT INTO profiles (
                    id, username, email, name, role, github, linkedin, thumbnail, intro,
                    show_email, show_github, show_linkedin,
                    rank_current, rank_posts_count, rank_remaining, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(username) DO UPDATE SET
                    id = excluded.id,
                    email = excluded.email,
                    name = excluded.name,
                    role = excluded.role,
                    github = excluded.github,
                    linkedin = excluded.linkedin,
                    thumbnail = excluded.thumbnail,
                    intro = excluded.intro,
                    show_email = excluded.show_email,
                    show_github = excluded.show_github,
                    show_linkedin = excluded.show_linkedin,
                    updated_at = excluded.updated_at"#,
            )
            .bind(profile.id)
            .bind(&profile.username)
            .bind(&profile.email)
            .bind(&profile.name)
            .bind(profile.role.as_str())
            .bind(&profile.social.github)
            .bind(&profile.social.linkedin)
            .bind(&profile.thumbnail)
            .bind(&profile.intro)
            .bind(profile.show_links.email as i32)
            .bind(profile.show_links.github as i32)
            .bind(profile.show_links.linkedin as i32)
            .bind(profile.rank.current as i64)
            .bind(profile.rank.posts_count as i64)
            .bind(profile.rank.remaining_for_next_rank as i64)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
            imported += 1;
        }

        tx.commit().await?;
        Ok(imported)
    }

    /// Overwrite ranks by username in one transaction.
    pub async fn apply_rank_updates(&self, updates: &[RankUpdate]) -> Result<RankCommit, AppError> {
        let now = Utc::now().to_rfc3339();
        let mut commit = RankCommit::default();

        let mut tx = self.pool.begin().await?;

        for update in updates {
            let result = sqlx::query(
                "UPDATE profiles SET rank_current = ?, rank_posts_count = ?, rank_remaining = ?, updated_at = ? WHERE username = ?",
            )
            .bind(update.rank.current as i64)
            .bind(update.rank.posts_count as i64)
            .bind(update.rank.remaining_for_next_rank as i64)
            .bind(&now)
            .bind(&update.username)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                commit.unmatched.push(update.username.clone());
            } else {
                commit.updated += 1;
            }
        }

        tx.commit().await?;

        tracing::info!(
            "Rank write-back committed: {} updated, {} unmatched",
            commit.updated,
            commit.unmatched.len()
        );
        Ok(commit)
    }
}

fn profile_from_row(row: &sqlx::sqlite::SqliteRow) -> Profile {
    let role: String = row.get("role");
    let show_email: i32 = row.get("show_email");
    let show_github: i32 = row.get("show_github");
    let show_linkedin: i32 = row.get("show_linkedin");
    let rank_current: i64 = row.get("rank_current");
    let rank_posts_count: i64 = row.get("rank_posts_count");
    let rank_remaining: i64 = row.get("rank_remaining");

    Profile {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        username: row.get("username"),
        role: role.parse().unwrap_or_default(),
        social: SocialLinks {
            github: row.get("github"),
            linkedin: row.get("linkedin"),
        },
        thumbnail: row.get("thumbnail"),
        intro: row.get("intro"),
        show_links: ContactVisibility {
            email: show_email != 0,
            github: show_github != 0,
            linkedin: show_linkedin != 0,
        },
        rank: Rank {
            current: rank_current as usize,
            posts_count: rank_posts_count as u32,
            remaining_for_next_rank: rank_remaining as u32,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use crate::models::Role;
    use crate::rank::compute_rank;
    use tempfile::TempDir;

    fn profile(id: i64, username: &str, name: &str) -> Profile {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "email": format!("{}@example.com", username),
            "name": name,
            "username": username,
            "role": "owner",
            "social": {"github": format!("{}-gh", username)},
            "showLinks": {"github": true},
        }))
        .unwrap()
    }

    async fn repo(temp_dir: &TempDir) -> Repository {
        let pool = init_database(&temp_dir.path().join("test.sqlite"))
            .await
            .unwrap();
        Repository::new(pool)
    }

    #[tokio::test]
    async fn test_import_and_get_profile() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repo(&temp_dir).await;

        repo.import_profiles(&[profile(2, "bob", "Bob"), profile(1, "alice", "Alice")])
            .await
            .unwrap();

        let alice = repo.get_profile("alice").await.unwrap().unwrap();
        assert_eq!(alice.role, Role::Owner);
        assert_eq!(alice.social.github.as_deref(), Some("alice-gh"));
        assert!(alice.show_links.github);
        assert!(!alice.show_links.email);

        let all = repo.list_profiles().await.unwrap();
        assert_eq!(
            all.iter().map(|p| p.username.as_str()).collect::<Vec<_>>(),
            vec!["alice", "bob"]
        );
        assert!(repo.get_profile("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reimport_keeps_stored_rank() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repo(&temp_dir).await;

        repo.import_profiles(&[profile(1, "alice", "Alice")]).await.unwrap();
        repo.apply_rank_updates(&[RankUpdate {
            username: "alice".to_string(),
            rank: compute_rank(20),
        }])
        .await
        .unwrap();

        repo.import_profiles(&[profile(1, "alice", "Alice Kim")]).await.unwrap();

        let alice = repo.get_profile("alice").await.unwrap().unwrap();
        assert_eq!(alice.name, "Alice Kim");
        assert_eq!(alice.rank, compute_rank(20));
    }

    #[tokio::test]
    async fn test_apply_rank_updates_reports_unmatched() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repo(&temp_dir).await;
        repo.import_profiles(&[profile(1, "alice", "Alice")]).await.unwrap();

        let commit = repo
            .apply_rank_updates(&[
                RankUpdate {
                    username: "alice".to_string(),
                    rank: compute_rank(5),
                },
                RankUpdate {
                    username: "ghost".to_string(),
                    rank: compute_rank(1),
                },
            ])
            .await
            .unwrap();

        assert_eq!(commit.updated, 1);
        assert_eq!(commit.unmatched, vec!["ghost"]);
    }
}
