//! Rank holding file and write-back into the profile store.
//!
//! The batch writes every computed `{username, rank}` pair to the holding file,
//! then commits them to the store in one transaction and deletes the file.
//! Re-running is safe: rows are overwritten by username.

use std::path::Path;

use serde::Serialize;

use super::{compute_all_ranks, RankMap};
use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{RankUpdate, Term};

/// Outcome of a rank batch run.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WriteBackReport {
    /// Ranks computed by the batch.
    pub computed: usize,
    /// Profiles whose rank was overwritten.
    pub updated: usize,
    /// Usernames in the holding file with no stored profile.
    pub unmatched: Vec<String>,
    pub committed: bool,
}

/// Write the rank map to the holding file.
pub async fn write_holding_file(path: &Path, ranks: &RankMap) -> Result<usize, AppError> {
    let updates: Vec<RankUpdate> = ranks
        .iter()
        .map(|(username, rank)| RankUpdate {
            username: username.clone(),
            rank: *rank,
        })
        .collect();

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let body = serde_json::to_vec_pretty(&updates)?;
    tokio::fs::write(path, body).await?;

    tracing::debug!("Wrote {} ranks to {:?}", updates.len(), path);
    Ok(updates.len())
}

/// Read the holding file. A missing or malformed file yields no updates.
pub async fn read_holding_file(path: &Path) -> Vec<RankUpdate> {
    crate::content::load_json_array(path, "rank holding").await
}

/// Commit the holding file to the store, deleting it on success.
pub async fn apply_holding_file(repo: &Repository, path: &Path) -> WriteBackReport {
    let updates = read_holding_file(path).await;
    let mut report = WriteBackReport {
        computed: updates.len(),
        ..Default::default()
    };

    match repo.apply_rank_updates(&updates).await {
        Ok(commit) => {
            report.updated = commit.updated;
            report.unmatched = commit.unmatched;
            report.committed = true;

            if let Err(e) = tokio::fs::remove_file(path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Failed to remove rank holding file {:?}: {}", path, e);
                }
            }
        }
        Err(e) => {
            tracing::error!("Rank write-back failed: {}", e);
        }
    }

    report
}

/// Compute ranks for `terms` and write them back to the store.
pub async fn run_rank_batch(repo: &Repository, terms: &[Term], path: &Path) -> WriteBackReport {
    let ranks = compute_all_ranks(terms);
    tracing::info!("Computed ranks for {} authors", ranks.len());

    if let Err(e) = write_holding_file(path, &ranks).await {
        tracing::error!("Failed to write rank holding file {:?}: {}", path, e);
        return WriteBackReport {
            computed: ranks.len(),
            ..Default::default()
        };
    }

    let report = apply_holding_file(repo, path).await;
    if !report.unmatched.is_empty() {
        tracing::warn!(
            "Ranks computed for authors without a profile: {}",
            report.unmatched.join(", ")
        );
    }
    report
}
