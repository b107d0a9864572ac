//! Admin API endpoints. Mounted behind the PSK layer.

use axum::extract::State;

use super::{success, ApiResult};
use crate::rank::holding::{run_rank_batch, WriteBackReport};
use crate::AppState;

/// POST /api/admin/ranks - Recompute ranks and write them back to the store.
///
/// A failed write-back is reported through `committed: false`, not as an error.
/// Concurrent requests run one after another.
pub async fn recompute_ranks(State(state): State<AppState>) -> ApiResult<WriteBackReport> {
    let _batch = state.rank_batch.lock().await;

    let report = run_rank_batch(
        &state.repo,
        state.catalog.published(),
        &state.config.rank_holding_path,
    )
    .await;

    success(report)
}
