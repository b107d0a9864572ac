//! Search API endpoints.

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult, MAX_PAGE_LIMIT};
use crate::errors::AppError;
use crate::models::Term;
use crate::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search query string.
    pub q: String,
    /// Maximum number of results (default: 20).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    20
}

/// Longest accepted query, in characters.
const MAX_QUERY_CHARS: usize = 200;

/// Search result with terms and metadata.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// Single search result item.
#[derive(Debug, Serialize)]
pub struct SearchResultItem {
    pub term: Term,
    pub score: f32,
}

/// GET /api/search - Search published terms.
pub async fn search_terms(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<SearchResponse> {
    if params.q.chars().count() > MAX_QUERY_CHARS {
        return Err(AppError::Validation(format!(
            "Query must be at most {} characters",
            MAX_QUERY_CHARS
        )));
    }

    let limit = params.limit.min(MAX_PAGE_LIMIT);

    let hits = state.search.search(&params.q, limit, params.offset)?;

    let results: Vec<SearchResultItem> = hits
        .into_iter()
        .filter_map(|hit| {
            state.catalog.find_by_id(hit.term_id).map(|term| SearchResultItem {
                term: term.clone(),
                score: hit.score,
            })
        })
        .collect();

    let total = results.len();

    success(SearchResponse {
        results,
        total,
        limit,
        offset: params.offset,
    })
}
