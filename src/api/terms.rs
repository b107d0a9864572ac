//! Term API endpoints.

use axum::extract::{Path, Query, State};

use super::{success, ApiResult, Page, PageQuery};
use crate::errors::AppError;
use crate::models::Term;
use crate::AppState;

/// GET /api/terms - List published terms in collection order.
pub async fn list_terms(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Page<Term>> {
    success(Page::slice(state.catalog.published(), page))
}

/// GET /api/terms/{slug} - Get a single published term.
pub async fn get_term(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<Term> {
    match state.catalog.find_by_slug(&slug) {
        Some(term) => success(term.clone()),
        None => Err(AppError::NotFound(format!("Term {} not found", slug))),
    }
}
