//! REST API module.
//!
//! Read endpoints for terms and profiles, SEO documents, and the admin rank batch.

mod admin;
mod profiles;
mod search;
mod seo;
mod terms;

pub use admin::*;
pub use profiles::*;
pub use search::*;
pub use seo::*;
pub use terms::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// Maximum page size for listing endpoints.
pub const MAX_PAGE_LIMIT: usize = 100;

/// `limit`/`offset` pagination parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    20
}

impl PageQuery {
    /// Requested limit clamped to [`MAX_PAGE_LIMIT`].
    pub fn clamped_limit(&self) -> usize {
        self.limit.min(MAX_PAGE_LIMIT)
    }
}

/// One page of a listing.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

impl<T: Serialize + Clone> Page<T> {
    pub fn slice(all: &[T], query: PageQuery) -> Self {
        let limit = query.clamped_limit();
        let items = all.iter().skip(query.offset).take(limit).cloned().collect();
        Self {
            items,
            total: all.len(),
            limit,
            offset: query.offset,
        }
    }
}
