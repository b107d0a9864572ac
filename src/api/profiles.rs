//! Profile API endpoints.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
};
use serde::Deserialize;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{Profile, SessionProfileFragment, Term};
use crate::queries::{terms_for_profile, TermScope};
use crate::reconcile::{apply_ranks, parse_session_cookie, resolve_view, ProfileView};
use crate::AppState;

/// Session fragment from the request's cookies, if any.
pub fn session_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<SessionProfileFragment> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|raw| parse_session_cookie(raw, cookie_name))
}

/// GET /api/profiles - List stored profiles with fresh ranks.
///
/// An unavailable store yields an empty listing.
pub async fn list_profiles(State(state): State<AppState>) -> ApiResult<Vec<Profile>> {
    let stored = match state.repo.list_profiles().await {
        Ok(profiles) => profiles,
        Err(e) => {
            tracing::warn!("Profile store unavailable: {}", e);
            Vec::new()
        }
    };
    let profiles: Vec<Profile> = apply_ranks(&stored, state.catalog.ranks())
        .iter()
        .map(Profile::public_view)
        .collect();
    success(profiles)
}

/// GET /api/profiles/{username} - Get the reconciled profile for a username.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
    headers: HeaderMap,
) -> ApiResult<ProfileView> {
    let username = state.catalog.directory().canonical(&username).to_string();
    let viewer = session_from_headers(&headers, &state.config.session_cookie);

    // A store failure degrades to the session fallback.
    let stored = match state.repo.get_profile(&username).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("Profile store unavailable for {}: {}", username, e);
            None
        }
    };

    match resolve_view(
        stored.as_slice(),
        Some(state.catalog.ranks()),
        viewer.as_ref(),
        &username,
    ) {
        Some(view) => success(view),
        None => Err(AppError::NotFound(format!("Profile {} not found", username))),
    }
}

/// Query parameters for a profile's term listing.
#[derive(Debug, Deserialize)]
pub struct ProfileTermsQuery {
    #[serde(default)]
    pub scope: TermScope,
}

/// GET /api/profiles/{username}/terms - Terms authored or contributed by a user.
pub async fn get_profile_terms(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<ProfileTermsQuery>,
) -> ApiResult<Vec<Term>> {
    let username = state.catalog.directory().canonical(&username).to_string();
    success(terms_for_profile(
        &username,
        query.scope,
        state.catalog.published(),
    ))
}
