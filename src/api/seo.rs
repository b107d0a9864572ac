//! Sitemap and robots endpoints.

use axum::{extract::State, http::header, response::IntoResponse};
use chrono::Utc;

use crate::sitemap::{build_sitemap_entries, render_robots_txt, render_sitemap_xml};
use crate::AppState;

/// GET /sitemap.xml
pub async fn sitemap_xml(State(state): State<AppState>) -> impl IntoResponse {
    let entries = build_sitemap_entries(state.catalog.published(), &state.config.site_url, Utc::now());
    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        render_sitemap_xml(&entries),
    )
}

/// GET /robots.txt
pub async fn robots_txt(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_robots_txt(&state.config.site_url),
    )
}
