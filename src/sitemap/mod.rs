//! Sitemap and robots.txt generation.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Term;

/// Path of the term listing page.
pub const LISTING_PATH: &str = "/posts";

const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    pub location: String,
    /// Day-truncated, e.g. `2024-01-10T00:00:00+00:00`.
    pub last_modified_date: String,
}

/// Render a timestamp truncated to its UTC day.
pub fn format_lastmod(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT00:00:00+00:00").to_string()
}

/// Page URL of a term.
pub fn term_location(site_url: &str, term: &Term) -> String {
    format!("{}{}/{}", site_url.trim_end_matches('/'), LISTING_PATH, term.slug())
}

/// Root and listing entries followed by one entry per term, newest first.
///
/// Terms sort descending by `updated_at`, then `created_at`, then `now`;
/// ties keep collection order.
pub fn build_sitemap_entries(terms: &[Term], site_url: &str, now: DateTime<Utc>) -> Vec<SitemapEntry> {
    let site_url = site_url.trim_end_matches('/');
    let build_date = format_lastmod(now);

    let mut dated: Vec<(DateTime<Utc>, &Term)> = terms
        .iter()
        .map(|t| (t.last_modified().unwrap_or(now), t))
        .collect();
    // Stable sort, so equal dates stay in collection order.
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    let mut entries = Vec::with_capacity(terms.len() + 2);
    entries.push(SitemapEntry {
        location: site_url.to_string(),
        last_modified_date: build_date.clone(),
    });
    entries.push(SitemapEntry {
        location: format!("{}{}", site_url, LISTING_PATH),
        last_modified_date: build_date,
    });
    entries.extend(dated.into_iter().map(|(at, term)| SitemapEntry {
        location: term_location(site_url, term),
        last_modified_date: format_lastmod(at),
    }));

    entries
}

/// Escape the five XML special characters.
fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Serialize entries into a sitemap XML document.
///
/// Slugs keep punctuation from titles, so every value is escaped.
pub fn render_sitemap_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::with_capacity(128 + entries.len() * 96);
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(xml, "<urlset xmlns=\"{}\">", SITEMAP_NAMESPACE);
    for entry in entries {
        let _ = writeln!(
            xml,
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n  </url>",
            xml_escape(&entry.location),
            xml_escape(&entry.last_modified_date)
        );
    }
    xml.push_str("</urlset>\n");
    xml
}

/// robots.txt allowing everything but the API and pointing at the sitemap.
pub fn render_robots_txt(site_url: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /api/\n\nSitemap: {}/sitemap.xml\n",
        site_url.trim_end_matches('/')
    )
}
