//! Configuration module for the Diki backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for admin endpoints
    pub api_psk: Option<String>,
    /// Path to the SQLite profile store
    pub db_path: PathBuf,
    /// Path to the Tantivy search index directory
    pub index_path: PathBuf,
    /// Term content file (JSON array)
    pub terms_path: PathBuf,
    /// Profile seed file (JSON array)
    pub profiles_path: PathBuf,
    /// Intermediate file for the rank write-back
    pub rank_holding_path: PathBuf,
    /// Public site URL used in sitemap and robots output
    pub site_url: String,
    /// Name of the cookie carrying the session profile fragment
    pub session_cookie: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_psk = env::var("DIKI_API_PSK").ok().filter(|k| !k.is_empty());

        let bind_addr = env::var("DIKI_BIND_ADDR")
            .ok()
            .and_then(|raw| match raw.parse() {
                Ok(addr) => Some(addr),
                Err(e) => {
                    tracing::warn!("Invalid DIKI_BIND_ADDR {:?} ({}), using default", raw, e);
                    None
                }
            })
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8080)));

        let site_url = var_or("DIKI_SITE_URL", "http://localhost:3000")
            .trim_end_matches('/')
            .to_string();

        Self {
            api_psk,
            db_path: var_or("DIKI_DB_PATH", "./data/diki.sqlite").into(),
            index_path: var_or("DIKI_INDEX_PATH", "./data/index").into(),
            terms_path: var_or("DIKI_TERMS_PATH", "./data/terms.json").into(),
            profiles_path: var_or("DIKI_PROFILES_PATH", "./data/profiles.json").into(),
            rank_holding_path: var_or("DIKI_RANK_HOLDING_PATH", "./data/rank_holding.json")
                .into(),
            site_url,
            session_cookie: var_or("DIKI_SESSION_COOKIE", "diki_session"),
            bind_addr,
            log_level: var_or("DIKI_LOG_LEVEL", "info"),
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
