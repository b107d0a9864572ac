//! Diki Backend
//!
//! Serves glossary terms and contributor profiles, reconciles profile data with
//! computed ranks and session cookies, and generates sitemap/robots documents.

mod api;
mod auth;
mod config;
mod content;
mod db;
mod errors;
mod identity;
mod models;
mod queries;
mod rank;
mod reconcile;
mod search;
mod sitemap;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use clap::{Parser, Subcommand};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use content::TermCatalog;
use db::Repository;
use identity::AuthorDirectory;
use search::SearchIndex;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub search: Arc<SearchIndex>,
    pub catalog: Arc<TermCatalog>,
    pub config: Arc<Config>,
    /// Held for the whole rank batch; runs share one holding file.
    pub rank_batch: Arc<Mutex<()>>,
}

#[derive(Debug, Parser)]
#[command(name = "diki-backend", version, about = "Diki glossary backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Recompute contributor ranks and write them to the profile store
    RecomputeRanks,
    /// Write sitemap.xml and robots.txt into a directory
    Sitemap {
        #[arg(short, long, default_value = "./public")]
        out_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Diki Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Terms file: {:?}", config.terms_path);
    tracing::info!("Profiles file: {:?}", config.profiles_path);

    let state = load_state(config.clone()).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(state).await,
        Command::RecomputeRanks => {
            let report = rank::holding::run_rank_batch(
                &state.repo,
                state.catalog.published(),
                &config.rank_holding_path,
            )
            .await;
            tracing::info!(
                "Rank batch finished: {} computed, {} updated, committed = {}",
                report.computed,
                report.updated,
                report.committed
            );
            if report.committed {
                Ok(())
            } else {
                Err("rank write-back was not committed".into())
            }
        }
        Command::Sitemap { out_dir } => {
            tokio::fs::create_dir_all(&out_dir).await?;
            let entries = sitemap::build_sitemap_entries(
                state.catalog.published(),
                &config.site_url,
                chrono::Utc::now(),
            );
            tokio::fs::write(out_dir.join("sitemap.xml"), sitemap::render_sitemap_xml(&entries))
                .await?;
            tokio::fs::write(
                out_dir.join("robots.txt"),
                sitemap::render_robots_txt(&config.site_url),
            )
            .await?;
            tracing::info!("Wrote sitemap with {} entries to {:?}", entries.len(), out_dir);
            Ok(())
        }
    }
}

/// Open the store and index, import profiles and build the term catalog.
pub async fn load_state(config: Config) -> Result<AppState, Box<dyn std::error::Error>> {
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    let seed = content::load_profiles(&config.profiles_path).await;
    if !seed.is_empty() {
        let imported = repo.import_profiles(&seed).await?;
        tracing::info!("Imported {} profiles", imported);
    }

    // The store is authoritative; the directory is built from it, not the seed.
    let profiles = repo.list_profiles().await?;
    let directory = AuthorDirectory::from_profiles(&profiles);

    let terms = content::load_terms(&config.terms_path).await;
    let catalog = Arc::new(TermCatalog::build(terms, directory));
    tracing::info!(
        "Loaded {} terms ({} published), ranks for {} authors",
        catalog.all().len(),
        catalog.published().len(),
        catalog.ranks().len()
    );

    let search = Arc::new(SearchIndex::open(&config.index_path)?);
    search.rebuild(catalog.published()).await?;

    Ok(AppState {
        repo,
        search,
        catalog,
        config: Arc::new(config),
        rank_batch: Arc::new(Mutex::new(())),
    })
}

async fn serve(state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let bind_addr = state.config.bind_addr;

    if state.config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (DIKI_API_PSK). Admin endpoints are disabled!");
    }

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let psk = state.config.api_psk.clone();

    let admin_routes = Router::new()
        .route("/ranks", post(api::recompute_ranks))
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    let api_routes = Router::new()
        // Terms
        .route("/terms", get(api::list_terms))
        .route("/terms/{slug}", get(api::get_term))
        // Profiles
        .route("/profiles", get(api::list_profiles))
        .route("/profiles/{username}", get(api::get_profile))
        .route("/profiles/{username}/terms", get(api::get_profile_terms))
        // Search
        .route("/search", get(api::search_terms))
        .nest("/admin", admin_routes);

    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/sitemap.xml", get(api::sitemap_xml))
        .route("/robots.txt", get(api::robots_txt));

    Router::new()
        .nest("/api", api_routes)
        .merge(public_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
