pub mod error;
pub mod metadata;
pub mod tmdb;

use anyhow::Result;
use axum::{extract::{Query, State}, routing::get, Json, Router};
use engine::{Engine, EngineError, GenreFilter, VectorizerConfig};
use error::{ApiError, ApiResult};
use metadata::{MetadataProvider, MovieDetail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const MAX_K: usize = 50;

#[derive(Deserialize)]
pub struct RecommendParams {
    pub title: String,
    #[serde(default = "default_genre")]
    pub genre: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_genre() -> String { "All".to_string() }
fn default_k() -> usize { engine::ranker::DEFAULT_K }

#[derive(Deserialize)]
pub struct MovieParams {
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Ranked from the local catalog.
    Catalog,
    /// Title unknown locally; list came from the metadata service.
    External,
}

#[derive(Serialize)]
pub struct RecommendResponse {
    pub query: String,
    pub genre: String,
    pub source: Source,
    pub took_s: f64,
    pub results: Vec<RecommendedMovie>,
}

#[derive(Serialize)]
pub struct RecommendedMovie {
    pub title: String,
    pub main_genre: Option<String>,
    pub score: Option<f32>,
    pub detail: Option<MovieDetail>,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub metadata: Arc<dyn MetadataProvider>,
}

impl AppState {
    pub fn new(engine: Engine, metadata: Arc<dyn MetadataProvider>) -> Self {
        Self { engine: Arc::new(engine), metadata }
    }

    /// Load the catalog and vectorize it once for the process lifetime.
    pub fn load<P: AsRef<Path>>(catalog: P, config: &VectorizerConfig, metadata: Arc<dyn MetadataProvider>) -> Result<Self> {
        let engine = Engine::from_path(catalog, config)?;
        tracing::info!(entries = engine.catalog().len(), provider = metadata.name(), "recommendation engine ready");
        Ok(Self::new(engine, metadata))
    }
}

pub fn build_app(state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/genres", get(genres_handler))
        .route("/recommend", get(recommend_handler))
        .route("/movie", get(movie_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// "All" followed by every main genre in the catalog.
pub async fn genres_handler(State(state): State<AppState>) -> Json<Vec<String>> {
    let mut genres = vec![GenreFilter::All.to_string()];
    genres.extend(state.engine.catalog().genres());
    Json(genres)
}

pub async fn recommend_handler(
    State(state): State<AppState>,
    Query(params): Query<RecommendParams>,
) -> ApiResult<Json<RecommendResponse>> {
    let start = std::time::Instant::now();
    let title = params.title.trim();
    if title.is_empty() {
        return Err(ApiError::InvalidInput("title must not be empty".into()));
    }
    let k = params.k.clamp(1, MAX_K);
    let genre = GenreFilter::from(params.genre.as_str());

    // (title, main genre, score) per result
    let local: Option<Vec<(String, Option<String>, Option<f32>)>> = match state.engine.recommend(title, &genre, k) {
        Ok(recs) => Some(
            recs.into_iter()
                .map(|r| (r.entry.title.clone(), Some(r.entry.main_genre.clone()), Some(r.score)))
                .collect(),
        ),
        Err(EngineError::UnknownTitle(_)) => None,
        Err(e) => return Err(ApiError::Internal(e.to_string())),
    };

    let (source, ranked) = match local {
        Some(ranked) => (Source::Catalog, ranked),
        None => {
            let external = state.metadata.recommend_similar_externally(title, k).await?;
            if external.is_empty() {
                return Err(ApiError::NotFound(format!("no recommendations found for '{title}'")));
            }
            (Source::External, external.into_iter().map(|t| (t, None, None)).collect())
        }
    };

    let mut results = Vec::with_capacity(ranked.len());
    for (title, main_genre, score) in ranked {
        let detail = fetch_detail(state.metadata.as_ref(), &title).await;
        results.push(RecommendedMovie { title, main_genre, score, detail });
    }

    let elapsed = start.elapsed();
    tracing::debug!(query = title, ?source, results = results.len(), "recommend served");
    Ok(Json(RecommendResponse {
        query: title.to_string(),
        genre: genre.to_string(),
        source,
        took_s: elapsed.as_secs_f64(),
        results,
    }))
}

/// Details for the movie a client has selected. Selection lives client-side.
pub async fn movie_handler(
    State(state): State<AppState>,
    Query(params): Query<MovieParams>,
) -> ApiResult<Json<MovieDetail>> {
    let title = params.title.trim();
    if title.is_empty() {
        return Err(ApiError::InvalidInput("title must not be empty".into()));
    }
    state
        .metadata
        .lookup_details(title)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no details for '{title}'")))
}

async fn fetch_detail(provider: &dyn MetadataProvider, title: &str) -> Option<MovieDetail> {
    match provider.lookup_details(title).await {
        Ok(detail) => detail,
        Err(e) => {
            tracing::warn!(error = %e, title, provider = provider.name(), "detail lookup failed");
            None
        }
    }
}
