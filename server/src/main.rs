use anyhow::Result;
use clap::Parser;
use engine::VectorizerConfig;
use server::metadata::{MetadataProvider, NoopMetadataProvider};
use server::tmdb::{TmdbProvider, DEFAULT_API_URL};
use server::{build_app, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Catalog file (.csv, .json or .jsonl)
    #[arg(long, default_value = "./data/movies.csv")]
    catalog: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Maximum number of vocabulary tokens
    #[arg(long, default_value_t = engine::vectorizer::DEFAULT_MAX_VOCABULARY_SIZE)]
    max_vocabulary: usize,
    /// TMDB API key; without it details and the unknown-title fallback are disabled
    #[arg(long, env = "TMDB_API_KEY")]
    tmdb_api_key: Option<String>,
    /// TMDB API base URL
    #[arg(long, env = "TMDB_API_URL", default_value = DEFAULT_API_URL)]
    tmdb_api_url: String,
    /// Metadata request timeout seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let metadata: Arc<dyn MetadataProvider> = match args.tmdb_api_key {
        Some(key) => Arc::new(TmdbProvider::new(key, args.tmdb_api_url, Duration::from_secs(args.timeout_secs))?),
        None => {
            tracing::warn!("TMDB_API_KEY not set; movie details and external fallback disabled");
            Arc::new(NoopMetadataProvider)
        }
    };
    let config = VectorizerConfig { max_vocabulary_size: args.max_vocabulary, ..Default::default() };
    let state = AppState::load(&args.catalog, &config, metadata)?;
    let app = build_app(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
