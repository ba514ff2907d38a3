use anyhow::Result;
use clap::{Parser, Subcommand};
use engine::{Engine, GenreFilter, VectorizerConfig};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "recommender")]
#[command(about = "Content-based movie recommendations over a local catalog", long_about = None)]
struct Cli {
    /// Catalog file (.csv, .json or .jsonl)
    #[arg(long, global = true, default_value = "./data/movies.csv")]
    catalog: String,
    /// Maximum number of vocabulary tokens
    #[arg(long, global = true, default_value_t = engine::vectorizer::DEFAULT_MAX_VOCABULARY_SIZE)]
    max_vocabulary: usize,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend titles similar to a catalog title
    Recommend {
        /// Title to look up (case-insensitive)
        title: String,
        /// Main genre to restrict results to, or "All"
        #[arg(long, default_value = "All")]
        genre: String,
        /// Number of recommendations
        #[arg(short, default_value_t = engine::ranker::DEFAULT_K)]
        k: usize,
        /// Print JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List the main genres available for filtering
    Genres,
    /// Show the most heavily used vocabulary tokens
    Vocab {
        #[arg(long, default_value_t = 20)]
        top: usize,
    },
}

#[derive(Serialize)]
struct Row<'a> {
    title: &'a str,
    main_genre: &'a str,
    score: f32,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let config = VectorizerConfig { max_vocabulary_size: cli.max_vocabulary, ..Default::default() };
    let engine = Engine::from_path(&cli.catalog, &config)?;

    match cli.command {
        Commands::Recommend { title, genre, k, json } => recommend(&engine, &title, &genre, k, json),
        Commands::Genres => {
            println!("{}", GenreFilter::All);
            for g in engine.catalog().genres() {
                println!("{g}");
            }
            Ok(())
        }
        Commands::Vocab { top } => {
            vocab(&engine, top);
            Ok(())
        }
    }
}

fn recommend(engine: &Engine, title: &str, genre: &str, k: usize, json: bool) -> Result<()> {
    let recs = engine.recommend(title, &GenreFilter::from(genre), k)?;

    if json {
        let rows: Vec<Row<'_>> = recs
            .iter()
            .map(|r| Row { title: &r.entry.title, main_genre: &r.entry.main_genre, score: r.score })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else if recs.is_empty() {
        println!("No recommendations found.");
    } else {
        for (rank, r) in recs.iter().enumerate() {
            println!("{:>2}. {:<40} {:<12} {:.4}", rank + 1, r.entry.title, r.entry.main_genre, r.score);
        }
    }
    Ok(())
}

fn vocab(engine: &Engine, top: usize) {
    let mut totals = vec![0u64; engine.vocabulary().len()];
    for row in engine.matrix().iter() {
        for (col, n) in row.entries() {
            totals[*col as usize] += *n as u64;
        }
    }
    let mut ranked: Vec<(usize, u64)> = totals.into_iter().enumerate().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    tracing::info!(terms = engine.vocabulary().len(), "vocabulary");
    for (col, n) in ranked.into_iter().take(top) {
        if let Some(term) = engine.vocabulary().term(col as u32) {
            println!("{n:>6}  {term}");
        }
    }
}
