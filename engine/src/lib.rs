//! Content-based movie similarity engine.
//!
//! The catalog is vectorized once into bag-of-words count rows over a capped
//! vocabulary; queries are answered by cosine similarity against those rows.
//! Everything in here is pure and read-only after [`Engine::build`], so an
//! `Engine` can be shared across threads behind an `Arc` without locking.

pub mod catalog;
pub mod error;
pub mod loader;
pub mod ranker;
pub mod similarity;
pub mod tokenizer;
pub mod vectorizer;

use std::path::Path;

pub use catalog::{Catalog, CatalogEntry};
pub use error::{EngineError, Result};
pub use ranker::{GenreFilter, Recommendation};
pub use vectorizer::{VectorMatrix, VectorizerConfig, Vocabulary};

/// Column index into the vocabulary.
pub type TermId = u32;
/// Row index into the catalog and the vector matrix.
pub type RowId = usize;

/// Catalog, vocabulary and vector matrix built together and held for the
/// process lifetime.
#[derive(Debug)]
pub struct Engine {
    catalog: Catalog,
    vocabulary: Vocabulary,
    matrix: VectorMatrix,
}

impl Engine {
    pub fn build(catalog: Catalog, config: &VectorizerConfig) -> Result<Self> {
        let (vocabulary, matrix) = vectorizer::build(&catalog, config)?;
        tracing::info!(
            rows = matrix.rows(),
            columns = matrix.columns(),
            "engine built"
        );
        Ok(Self { catalog, vocabulary, matrix })
    }

    /// Load a catalog file and build the engine from it.
    pub fn from_path<P: AsRef<Path>>(path: P, config: &VectorizerConfig) -> Result<Self> {
        let catalog = loader::load_catalog(path)?;
        Self::build(catalog, config)
    }

    pub fn catalog(&self) -> &Catalog { &self.catalog }
    pub fn vocabulary(&self) -> &Vocabulary { &self.vocabulary }
    pub fn matrix(&self) -> &VectorMatrix { &self.matrix }

    pub fn recommend(&self, query: &str, genre: &GenreFilter, k: usize) -> Result<Vec<Recommendation<'_>>> {
        ranker::recommend(query, genre, &self.catalog, &self.vocabulary, &self.matrix, k)
    }
}
