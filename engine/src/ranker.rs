//! Top-k similar titles for a catalog title, with an optional genre restriction.

use crate::catalog::{Catalog, CatalogEntry};
use crate::error::{EngineError, Result};
use crate::similarity;
use crate::vectorizer::{VectorMatrix, Vocabulary};
use crate::RowId;
use serde::Serialize;
use std::fmt;

/// Score given to rows that may not be ranked (wrong genre).
pub const EXCLUDED: f32 = -1.0;

pub const DEFAULT_K: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenreFilter {
    #[default]
    All,
    /// Exact, case-sensitive match on the main genre.
    Only(String),
}

impl GenreFilter {
    fn admits(&self, entry: &CatalogEntry) -> bool {
        match self {
            GenreFilter::All => true,
            GenreFilter::Only(g) => entry.main_genre == *g,
        }
    }
}

impl From<&str> for GenreFilter {
    fn from(s: &str) -> Self {
        if s == "All" { GenreFilter::All } else { GenreFilter::Only(s.to_string()) }
    }
}

impl fmt::Display for GenreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenreFilter::All => f.write_str("All"),
            GenreFilter::Only(g) => f.write_str(g),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation<'a> {
    pub row: RowId,
    pub entry: &'a CatalogEntry,
    pub score: f32,
}

/// Rank catalog rows by cosine similarity to the row titled `query`.
///
/// Rows outside `genre` are scored [`EXCLUDED`] and never returned. The
/// query row itself is removed after ranking regardless of where it sorts.
/// Ties keep catalog order. Returns at most `k` results; an empty list is a
/// valid outcome.
pub fn recommend<'a>(
    query: &str,
    genre: &GenreFilter,
    catalog: &'a Catalog,
    vocabulary: &Vocabulary,
    matrix: &VectorMatrix,
    k: usize,
) -> Result<Vec<Recommendation<'a>>> {
    debug_assert_eq!(matrix.rows(), catalog.len());
    debug_assert_eq!(matrix.columns(), vocabulary.len());

    let unknown = || EngineError::UnknownTitle(query.to_string());
    let idx = catalog.find(query).ok_or_else(unknown)?;
    let query_vector = matrix.row(idx).ok_or_else(unknown)?;

    let mut scores = similarity::scores(query_vector, matrix);
    if *genre != GenreFilter::All {
        for (score, entry) in scores.iter_mut().zip(catalog.entries()) {
            if !genre.admits(entry) {
                *score = EXCLUDED;
            }
        }
    }

    let mut order: Vec<RowId> = (0..scores.len()).collect();
    order.sort_by(|a, b| scores[*b].total_cmp(&scores[*a]));

    let results: Vec<Recommendation<'a>> = order
        .into_iter()
        .filter(|&row| row != idx && scores[row] != EXCLUDED)
        .take(k)
        .filter_map(|row| catalog.get(row).map(|entry| Recommendation { row, entry, score: scores[row] }))
        .collect();

    tracing::debug!(query, genre = %genre, k, returned = results.len(), "ranked recommendations");
    Ok(results)
}
