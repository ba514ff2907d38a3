//! Bag-of-words vectorization of catalog tag text.

use crate::catalog::Catalog;
use crate::error::{EngineError, Result};
use crate::tokenizer::{default_stop_words, tokenize};
use crate::TermId;
use std::collections::{BTreeMap, HashMap, HashSet};

pub const DEFAULT_MAX_VOCABULARY_SIZE: usize = 5000;

/// Tokenization policy for [`build`].
#[derive(Debug, Clone)]
pub struct VectorizerConfig {
    pub max_vocabulary_size: usize,
    pub stop_words: HashSet<String>,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self { max_vocabulary_size: DEFAULT_MAX_VOCABULARY_SIZE, stop_words: default_stop_words() }
    }
}

/// Token to column mapping, closed over the catalog it was built from.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, TermId>,
    stop_words: HashSet<String>,
}

impl Vocabulary {
    pub fn len(&self) -> usize { self.terms.len() }
    pub fn is_empty(&self) -> bool { self.terms.is_empty() }
    pub fn get(&self, token: &str) -> Option<TermId> { self.index.get(token).copied() }
    pub fn term(&self, id: TermId) -> Option<&str> { self.terms.get(id as usize).map(String::as_str) }

    /// Tokens in column order.
    pub fn terms(&self) -> impl Iterator<Item = (TermId, &str)> {
        self.terms.iter().enumerate().map(|(i, t)| (i as TermId, t.as_str()))
    }

    /// Count vector for arbitrary text. Tokens outside the vocabulary are ignored.
    pub fn vectorize(&self, text: &str) -> CountVector {
        let mut counts: BTreeMap<TermId, u32> = BTreeMap::new();
        for token in tokenize(text, &self.stop_words) {
            if let Some(tid) = self.get(&token) {
                *counts.entry(tid).or_insert(0) += 1;
            }
        }
        CountVector::from_counts(counts)
    }
}

/// Sparse, non-negative count vector with its L2 norm precomputed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountVector {
    /// (column, count) sorted by column; counts are never zero.
    entries: Vec<(TermId, u32)>,
    norm: f64,
}

impl CountVector {
    fn from_counts(counts: BTreeMap<TermId, u32>) -> Self {
        let entries: Vec<(TermId, u32)> = counts.into_iter().filter(|(_, c)| *c > 0).collect();
        let norm = entries.iter().map(|(_, c)| (*c as f64) * (*c as f64)).sum::<f64>().sqrt();
        Self { entries, norm }
    }

    pub fn entries(&self) -> &[(TermId, u32)] { &self.entries }
    pub fn norm(&self) -> f64 { self.norm }
    pub fn is_zero(&self) -> bool { self.entries.is_empty() }

    pub fn count(&self, column: TermId) -> u32 {
        self.entries
            .binary_search_by_key(&column, |(c, _)| *c)
            .map(|i| self.entries[i].1)
            .unwrap_or(0)
    }

    pub fn to_dense(&self, columns: usize) -> Vec<u32> {
        let mut out = vec![0u32; columns];
        for (c, n) in &self.entries {
            out[*c as usize] = *n;
        }
        out
    }
}

/// One count vector per catalog row, aligned with catalog order.
#[derive(Debug, Clone, Default)]
pub struct VectorMatrix {
    columns: usize,
    rows: Vec<CountVector>,
}

impl VectorMatrix {
    pub fn rows(&self) -> usize { self.rows.len() }
    pub fn columns(&self) -> usize { self.columns }
    pub fn row(&self, row: usize) -> Option<&CountVector> { self.rows.get(row) }
    pub fn iter(&self) -> impl Iterator<Item = &CountVector> { self.rows.iter() }

    /// The fixed-length vector for `row`.
    pub fn dense_row(&self, row: usize) -> Option<Vec<u32>> {
        self.rows.get(row).map(|r| r.to_dense(self.columns))
    }
}

/// Build the vocabulary and the count matrix for a catalog.
///
/// The vocabulary holds the `max_vocabulary_size` tokens with the highest
/// total count across the corpus, ties going to the token seen first.
/// Column indices follow first-encounter order among the selected tokens.
pub fn build(catalog: &Catalog, config: &VectorizerConfig) -> Result<(Vocabulary, VectorMatrix)> {
    if catalog.is_empty() {
        return Err(EngineError::EmptyCatalog);
    }

    let docs: Vec<Vec<String>> = catalog
        .entries()
        .iter()
        .map(|e| tokenize(&e.tag_text(), &config.stop_words))
        .collect();

    // Corpus frequencies, remembering first-encounter order
    let mut seen_order: Vec<&str> = Vec::new();
    let mut freq: HashMap<&str, u64> = HashMap::new();
    for token in docs.iter().flatten() {
        let n = freq.entry(token.as_str()).or_insert_with(|| {
            seen_order.push(token.as_str());
            0
        });
        *n += 1;
    }

    let mut ranked = seen_order.clone();
    // stable: equal counts keep first-encounter order
    ranked.sort_by(|a, b| freq[b].cmp(&freq[a]));
    ranked.truncate(config.max_vocabulary_size);
    let selected: HashSet<&str> = ranked.into_iter().collect();

    let mut vocabulary = Vocabulary { stop_words: config.stop_words.clone(), ..Default::default() };
    for token in seen_order.into_iter().filter(|t| selected.contains(t)) {
        let id = vocabulary.terms.len() as TermId;
        vocabulary.index.insert(token.to_string(), id);
        vocabulary.terms.push(token.to_string());
    }

    let rows = docs
        .iter()
        .map(|tokens| {
            let mut counts: BTreeMap<TermId, u32> = BTreeMap::new();
            for token in tokens {
                if let Some(tid) = vocabulary.get(token) {
                    *counts.entry(tid).or_insert(0) += 1;
                }
            }
            CountVector::from_counts(counts)
        })
        .collect();

    let matrix = VectorMatrix { columns: vocabulary.len(), rows };
    tracing::debug!(terms = vocabulary.len(), rows = matrix.rows(), "vectorized catalog");
    Ok((vocabulary, matrix))
}
