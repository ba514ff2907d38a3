use crate::RowId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub title: String,
    pub main_genre: String,
    pub side_genre: String,
    pub director: String,
    /// Free-text cast list, e.g. "Tim Robbins, Morgan Freeman".
    pub actors: String,
}

impl CatalogEntry {
    pub fn new(
        title: impl Into<String>,
        main_genre: impl Into<String>,
        side_genre: impl Into<String>,
        director: impl Into<String>,
        actors: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            main_genre: main_genre.into(),
            side_genre: side_genre.into(),
            director: director.into(),
            actors: actors.into(),
        }
    }

    /// Genres, director and cast joined by single spaces and lower-cased.
    /// The title never contributes.
    pub fn tag_text(&self) -> String {
        [
            self.main_genre.as_str(),
            self.side_genre.as_str(),
            self.director.as_str(),
            self.actors.as_str(),
        ]
        .join(" ")
        .to_lowercase()
    }
}

pub(crate) fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Ordered, immutable collection of entries keyed case-insensitively by title.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    by_title: HashMap<String, RowId>,
}

impl Catalog {
    /// Build a catalog preserving input order. Later entries whose title
    /// collides (ignoring case) with an earlier one are dropped.
    pub fn new(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut catalog = Catalog::default();
        let mut duplicates = 0usize;
        for entry in entries {
            let key = title_key(&entry.title);
            if catalog.by_title.contains_key(&key) {
                duplicates += 1;
                continue;
            }
            catalog.by_title.insert(key, catalog.entries.len());
            catalog.entries.push(entry);
        }
        if duplicates > 0 {
            tracing::warn!(duplicates, "dropped catalog entries with duplicate titles");
        }
        catalog
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn entries(&self) -> &[CatalogEntry] { &self.entries }
    pub fn get(&self, row: RowId) -> Option<&CatalogEntry> { self.entries.get(row) }

    /// Case-insensitive title lookup.
    pub fn find(&self, title: &str) -> Option<RowId> {
        self.by_title.get(&title_key(title)).copied()
    }

    /// Distinct main genres, sorted.
    pub fn genres(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.main_genre.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
