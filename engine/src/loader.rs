//! Reads catalog files (CSV, JSON, JSONL) into a [`Catalog`].
//!
//! Field names follow the source dataset: `Movie_Title`, `main_genre`,
//! `side_genre`, `Director`, `Actors`. Other columns are ignored. Rows with
//! any of the five fields missing or blank are dropped.

use crate::catalog::{Catalog, CatalogEntry};
use crate::error::{EngineError, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Movie_Title", default)]
    title: Option<String>,
    #[serde(default)]
    main_genre: Option<String>,
    #[serde(default)]
    side_genre: Option<String>,
    #[serde(rename = "Director", default)]
    director: Option<String>,
    #[serde(rename = "Actors", default)]
    actors: Option<String>,
}

impl RawRow {
    fn into_entry(self) -> Option<CatalogEntry> {
        fn field(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }
        Some(CatalogEntry {
            title: field(self.title)?,
            main_genre: field(self.main_genre)?,
            side_genre: field(self.side_genre)?,
            director: field(self.director)?,
            actors: field(self.actors)?,
        })
    }
}

#[derive(Default)]
struct Rows {
    entries: Vec<CatalogEntry>,
    dropped: usize,
}

impl Rows {
    fn push(&mut self, raw: RawRow) {
        match raw.into_entry() {
            Some(e) => self.entries.push(e),
            None => self.dropped += 1,
        }
    }

    fn finish(self) -> Catalog {
        if self.dropped > 0 {
            tracing::warn!(dropped = self.dropped, "dropped incomplete catalog rows");
        }
        let catalog = Catalog::new(self.entries);
        tracing::info!(entries = catalog.len(), "catalog loaded");
        catalog
    }
}

/// Load a catalog file, choosing the parser from its extension.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());
    let file = File::open(path)?;
    match ext.as_deref() {
        Some("csv") => read_csv(file),
        Some("json") => read_json(file),
        Some("jsonl") => read_jsonl(BufReader::new(file)),
        _ => Err(EngineError::UnsupportedFormat(path.to_path_buf())),
    }
}

pub fn read_csv<R: Read>(reader: R) -> Result<Catalog> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut rows = Rows::default();
    for record in rdr.deserialize::<RawRow>() {
        rows.push(record?);
    }
    Ok(rows.finish())
}

pub fn read_json<R: Read>(reader: R) -> Result<Catalog> {
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(reader))?;
    let mut rows = Rows::default();
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                rows.push(serde_json::from_value(v)?);
            }
        }
        serde_json::Value::Object(_) => rows.push(serde_json::from_value(json)?),
        _ => {
            return Err(EngineError::MalformedCatalog(
                "top-level JSON must be an object or an array of objects".to_string(),
            ))
        }
    }
    Ok(rows.finish())
}

pub fn read_jsonl<R: BufRead>(reader: R) -> Result<Catalog> {
    let mut rows = Rows::default();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        rows.push(serde_json::from_str(&line)?);
    }
    Ok(rows.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_drops_incomplete_rows_and_ignores_extra_columns() {
        let data = "\
Movie_Title,Year,main_genre,side_genre,Director,Actors
Heat,1995,Action,Crime,Michael Mann,\"Al Pacino, Robert De Niro\"
Nameless,2001,Drama,,Someone,Someone Else
Ronin,1998,Action,Thriller,John Frankenheimer,Robert De Niro
";
        let catalog = read_csv(data.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().actors, "Al Pacino, Robert De Niro");
        assert_eq!(catalog.find("ronin"), Some(1));
        assert_eq!(catalog.find("nameless"), None);
    }

    #[test]
    fn jsonl_skips_blank_lines() {
        let data = r#"{"Movie_Title":"Heat","main_genre":"Action","side_genre":"Crime","Director":"Michael Mann","Actors":"Al Pacino"}

{"Movie_Title":"Ronin","main_genre":"Action","side_genre":"Thriller","Director":"John Frankenheimer"}
"#;
        let catalog = read_jsonl(data.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().title, "Heat");
    }

    #[test]
    fn json_scalar_is_rejected() {
        let err = read_json("42".as_bytes()).unwrap_err();
        assert!(matches!(err, EngineError::MalformedCatalog(_)));
    }

    #[test]
    fn json_accepts_array_and_single_object() {
        let one = r#"{"Movie_Title":"Heat","main_genre":"Action","side_genre":"Crime","Director":"Michael Mann","Actors":"Al Pacino"}"#;
        assert_eq!(read_json(one.as_bytes()).unwrap().len(), 1);
        let many = format!("[{one},{one}]");
        // second copy is a duplicate title
        assert_eq!(read_json(many.as_bytes()).unwrap().len(), 1);
    }
}
