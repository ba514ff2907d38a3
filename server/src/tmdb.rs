//! The Movie Database (TMDB) v3 metadata provider.

use crate::metadata::{MetadataError, MetadataProvider, MetadataResult, MovieDetail};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.themoviedb.org/3";
const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
const NO_OVERVIEW: &str = "No overview available.";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct ApiMovieDetails {
    #[serde(default)]
    title: String,
    overview: Option<String>,
    #[serde(default)]
    genres: Vec<ApiGenre>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiGenre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RecommendationsResponse {
    #[serde(default)]
    results: Vec<ApiRecommendation>,
}

#[derive(Debug, Deserialize)]
struct ApiRecommendation {
    title: String,
}

impl From<ApiMovieDetails> for MovieDetail {
    fn from(d: ApiMovieDetails) -> Self {
        Self {
            title: d.title,
            overview: d.overview.filter(|o| !o.trim().is_empty()).unwrap_or_else(|| NO_OVERVIEW.to_string()),
            genres: d.genres.into_iter().map(|g| g.name).collect(),
            poster_url: d.poster_path.filter(|p| !p.is_empty()).map(|p| poster_url(&p)),
        }
    }
}

pub fn poster_url(poster_path: &str) -> String {
    if poster_path.starts_with('/') {
        format!("{POSTER_BASE_URL}{poster_path}")
    } else {
        format!("{POSTER_BASE_URL}/{poster_path}")
    }
}

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> MetadataResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self { http_client, api_key, api_url: api_url.trim_end_matches('/').to_string() })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> MetadataResult<T> {
        let url = format!("{}{}", self.api_url, path);
        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataError::Status { status, body });
        }
        Ok(response.json().await?)
    }

    /// TMDB id of the first search hit for `title`.
    async fn search(&self, title: &str) -> MetadataResult<Option<u64>> {
        let found: SearchResponse = self.get("/search/movie", &[("query", title)]).await?;
        Ok(found.results.first().map(|r| r.id))
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn lookup_details(&self, title: &str) -> MetadataResult<Option<MovieDetail>> {
        let Some(id) = self.search(title).await? else {
            tracing::debug!(title, "no TMDB match");
            return Ok(None);
        };
        let details: ApiMovieDetails = self.get(&format!("/movie/{id}"), &[]).await?;
        Ok(Some(details.into()))
    }

    async fn recommend_similar_externally(&self, title: &str, limit: usize) -> MetadataResult<Vec<String>> {
        let Some(id) = self.search(title).await? else {
            return Ok(Vec::new());
        };
        let recs: RecommendationsResponse = self
            .get(&format!("/movie/{id}/recommendations"), &[("language", "en-US")])
            .await?;
        let titles: Vec<String> = recs.results.into_iter().take(limit).map(|r| r.title).collect();
        tracing::info!(title, results = titles.len(), provider = "tmdb", "external recommendations fetched");
        Ok(titles)
    }

    fn name(&self) -> &'static str { "tmdb" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_conversion_fills_defaults() {
        let raw: ApiMovieDetails = serde_json::from_str(
            r#"{"title":"Heat","overview":"","genres":[{"id":28,"name":"Action"},{"id":80,"name":"Crime"}],"poster_path":"/abc.jpg"}"#,
        )
        .unwrap();
        let detail = MovieDetail::from(raw);
        assert_eq!(detail.overview, NO_OVERVIEW);
        assert_eq!(detail.genres, vec!["Action", "Crime"]);
        assert_eq!(detail.poster_url.as_deref(), Some("https://image.tmdb.org/t/p/w500/abc.jpg"));
    }

    #[test]
    fn missing_poster_stays_empty() {
        let raw: ApiMovieDetails = serde_json::from_str(r#"{"title":"X","poster_path":null}"#).unwrap();
        assert_eq!(MovieDetail::from(raw).poster_url, None);
    }
}
