/// TMDB movie search provider
///
/// API Flow:
/// 1. Search: /search/movie?query=... → results in relevance order
///
/// Only title, release date, overview and poster path are consumed.
use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{SearchQuery, TmdbMovie, TmdbSearchResponse},
    services::{extraction::is_release_year, providers::MovieSearchProvider},
};

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String, language: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            language,
        }
    }

    /// Query string for a search; the year filter is only sent when it is a real year
    fn search_params(&self, query: &SearchQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("api_key", self.api_key.clone()),
            ("query", query.text.clone()),
            ("language", self.language.clone()),
            ("include_adult", "false".to_string()),
        ];

        if let Some(year) = query.year.as_deref().filter(|y| is_release_year(y)) {
            params.push(("year", year.to_string()));
        }

        params
    }
}

#[async_trait::async_trait]
impl MovieSearchProvider for TmdbProvider {
    async fn search_movies(&self, query: &SearchQuery) -> AppResult<Vec<TmdbMovie>> {
        if query.text.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/search/movie", self.api_url.trim_end_matches('/'));
        let response = self
            .http_client
            .get(&url)
            .query(&self.search_params(query))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let search: TmdbSearchResponse = response.json().await?;

        tracing::info!(
            query = %query.text,
            year = ?query.year,
            results = search.results.len(),
            provider = "tmdb",
            "Movie search completed"
        );

        Ok(search.results)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
