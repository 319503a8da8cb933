use std::sync::Arc;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::providers::{
    ChatCompletionExtractor, KeywordExtractor, MovieSearchProvider, TmdbProvider,
};
use crate::services::MovieIdentifier;

/// Shared application state
///
/// A provider is `None` when its credential is not configured. The server still
/// starts; identification requests fail with a configuration error instead.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Option<Arc<dyn KeywordExtractor>>,
    pub movie_search: Option<Arc<dyn MovieSearchProvider>>,
}

impl AppState {
    pub fn new(
        extractor: Option<Arc<dyn KeywordExtractor>>,
        movie_search: Option<Arc<dyn MovieSearchProvider>>,
    ) -> Self {
        Self {
            extractor,
            movie_search,
        }
    }

    /// Builds the real providers for whichever credentials are present
    pub fn from_config(config: &Config) -> Self {
        let extractor = config.openai_api_key.clone().map(|key| {
            Arc::new(ChatCompletionExtractor::new(
                key,
                config.llm_api_url.clone(),
                config.llm_model.clone(),
            )) as Arc<dyn KeywordExtractor>
        });

        let movie_search = config.tmdb_api_key.clone().map(|key| {
            Arc::new(TmdbProvider::new(
                key,
                config.tmdb_api_url.clone(),
                config.search_language.clone(),
            )) as Arc<dyn MovieSearchProvider>
        });

        Self::new(extractor, movie_search)
    }

    /// The identification pipeline, or a configuration error naming what is missing
    pub fn identifier(&self) -> AppResult<MovieIdentifier> {
        match (&self.extractor, &self.movie_search) {
            (Some(extractor), Some(movie_search)) => Ok(MovieIdentifier::new(
                extractor.clone(),
                movie_search.clone(),
            )),
            (extractor, movie_search) => {
                let mut missing = Vec::new();
                if movie_search.is_none() {
                    missing.push("TMDB_API_KEY");
                }
                if extractor.is_none() {
                    missing.push("OPENAI_API_KEY");
                }
                Err(AppError::Configuration(format!(
                    "API key not configured: {}",
                    missing.join(", ")
                )))
            }
        }
    }
}
