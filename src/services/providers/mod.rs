/// External data providers
///
/// The identification pipeline talks to two upstreams: a language model that turns a
/// scene description into a search plan, and a movie database that resolves each
/// query. Both sit behind traits so the pipeline can be exercised without network
/// access.
use crate::{
    error::AppResult,
    models::{ExtractionPlan, SearchQuery, TmdbMovie},
};

pub mod openai;
pub mod tmdb;

pub use openai::ChatCompletionExtractor;
pub use tmdb::TmdbProvider;

/// Turns free text into a movie search plan
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait KeywordExtractor: Send + Sync {
    /// Asks the upstream model for candidate titles or keywords.
    ///
    /// Errors are recoverable: the pipeline replaces them with a heuristic plan.
    async fn extract(&self, description: &str) -> AppResult<ExtractionPlan>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Keyword search against a movie database
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieSearchProvider: Send + Sync {
    /// Search for movies, returning results in the provider's relevance order
    async fn search_movies(&self, query: &SearchQuery) -> AppResult<Vec<TmdbMovie>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
