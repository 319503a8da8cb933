use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{ExtractionPlan, MovieCandidate, SearchQuery, TmdbMovie},
    services::providers::{KeywordExtractor, MovieSearchProvider},
};

/// Upper bound on candidates returned for one description
pub const MAX_CANDIDATES: usize = 4;

/// Identifies movies from a scene description
///
/// Runs the extraction step, resolves every resulting query against the movie
/// database and labels the merged results by position.
#[derive(Clone)]
pub struct MovieIdentifier {
    extractor: Arc<dyn KeywordExtractor>,
    movie_search: Arc<dyn MovieSearchProvider>,
}

impl MovieIdentifier {
    pub fn new(
        extractor: Arc<dyn KeywordExtractor>,
        movie_search: Arc<dyn MovieSearchProvider>,
    ) -> Self {
        Self {
            extractor,
            movie_search,
        }
    }

    pub async fn identify(&self, description: &str) -> AppResult<Vec<MovieCandidate>> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::InvalidInput(
                "Description cannot be empty".to_string(),
            ));
        }

        let plan = self.extract_plan(description).await;
        let queries = plan.queries();
        // A keyword search is ranked by relevance; a title search only trusts its top hit
        let per_query = match plan {
            ExtractionPlan::Keywords { .. } => MAX_CANDIDATES,
            ExtractionPlan::Titles(_) => 1,
        };

        let query_count = queries.len();
        let outcomes = search_all(self.movie_search.clone(), queries).await;

        let mut movies = Vec::new();
        let mut last_error = None;
        let mut failed = 0;
        for outcome in outcomes {
            match outcome {
                Ok(results) => movies.extend(results.into_iter().take(per_query)),
                Err(e) => {
                    failed += 1;
                    last_error = Some(e);
                }
            }
        }

        tracing::info!(
            queries = query_count,
            failed = failed,
            results = movies.len(),
            provider = self.movie_search.name(),
            "Search phase completed"
        );

        if failed == query_count {
            if let Some(e) = last_error {
                return Err(e);
            }
        }

        let candidates = rank(movies);
        tracing::info!(candidates = candidates.len(), "Identification completed");

        Ok(candidates)
    }

    /// Runs the extraction step; never fails
    async fn extract_plan(&self, description: &str) -> ExtractionPlan {
        match self.extractor.extract(description).await {
            Ok(plan) => {
                let queries: Vec<String> = plan.queries().into_iter().map(|q| q.text).collect();
                tracing::info!(
                    plan = plan.kind(),
                    queries = ?queries,
                    provider = self.extractor.name(),
                    "Extraction completed"
                );
                plan
            }
            Err(e) => {
                let plan = ExtractionPlan::fallback(description);
                tracing::warn!(
                    error = %e,
                    provider = self.extractor.name(),
                    "Extraction failed, using description keywords"
                );
                plan
            }
        }
    }
}

/// Runs every query concurrently, returning outcomes in query order
///
/// A panicked search task is reported as an error for that query only.
pub async fn search_all(
    provider: Arc<dyn MovieSearchProvider>,
    queries: Vec<SearchQuery>,
) -> Vec<AppResult<Vec<TmdbMovie>>> {
    let mut tasks = Vec::with_capacity(queries.len());

    for query in queries {
        let provider = provider.clone();
        let task = tokio::spawn(async move { provider.search_movies(&query).await });
        tasks.push(task);
    }

    let mut outcomes = Vec::with_capacity(tasks.len());

    for task in tasks {
        match task.await {
            Ok(Ok(results)) => outcomes.push(Ok(results)),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Movie search failed for query");
                outcomes.push(Err(e));
            }
            Err(e) => {
                tracing::error!(error = %e, "Task join error");
                outcomes.push(Err(AppError::Internal(e.to_string())));
            }
        }
    }

    outcomes
}

/// Drops repeated movies, caps the list and assigns positional confidence
pub fn rank(movies: Vec<TmdbMovie>) -> Vec<MovieCandidate> {
    let mut seen = HashSet::new();

    movies
        .into_iter()
        .filter(|movie| movie.id.map_or(true, |id| seen.insert(id)))
        .take(MAX_CANDIDATES)
        .enumerate()
        .map(|(index, movie)| MovieCandidate::from_search_result(movie, index))
        .collect()
}
