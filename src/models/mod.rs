pub mod movie;
pub mod query;

pub use movie::{Confidence, MovieCandidate, TmdbMovie, TmdbSearchResponse};
pub use query::{ExtractionPlan, SearchQuery};
