use serde::{Deserialize, Serialize};

/// Shown when the movie database has no overview for a result
pub const SYNOPSIS_PLACEHOLDER: &str = "Sinopse não disponível.";

/// Year shown when the release date is unknown
pub const UNKNOWN_YEAR: &str = "N/A";

/// Positional confidence label attached to each candidate
///
/// Serialized with the display labels the front end renders.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Confidence {
    #[serde(rename = "Alta")]
    High,
    #[serde(rename = "Média")]
    Medium,
    #[serde(rename = "Baixa")]
    Low,
}

impl Confidence {
    /// Label for the candidate at `index` in the ranked list
    pub fn from_position(index: usize) -> Self {
        match index {
            0 => Confidence::High,
            1 => Confidence::Medium,
            _ => Confidence::Low,
        }
    }
}

/// A movie returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieCandidate {
    pub title: String,
    /// Four-digit release year, or "N/A"
    pub year: String,
    #[serde(rename = "description")]
    pub synopsis: String,
    pub poster_path: Option<String>,
    pub confidence: Confidence,
}

impl MovieCandidate {
    /// Normalizes a raw search result, labelling it by its final position
    pub fn from_search_result(movie: TmdbMovie, index: usize) -> Self {
        Self {
            year: release_year(movie.release_date.as_deref()),
            synopsis: movie
                .overview
                .filter(|o| !o.trim().is_empty())
                .unwrap_or_else(|| SYNOPSIS_PLACEHOLDER.to_string()),
            title: movie.title,
            poster_path: movie.poster_path,
            confidence: Confidence::from_position(index),
        }
    }
}

fn release_year(release_date: Option<&str>) -> String {
    release_date
        .and_then(|date| date.get(..4))
        .filter(|year| year.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_YEAR.to_string())
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Response from GET /search/movie
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

/// A single TMDB search result; only the fields we render are read
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbMovie {
    #[serde(default)]
    pub id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmdb_movie(title: &str, release_date: Option<&str>, overview: Option<&str>) -> TmdbMovie {
        TmdbMovie {
            id: Some(562),
            title: title.to_string(),
            release_date: release_date.map(str::to_string),
            overview: overview.map(str::to_string),
            poster_path: Some("/yFihWxQcmqcaBR31QM6Y8gT6aYV.jpg".to_string()),
        }
    }

    #[test]
    fn test_confidence_is_positional() {
        assert_eq!(Confidence::from_position(0), Confidence::High);
        assert_eq!(Confidence::from_position(1), Confidence::Medium);
        assert_eq!(Confidence::from_position(2), Confidence::Low);
        assert_eq!(Confidence::from_position(3), Confidence::Low);
    }

    #[test]
    fn test_confidence_serialization() {
        assert_eq!(serde_json::to_string(&Confidence::High).unwrap(), "\"Alta\"");
        assert_eq!(serde_json::to_string(&Confidence::Medium).unwrap(), "\"Média\"");
        assert_eq!(serde_json::to_string(&Confidence::Low).unwrap(), "\"Baixa\"");
    }

    #[test]
    fn test_candidate_from_complete_result() {
        let movie = tmdb_movie(
            "Duro de Matar",
            Some("1988-07-15"),
            Some("Um policial de Nova York enfrenta terroristas."),
        );

        let candidate = MovieCandidate::from_search_result(movie, 0);
        assert_eq!(candidate.title, "Duro de Matar");
        assert_eq!(candidate.year, "1988");
        assert_eq!(
            candidate.synopsis,
            "Um policial de Nova York enfrenta terroristas."
        );
        assert_eq!(
            candidate.poster_path.as_deref(),
            Some("/yFihWxQcmqcaBR31QM6Y8gT6aYV.jpg")
        );
        assert_eq!(candidate.confidence, Confidence::High);
    }

    #[test]
    fn test_candidate_missing_fields_use_placeholders() {
        let candidate = MovieCandidate::from_search_result(tmdb_movie("Obscuro", None, None), 2);
        assert_eq!(candidate.year, UNKNOWN_YEAR);
        assert_eq!(candidate.synopsis, SYNOPSIS_PLACEHOLDER);
        assert_eq!(candidate.confidence, Confidence::Low);
    }

    #[test]
    fn test_candidate_empty_release_date_and_overview() {
        let candidate =
            MovieCandidate::from_search_result(tmdb_movie("Sem Data", Some(""), Some("")), 1);
        assert_eq!(candidate.year, UNKNOWN_YEAR);
        assert_eq!(candidate.synopsis, SYNOPSIS_PLACEHOLDER);
        assert_eq!(candidate.confidence, Confidence::Medium);
    }

    #[test]
    fn test_candidate_wire_format() {
        let candidate = MovieCandidate::from_search_result(
            tmdb_movie("Matrix", Some("1999-03-31"), Some("Neo desperta.")),
            0,
        );
        let json = serde_json::to_value(&candidate).unwrap();
        assert_eq!(json["title"], "Matrix");
        assert_eq!(json["year"], "1999");
        assert_eq!(json["description"], "Neo desperta.");
        assert_eq!(json["confidence"], "Alta");
        assert!(json.get("synopsis").is_none());
    }

    #[test]
    fn test_tmdb_search_response_deserialization() {
        let json = r#"{
            "page": 1,
            "results": [
                {
                    "id": 562,
                    "title": "Duro de Matar",
                    "release_date": "1988-07-15",
                    "overview": "John McClane...",
                    "poster_path": null,
                    "adult": false,
                    "vote_average": 7.8
                }
            ],
            "total_results": 1
        }"#;

        let response: TmdbSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].id, Some(562));
        assert_eq!(response.results[0].title, "Duro de Matar");
        assert_eq!(response.results[0].poster_path, None);
    }
}
