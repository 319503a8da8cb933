/// Maximum number of candidate titles taken from the language model
pub const MAX_CANDIDATE_TITLES: usize = 3;

/// Number of description tokens used when no plan could be extracted
pub const FALLBACK_TOKEN_COUNT: usize = 10;

/// How the movie database should be queried for one description
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionPlan {
    /// A single keyword search, optionally restricted to a release year
    Keywords { keywords: String, year: Option<String> },
    /// One search per candidate title, in the model's order
    Titles(Vec<String>),
}

impl ExtractionPlan {
    /// Heuristic plan built from the first words of the description
    pub fn fallback(description: &str) -> Self {
        let keywords = description
            .split_whitespace()
            .take(FALLBACK_TOKEN_COUNT)
            .collect::<Vec<_>>()
            .join(" ");

        ExtractionPlan::Keywords {
            keywords,
            year: None,
        }
    }

    /// Searches to run for this plan
    pub fn queries(&self) -> Vec<SearchQuery> {
        match self {
            ExtractionPlan::Keywords { keywords, year } => vec![SearchQuery {
                text: keywords.clone(),
                year: year.clone(),
            }],
            ExtractionPlan::Titles(titles) => titles
                .iter()
                .map(|title| SearchQuery {
                    text: title.clone(),
                    year: None,
                })
                .collect(),
        }
    }

    /// Short name for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionPlan::Keywords { .. } => "keywords",
            ExtractionPlan::Titles(_) => "titles",
        }
    }
}

/// One outbound movie search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub year: Option<String>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            year: None,
        }
    }
}
