use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{query::MAX_CANDIDATE_TITLES, ExtractionPlan},
};

/// System instruction sent with every extraction request
pub const EXTRACTION_INSTRUCTION: &str = r#"You help people find a movie from a half-remembered scene.
Read the user's description and answer with ONE JSON object and nothing else. No prose, no code fences.
Preferred shape, when you can guess the movie:
{"titles": ["<title 1>", "<title 2>", "<title 3>"]}
with at most 3 titles, most likely first, written in the same language as the description.
If you cannot guess any title, answer instead:
{"keywords": "<short search keywords>", "year": "<4-digit release year, only if the description implies one>"}"#;

/// Fields the model may return; everything else is ignored
#[derive(Debug, Default, Deserialize)]
struct RawPlan {
    #[serde(default)]
    titles: Option<Vec<Value>>,
    #[serde(default)]
    keywords: Option<String>,
    #[serde(default)]
    year: Option<Value>,
}

/// Returns the first balanced `{...}` region of `raw`.
///
/// Braces inside JSON string literals (including escaped quotes) do not count
/// towards the balance.
pub fn first_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in raw[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parses the model's raw answer into a search plan.
///
/// A non-empty `titles` list wins over `keywords`. Any other shape is an
/// [`AppError::Extraction`], which callers recover from with
/// [`ExtractionPlan::fallback`].
pub fn parse_plan(raw: &str) -> AppResult<ExtractionPlan> {
    let object = first_json_object(raw)
        .ok_or_else(|| AppError::Extraction("No JSON object in model output".to_string()))?;

    let plan: RawPlan = serde_json::from_str(object)
        .map_err(|e| AppError::Extraction(format!("Invalid JSON in model output: {}", e)))?;

    let titles: Vec<String> = plan
        .titles
        .unwrap_or_default()
        .into_iter()
        .filter_map(|title| match title {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        })
        .take(MAX_CANDIDATE_TITLES)
        .collect();

    if !titles.is_empty() {
        return Ok(ExtractionPlan::Titles(titles));
    }

    match plan.keywords.map(|k| k.trim().to_string()) {
        Some(keywords) if !keywords.is_empty() => Ok(ExtractionPlan::Keywords {
            keywords,
            year: plan.year.as_ref().and_then(normalize_year),
        }),
        _ => Err(AppError::Extraction(
            "Model output has neither titles nor keywords".to_string(),
        )),
    }
}

/// Accepts `"1994"` or `1994`; anything that is not a 4-digit year is dropped
fn normalize_year(value: &Value) -> Option<String> {
    let year = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    is_release_year(&year).then_some(year)
}

pub fn is_release_year(year: &str) -> bool {
    year.len() == 4 && year.chars().all(|c| c.is_ascii_digit())
}
