use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP client error: {0}")]
    HttpClient(reqwest::Error),

    #[error("External API error: {0}")]
    ExternalApi(String),

    /// The language model answered with something that is not a usable plan
    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Upstream credentials travel in query strings, so the URL never reaches
/// messages or logs
impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::HttpClient(e.without_url())
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_)
            | AppError::HttpClient(_)
            | AppError::ExternalApi(_)
            | AppError::Extraction(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            AppError::InvalidInput(msg) | AppError::Configuration(msg) => msg,
            other => other.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(status = %status, error = %message, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %message, "Request rejected");
        }

        // Callers always get a movies array, even on failure
        let body = Json(json!({
            "error": message,
            "movies": []
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::InvalidInput("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Configuration("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::ExternalApi("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_http_client_error_hides_url() {
        let e = reqwest::Client::new()
            .get("http://127.0.0.1:1/search/movie?api_key=SECRET-KEY")
            .send()
            .await
            .unwrap_err();

        let error = AppError::from(e);
        assert!(matches!(error, AppError::HttpClient(_)));
        assert!(!error.to_string().contains("SECRET-KEY"));
        assert!(!format!("{:?}", error).contains("SECRET-KEY"));
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::InvalidInput("description is required".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::Internal("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
