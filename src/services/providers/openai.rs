/// OpenAI-compatible chat completion extractor
///
/// Sends the scene description with a fixed system instruction to
/// `{api_url}/chat/completions` and parses the first JSON object found in the
/// answer. Any compatible gateway works as long as it speaks the Chat Completions
/// request/response shape.
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::ExtractionPlan,
    services::{
        extraction::{parse_plan, EXTRACTION_INSTRUCTION},
        providers::KeywordExtractor,
    },
};

const EXTRACTION_TEMPERATURE: f32 = 0.2;

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Clone)]
pub struct ChatCompletionExtractor {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl ChatCompletionExtractor {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model,
        }
    }

    fn request_body(&self, description: &str) -> Value {
        json!({
            "model": self.model,
            "temperature": EXTRACTION_TEMPERATURE,
            "messages": [
                {"role": "system", "content": EXTRACTION_INSTRUCTION},
                {"role": "user", "content": description}
            ]
        })
    }
}

/// Text content of the first choice
fn completion_text(completion: ChatCompletionResponse) -> AppResult<String> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| AppError::Extraction("Model returned no content".to_string()))
}

#[async_trait::async_trait]
impl KeywordExtractor for ChatCompletionExtractor {
    async fn extract(&self, description: &str) -> AppResult<ExtractionPlan> {
        let url = format!("{}/chat/completions", self.api_url.trim_end_matches('/'));
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(description))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Chat completion API returned status {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let content = completion_text(completion)?;
        tracing::debug!(content = %content, "Raw extraction response");

        parse_plan(&content)
    }

    fn name(&self) -> &'static str {
        "chat_completion"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};

    /// Local stand-in for the chat API, answering according to the user message
    async fn completion_stub(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        let authorized = headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            == Some("Bearer sk-test");
        if !authorized {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": { "message": "Incorrect API key" } })),
            );
        }

        let content = match body["messages"][1]["content"].as_str() {
            Some("falha no servidor") => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": { "message": "overloaded" } })),
                )
            }
            Some("só prosa") => "Não consegui identificar o filme, desculpe.".to_string(),
            _ => "Claro! Aqui está:\n{\"titles\": [\"Duro de Matar\", \"Matrix\"]}\nBoa sorte!"
                .to_string(),
        };

        (
            StatusCode::OK,
            Json(json!({
                "id": "chatcmpl-test",
                "choices": [
                    { "index": 0, "message": { "role": "assistant", "content": content } }
                ]
            })),
        )
    }

    async fn spawn_stub() -> String {
        let app = Router::new().route("/v1/chat/completions", post(completion_stub));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{}/v1", address)
    }

    fn extractor_for(api_key: &str, api_url: String) -> ChatCompletionExtractor {
        ChatCompletionExtractor::new(api_key.to_string(), api_url, "gpt-4o-mini".to_string())
    }

    fn create_test_extractor() -> ChatCompletionExtractor {
        ChatCompletionExtractor::new(
            "sk-test".to_string(),
            "http://test.local/v1".to_string(),
            "gpt-4o-mini".to_string(),
        )
    }

    #[test]
    fn test_request_body() {
        let body = create_test_extractor().request_body("homem de terno preto");

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], EXTRACTION_INSTRUCTION);
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "homem de terno preto");
    }

    #[test]
    fn test_completion_text_first_choice() {
        let json = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "{\"titles\": [\"Matrix\"]}"}},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ]
        }"#;

        let completion: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        let content = completion_text(completion).unwrap();
        assert_eq!(
            parse_plan(&content).unwrap(),
            ExtractionPlan::Titles(vec!["Matrix".to_string()])
        );
    }

    #[test]
    fn test_completion_text_missing_content() {
        let completion: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            completion_text(completion),
            Err(AppError::Extraction(_))
        ));

        let completion: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(matches!(
            completion_text(completion),
            Err(AppError::Extraction(_))
        ));
    }

    #[tokio::test]
    async fn test_extract_prose_wrapped_titles() {
        let extractor = extractor_for("sk-test", spawn_stub().await);

        let plan = extractor.extract("homem de terno preto lutando em prédio").await.unwrap();
        assert_eq!(
            plan,
            ExtractionPlan::Titles(vec!["Duro de Matar".to_string(), "Matrix".to_string()])
        );
    }

    #[tokio::test]
    async fn test_extract_server_error_is_external_api_error() {
        let extractor = extractor_for("sk-test", spawn_stub().await);

        let result = extractor.extract("falha no servidor").await;
        assert!(matches!(result, Err(AppError::ExternalApi(msg)) if msg.contains("500")));
    }

    #[tokio::test]
    async fn test_extract_prose_only_is_extraction_error() {
        let extractor = extractor_for("sk-test", spawn_stub().await);

        let result = extractor.extract("só prosa").await;
        assert!(matches!(result, Err(AppError::Extraction(_))));
    }

    #[tokio::test]
    async fn test_extract_unauthorized_is_external_api_error() {
        let extractor = extractor_for("sk-wrong", spawn_stub().await);

        let result = extractor.extract("qualquer cena").await;
        assert!(matches!(result, Err(AppError::ExternalApi(msg)) if msg.contains("401")));
    }

    #[tokio::test]
    async fn test_extract_transport_error() {
        let extractor = extractor_for("sk-test", "http://127.0.0.1:1/v1".to_string());

        let result = extractor.extract("qualquer cena").await;
        assert!(matches!(result, Err(AppError::HttpClient(_))));
    }
}
