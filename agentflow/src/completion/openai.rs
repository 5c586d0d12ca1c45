//! OpenAI-compatible chat completions client.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::CompletionClient;
use crate::config::Settings;
use crate::errors::{CompletionError, ConfigError};

/// Chat completions client configured from [`Settings`].
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiClient {
    /// Builds a client from settings.
    ///
    /// The configured timeout is applied to every request.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if !settings.openai_api_key.is_empty() {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", settings.openai_api_key))
                .map_err(|_| ConfigError::client("Invalid API key format"))?;
            headers.insert(AUTHORIZATION, auth_value);
        }

        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::client(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model_name.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }

    /// Returns the model identifier requests are sent with.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Serialize)]
struct ChatApiRequest<'a> {
    model: &'a str,
    messages: [ApiMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatApiResponse {
    choices: Option<Vec<Choice>>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: Option<String>,
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String, CompletionError> {
        let start = Instant::now();

        let api_req = ChatApiRequest {
            model: &self.model,
            messages: [ApiMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self.client.post(self.chat_url()).json(&api_req).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ChatApiResponse>(&body)
                .ok()
                .and_then(|parsed| parsed.error)
                .and_then(|error| error.message)
                .unwrap_or_default();
            return Err(CompletionError::new(if detail.is_empty() {
                format!("HTTP {}", status.as_u16())
            } else {
                format!("HTTP {}: {detail}", status.as_u16())
            }));
        }

        let parsed: ChatApiResponse = serde_json::from_str(&body)?;

        if let Some(error) = parsed.error {
            return Err(CompletionError::new(error.message.unwrap_or_default()));
        }

        let content = parsed
            .choices
            .and_then(|c| c.into_iter().next())
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| CompletionError::new("No choices in response"))?;

        debug!(
            model = %self.model,
            latency_ms = start.elapsed().as_secs_f64() * 1000.0,
            content_len = content.len(),
            "Completion received"
        );

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenAiClient {
        let settings = Settings::new()
            .with_api_key("sk-test")
            .with_base_url(server.uri())
            .with_model("gpt-4o-mini")
            .with_timeout_seconds(5);
        OpenAiClient::from_settings(&settings).unwrap()
    }

    #[tokio::test]
    async fn test_generate_returns_first_choice() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "messages": [{"role": "user", "content": "hi"}],
                "max_tokens": 2000
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "hello"}}]
            })))
            .mount(&server)
            .await;

        let text = client_for(&server).generate("hi").await.unwrap();
        assert_eq!(text, "hello");
    }

    #[tokio::test]
    async fn test_http_error_maps_to_completion_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {"message": "Rate limit reached"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).generate("hi").await.unwrap_err();
        assert!(err.message.contains("429"));
        assert!(err.message.contains("Rate limit reached"));
    }

    #[tokio::test]
    async fn test_malformed_body_maps_to_completion_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).generate("hi").await.unwrap_err();
        assert!(err.message.starts_with("Invalid JSON"));
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = client_for(&server).generate("hi").await.unwrap_err();
        assert_eq!(err.message, "No choices in response");
    }

    #[test]
    fn test_from_settings_keeps_model() {
        let client = OpenAiClient::from_settings(&Settings::new()).unwrap();
        assert_eq!(client.model(), "gpt-4");
    }
}
