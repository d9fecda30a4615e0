//! OpenAI-compatible backend.
//!
//! `OpenAiBackend` calls any `/v1/chat/completions` endpoint: OpenAI, Groq,
//! Together.ai, Ollama (OpenAI mode), LM Studio, vLLM.  All connection
//! details come from [`LlmConfig`]; nothing is hardcoded.

use async_trait::async_trait;

use crate::config::LlmConfig;
use crate::llm::backend::{error_message, http_client, AnalysisBackend, LlmError};

/// Sends the analysis prompt as a single user message.
pub struct OpenAiBackend {
    client: reqwest::Client,
    config: LlmConfig,
    api_key: Option<String>,
}

impl OpenAiBackend {
    /// Build an `OpenAiBackend` from application config.
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            client: http_client(config),
            config: config.clone(),
            api_key: config.resolved_api_key(),
        }
    }
}

#[async_trait]
impl AnalysisBackend for OpenAiBackend {
    /// The `Authorization: Bearer …` header is attached only when a
    /// non-empty key was resolved, which keeps local providers working.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let body = serde_json::json!({
            "model":       self.config.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "stream":      false,
            "temperature": self.config.temperature
        });

        let mut req = self.client.post(&url).json(&body);
        if let Some(key) = self.api_key.as_deref() {
            req = req.bearer_auth(key);
        }

        log::debug!(
            "openai: POST model={} prompt_len={}",
            self.config.model,
            prompt.len()
        );

        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let json: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| LlmError::Parse(e.to_string()))?;

        let reply = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(LlmError::EmptyResponse)?;

        if reply.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(reply.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmProvider;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_config(base_url: &str, api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            provider: LlmProvider::OpenAiCompatible,
            base_url: base_url.into(),
            api_key: api_key.map(str::to_string),
            api_key_env: "CHAT_VIBES_TEST_UNSET_VARIABLE".into(),
            model: "gpt-test".into(),
            timeout_secs: 5,
            ..LlmConfig::default()
        }
    }

    #[tokio::test]
    async fn returns_message_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "{}" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = OpenAiBackend::from_config(&make_config(&server.uri(), Some("sk-test")));
        assert_eq!(backend.generate("hi").await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn works_without_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": "ok" } }]
            })))
            .mount(&server)
            .await;

        let backend = OpenAiBackend::from_config(&make_config(&server.uri(), None));
        assert_eq!(backend.generate("hi").await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn rate_limit_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": { "message": "Rate limit reached" }
            })))
            .mount(&server)
            .await;

        let backend = OpenAiBackend::from_config(&make_config(&server.uri(), Some("k")));
        let err = backend.generate("hi").await.unwrap_err();
        assert_eq!(err.to_string(), "API error (429): Rate limit reached");
    }

    #[tokio::test]
    async fn missing_choices_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let backend = OpenAiBackend::from_config(&make_config(&server.uri(), None));
        assert!(matches!(
            backend.generate("hi").await,
            Err(LlmError::EmptyResponse)
        ));
    }

    #[test]
    fn backend_is_object_safe() {
        let backend: Box<dyn AnalysisBackend> =
            Box::new(OpenAiBackend::from_config(&make_config("http://localhost", None)));
        drop(backend);
    }
}
