use crate::config::ProviderConfig;
use crate::providers::traits::{CompletionProvider, LlmError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub const NUTRITIONIST_SYSTEM_PROMPT: &str = "You are a professional nutritionist. \
Answer dietary questions clearly and in a friendly manner. Use the nutrition facts \
provided as context when they are relevant, cite the foods you draw on, and say so \
when the context does not cover the question.";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Clone)]
pub struct AnthropicProvider {
    api_key: String,
    api_url: String,
    system_message: String,
    client: Client,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl AnthropicProvider {
    pub fn new(config: ProviderConfig, system_message: impl Into<String>) -> Self {
        Self {
            api_key: config.api_key,
            api_url: config.api_url,
            system_message: system_message.into(),
            client: Client::new(),
            model: config.model,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// Concatenates the text blocks of a Messages API response.
fn extract_text(response_json: &Value) -> Result<String, LlmError> {
    if let Some(error) = response_json.get("error") {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| error.to_string());
        return Err(LlmError::Api(message));
    }

    let blocks = response_json
        .get("content")
        .and_then(|c| c.as_array())
        .ok_or_else(|| {
            let debug_json = serde_json::to_string_pretty(response_json).unwrap_or_default();
            LlmError::InvalidResponse(debug_json)
        })?;

    let text = blocks
        .iter()
        .filter(|b| b.get("type").and_then(|t| t.as_str()).unwrap_or("text") == "text")
        .filter_map(|b| b.get("text").and_then(|t| t.as_str()))
        .collect::<Vec<_>>()
        .join("");

    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: &self.system_message,
            messages: vec![Message { role: "user", content: prompt }],
        };

        log::debug!("Sending {} character prompt to {}", prompt.len(), self.model);
        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status { status: status.as_u16(), body });
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        extract_text(&response_json)
    }

    fn get_system_message(&self) -> &str {
        &self.system_message
    }

    fn get_model_info(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> AnthropicProvider {
        AnthropicProvider::new(
            ProviderConfig {
                api_key: "sk-ant-test".to_string(),
                model: "claude-test".to_string(),
                api_url: format!("{}/v1/messages", server.uri()),
                max_tokens: 256,
                temperature: 0.7,
            },
            "You are a nutritionist.",
        )
    }

    #[tokio::test]
    async fn test_complete_sends_messages_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-ant-test"))
            .and(header("anthropic-version", ANTHROPIC_VERSION))
            .and(body_partial_json(json!({
                "model": "claude-test",
                "max_tokens": 256,
                "system": "You are a nutritionist.",
                "messages": [{ "role": "user", "content": "Is kale healthy?" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "msg_1",
                "type": "message",
                "role": "assistant",
                "content": [
                    { "type": "text", "text": "Yes, " },
                    { "type": "text", "text": "very." }
                ],
                "stop_reason": "end_turn"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let answer = provider_for(&server).complete("Is kale healthy?").await.unwrap();
        assert_eq!(answer, "Yes, very.");
    }

    #[tokio::test]
    async fn test_error_status_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(529).set_body_json(json!({
                "type": "error",
                "error": { "type": "overloaded_error", "message": "Overloaded" }
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server).complete("hi").await.unwrap_err();
        match err {
            LlmError::Status { status, body } => {
                assert_eq!(status, 529);
                assert!(body.contains("Overloaded"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_extract_text_errors() {
        let api_error = json!({ "type": "error", "error": { "message": "bad key" } });
        assert!(matches!(extract_text(&api_error), Err(LlmError::Api(m)) if m == "bad key"));

        assert!(matches!(extract_text(&json!({ "content": [] })), Err(LlmError::EmptyResponse)));
        assert!(matches!(extract_text(&json!({ "foo": 1 })), Err(LlmError::InvalidResponse(_))));
    }
}
