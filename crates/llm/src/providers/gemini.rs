use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::provider::{http_client, LlmError, LlmProvider, Message, Role};

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            api_key,
            model: model.trim_start_matches("models/").to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Build the request body for the Gemini generateContent API.
    fn build_request_body(
        messages: &[Message],
        temperature: f32,
        max_tokens: u32,
    ) -> serde_json::Value {
        // Gemini uses a separate system_instruction field (like Claude)
        let system_msg = messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.clone());

        let contents: Vec<serde_json::Value> = messages
            .iter()
            .filter_map(|m| {
                let role = match m.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                    Role::System => return None,
                };
                Some(json!({ "role": role, "parts": [{ "text": m.content }] }))
            })
            .collect();

        let mut body = json!({
            "contents": contents,
            "generationConfig": {
                "temperature": temperature,
                "maxOutputTokens": max_tokens,
            },
        });

        if let Some(system) = system_msg {
            body["system_instruction"] = json!({
                "parts": [{ "text": system }],
            });
        }

        body
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let url = self.endpoint();
        let body = Self::build_request_body(&messages, temperature, max_tokens);

        debug!(model = %self.model, "Gemini generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, body });
        }

        let resp: serde_json::Value = response.json().await?;
        let content = resp["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                LlmError::ParseError(
                    "missing candidates[0].content.parts[0].text".into(),
                )
            })?
            .to_string();

        Ok(content)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
