// SPDX-License-Identifier: MIT

//! OpenAI-compatible Model - chat completions API
//!
//! Works against any endpoint that speaks the OpenAI chat completions
//! protocol. The default endpoint is Groq.

use super::{Content, GenerationConfig, Model, Part, ResponseSchema};
use crate::adk::error::ModelError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::fmt;

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Connection settings for an OpenAI-compatible endpoint
#[derive(Clone)]
pub struct OpenAIConfig {
    /// Provider label used in logs and errors
    pub provider: String,
    pub api_key: String,
    pub base_url: String,
    pub model_name: String,
}

impl fmt::Debug for OpenAIConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model_name", &self.model_name)
            .finish()
    }
}

/// OpenAI-compatible chat model implementation
pub struct OpenAIModel {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIModel {
    /// Create a new OpenAIModel from explicit settings.
    ///
    /// Fails with `ApiKeyMissing` when the key is empty.
    pub fn new(config: OpenAIConfig) -> Result<Self, ModelError> {
        if config.api_key.trim().is_empty() {
            return Err(ModelError::ApiKeyMissing(config.provider.clone()));
        }

        Ok(Self {
            client: Client::new(),
            config,
        })
    }

    /// Convert internal Content to OpenAI message format
    fn content_to_openai_message(content: &Content) -> serde_json::Value {
        let role = match content.role.as_str() {
            "system" => "system",
            "user" => "user",
            "model" => "assistant",
            other => other,
        };

        json!({
            "role": role,
            "content": content.text()
        })
    }

    /// Build the request body for a chat completion
    fn build_request_body(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
        response_schema: Option<&ResponseSchema>,
    ) -> serde_json::Value {
        let messages: Vec<serde_json::Value> = history
            .iter()
            .map(Self::content_to_openai_message)
            .collect();

        let mut body = json!({
            "model": self.config.model_name,
            "messages": messages
        });

        if let Some(cfg) = config {
            if let Some(temp) = cfg.temperature {
                body["temperature"] = json!(temp);
            }
            if let Some(max_tokens) = cfg.max_output_tokens {
                body["max_tokens"] = json!(max_tokens);
            }
            if let Some(top_p) = cfg.top_p {
                body["top_p"] = json!(top_p);
            }
        }

        if let Some(schema) = response_schema {
            body["response_format"] = json!({
                "type": "json_schema",
                "json_schema": {
                    "name": schema.name,
                    "schema": schema.schema,
                    "strict": true
                }
            });
        }

        body
    }

    /// Parse OpenAI response into Content
    fn parse_openai_response(response: &serde_json::Value) -> Result<Content, ModelError> {
        let choice = response["choices"]
            .as_array()
            .and_then(|c| c.first())
            .ok_or_else(|| ModelError::invalid("no choices in chat completion response"))?;

        let message = &choice["message"];
        let mut parts = Vec::new();

        // Groq returns gpt-oss reasoning separately from the answer
        if let Some(reasoning) = message["reasoning"].as_str() {
            if !reasoning.is_empty() {
                parts.push(Part::Thinking(reasoning.to_string()));
            }
        }

        if let Some(content) = message["content"].as_str() {
            if !content.is_empty() {
                parts.push(Part::Text(content.to_string()));
            }
        }

        Ok(Content {
            role: "model".to_string(),
            parts,
        })
    }
}

#[async_trait]
impl Model for OpenAIModel {
    fn provider(&self) -> &str {
        &self.config.provider
    }

    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
        response_schema: Option<&ResponseSchema>,
    ) -> Result<Content, ModelError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let body = self.build_request_body(history, config, response_schema);

        log::debug!(
            "{} request body: {}",
            self.config.provider,
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await?;
            return Err(ModelError::api(
                self.config.provider.clone(),
                status.as_u16(),
                text,
            ));
        }

        let resp_json: serde_json::Value = resp.json().await?;
        log::debug!("{} response: {}", self.config.provider, resp_json);

        Self::parse_openai_response(&resp_json)
    }
}
