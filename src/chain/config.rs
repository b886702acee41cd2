// SPDX-License-Identifier: MIT

//! Configuration loading
//!
//! Settings come from (highest first) command-line overrides, an optional
//! YAML file, the environment, and built-in defaults. The credential is read
//! once, here, and handed to the model factory; nodes never look at the
//! environment.

use crate::adk::error::{ChainError, ModelError};
use crate::adk::model::openai::{OpenAIConfig, OpenAIModel, GROQ_BASE_URL};
use crate::adk::model::{GenerationConfig, Model, ModelFactory};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub const DEFAULT_PROVIDER: &str = "Groq";
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-20b";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Contents of a config file
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChainConfig {
    #[serde(default)]
    pub model: ModelSection,
}

/// Model settings; unset fields fall back to the environment, then defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ModelSection {
    pub provider: Option<String>,
    pub model_name: Option<String>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub base_url: Option<String>,
    /// Name of the environment variable holding the API key
    pub api_key_env: Option<String>,
}

/// Fully resolved model settings, credential included
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub endpoint: OpenAIConfig,
    pub generation: GenerationConfig,
}

impl ChainConfig {
    /// Load a config from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ChainError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ChainError::config(format!("cannot read config {}: {}", path.display(), e))
        })?;
        Self::parse_yaml(&content)
    }

    /// Parse a config from a YAML string
    pub fn parse_yaml(content: &str) -> Result<Self, ChainError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ChainConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Apply command-line overrides; set fields win
    pub fn merge_overrides(&mut self, overrides: ModelSection) {
        let model = &mut self.model;
        if overrides.provider.is_some() {
            model.provider = overrides.provider;
        }
        if overrides.model_name.is_some() {
            model.model_name = overrides.model_name;
        }
        if overrides.temperature.is_some() {
            model.temperature = overrides.temperature;
        }
        if overrides.max_output_tokens.is_some() {
            model.max_output_tokens = overrides.max_output_tokens;
        }
        if overrides.base_url.is_some() {
            model.base_url = overrides.base_url;
        }
        if overrides.api_key_env.is_some() {
            model.api_key_env = overrides.api_key_env;
        }
    }

    /// Resolve against the process environment
    pub fn resolve(&self) -> Result<ModelConfig, ChainError> {
        self.resolve_with(|key| env::var(key).ok())
    }

    /// Resolve using `lookup` for environment variables.
    ///
    /// Fails with a configuration error when the credential is missing or
    /// empty, or when a value is out of range.
    pub fn resolve_with<F>(&self, lookup: F) -> Result<ModelConfig, ChainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let section = &self.model;
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let key_env = section
            .api_key_env
            .clone()
            .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string());
        let api_key = non_empty(&key_env)
            .ok_or_else(|| ChainError::config(format!("{} must be set", key_env)))?;

        let model_name = section
            .model_name
            .clone()
            .or_else(|| non_empty("GROQ_MODEL"))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        if model_name.trim().is_empty() {
            return Err(ChainError::config("model_name must not be empty"));
        }

        let base_url = section
            .base_url
            .clone()
            .or_else(|| non_empty("GROQ_BASE_URL"))
            .unwrap_or_else(|| GROQ_BASE_URL.to_string());

        let temperature = section.temperature.unwrap_or(DEFAULT_TEMPERATURE);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ChainError::config(format!(
                "temperature must be between 0 and 2, got {}",
                temperature
            )));
        }

        Ok(ModelConfig {
            endpoint: OpenAIConfig {
                provider: section
                    .provider
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PROVIDER.to_string()),
                api_key,
                base_url,
                model_name,
            },
            generation: GenerationConfig {
                temperature: Some(temperature),
                max_output_tokens: section.max_output_tokens,
                top_p: None,
            },
        })
    }
}

impl ModelFactory for ModelConfig {
    fn build(&self) -> Result<Arc<dyn Model>, ModelError> {
        Ok(Arc::new(OpenAIModel::new(self.endpoint.clone())?))
    }
}
