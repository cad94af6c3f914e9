use anyhow::{Context as _, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::traits::Generator;
use super::types::PromptStyle;
use crate::app::LocalConfig;
use crate::utils::DaynaError;

/// Local backend: a llama.cpp server hosting the configured GGUF model
pub struct LocalGenerator {
    client: Client,
    server_url: String,
    model_name: String,
}

impl LocalGenerator {
    pub fn new(config: &LocalConfig) -> Result<Self> {
        let model_name = config
            .model_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| config.model_path.display().to_string());

        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()?,
            server_url: config.server_url.trim_end_matches('/').to_string(),
            model_name,
        })
    }
}

#[async_trait]
impl Generator for LocalGenerator {
    async fn generate(&self, prompt: &str, max_tokens: usize, temperature: f32) -> Result<String> {
        let url = format!("{}/completion", self.server_url);
        let body = json!({
            "prompt": prompt,
            "n_predict": max_tokens,
            "temperature": temperature,
            "stop": ["</s>"],
            "stream": false,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                DaynaError::Network(format!(
                    "Failed to connect to llama-server at {}. Is it running? ({})",
                    self.server_url, e
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(
                DaynaError::Generation(format!("llama-server error {}: {}", status, error_text))
                    .into(),
            );
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .context("Malformed llama-server response")?;
        Ok(completion.content)
    }

    fn name(&self) -> &str {
        &self.model_name
    }

    fn is_local(&self) -> bool {
        true
    }

    fn prompt_style(&self) -> PromptStyle {
        PromptStyle::Instruction
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: String,
}
