use anyhow::{Context as _, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::traits::Generator;
use super::types::PromptStyle;
use crate::app::RemoteConfig;
use crate::utils::DaynaError;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Cloud backend speaking the Gemini `generateContent` REST API
pub struct RemoteGenerator {
    client: Client,
    base_url: String,
    model_name: String,
    api_key: String,
}

impl RemoteGenerator {
    pub fn new(config: &RemoteConfig, api_key: String) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model_name: config.model.clone(),
            api_key,
        })
    }

    /// Request URL. The key travels in a header so it never shows up in
    /// error messages that echo the URL.
    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model_name)
    }
}

#[async_trait]
impl Generator for RemoteGenerator {
    async fn generate(&self, prompt: &str, max_tokens: usize, temperature: f32) -> Result<String> {
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "maxOutputTokens": max_tokens,
                "temperature": temperature,
            }
        });

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                DaynaError::Network(format!(
                    "Failed to reach {} ({}): {}",
                    self.base_url,
                    self.model_name,
                    e.without_url()
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DaynaError::Generation(format!(
                "Gemini API error {}: {}",
                status, error_text
            ))
            .into());
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .context("Malformed Gemini response")?;
        parsed.into_text()
    }

    fn name(&self) -> &str {
        &self.model_name
    }

    fn is_local(&self) -> bool {
        false
    }

    fn prompt_style(&self) -> PromptStyle {
        PromptStyle::Plain
    }
}

// Response structures for generateContent

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .context("Gemini returned no candidates")?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            anyhow::bail!(
                "Gemini returned an empty candidate (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            );
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_are_concatenated() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Hello"},{"text":" there"}]},"finishReason":"STOP"}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.into_text().unwrap(), "Hello there");
    }

    #[test]
    fn test_blocked_candidate_is_an_error() {
        let raw = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let err = parsed.into_text().unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_no_candidates_is_an_error() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.into_text().is_err());
    }

    #[test]
    fn test_endpoint_shape() {
        let config = RemoteConfig {
            base_url: "https://example.test/v1beta/".to_string(),
            model: "gemini-test".to_string(),
            ..RemoteConfig::default()
        };
        let generator = RemoteGenerator::new(&config, "k".to_string()).unwrap();
        assert_eq!(
            generator.endpoint(),
            "https://example.test/v1beta/models/gemini-test:generateContent"
        );
        assert_eq!(generator.prompt_style(), PromptStyle::Plain);
        assert!(!generator.is_local());
    }

    #[tokio::test]
    async fn test_connection_error_does_not_expose_api_key() {
        let config = RemoteConfig {
            base_url: "http://127.0.0.1:9/v1beta".to_string(),
            timeout_secs: 2,
            ..RemoteConfig::default()
        };
        let generator = RemoteGenerator::new(&config, "SECRET123".to_string()).unwrap();

        let err = generator.generate("hi", 8, 0.1).await.unwrap_err();
        let rendered = format!("{:#}", err);
        assert!(!rendered.contains("SECRET123"), "leaked key: {}", rendered);
        assert!(matches!(
            err.downcast_ref::<DaynaError>(),
            Some(DaynaError::Network(_))
        ));
    }
}
