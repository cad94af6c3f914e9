use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::language::{detect_language, Language};
use super::prompt::{clean_completion, preamble};
use crate::models::{GenerationSettings, Generator};
use crate::utils::log_debug;

/// Cleaned completion tagged with the language of the user turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchResult {
    pub text: String,
    pub language: Language,
}

/// Routes one user turn to the session's generator.
///
/// Turns are handled one at a time. The backend call runs on its own tokio
/// task so a long inference never blocks the runtime; the caller simply
/// awaits the result. There is no retry.
pub struct ResponseDispatcher {
    generator: Arc<dyn Generator>,
    settings: GenerationSettings,
    assistant_name: String,
}

impl ResponseDispatcher {
    pub fn new(
        generator: Arc<dyn Generator>,
        settings: GenerationSettings,
        assistant_name: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            settings,
            assistant_name: assistant_name.into(),
        }
    }

    pub fn generator(&self) -> &Arc<dyn Generator> {
        &self.generator
    }

    /// Build the backend prompt for `text` in its detected language
    pub fn build_prompt(&self, text: &str, language: Language) -> String {
        self.generator
            .prompt_style()
            .render(&preamble(language, &self.assistant_name), text)
    }

    pub async fn dispatch(&self, text: &str) -> Result<DispatchResult> {
        let language = detect_language(text);
        let prompt = self.build_prompt(text, language);
        log_debug(format!("dispatching {} chars ({})", text.chars().count(), language));

        let generator = Arc::clone(&self.generator);
        let GenerationSettings {
            max_tokens,
            temperature,
        } = self.settings;

        let raw = tokio::spawn(async move {
            generator.generate(&prompt, max_tokens, temperature).await
        })
        .await
        .context("Generation task panicked")??;

        Ok(DispatchResult {
            text: clean_completion(&raw),
            language,
        })
    }
}
