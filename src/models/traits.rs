use anyhow::Result;
use async_trait::async_trait;

use super::types::PromptStyle;

/// Core trait that both generation backends implement.
///
/// Callers only ever hold an `Arc<dyn Generator>`; the concrete variant is
/// picked once at startup from the decided [`Mode`](crate::connectivity::Mode).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce a completion for an already-rendered prompt.
    /// Latency is unbounded; errors surface as generation failures.
    async fn generate(&self, prompt: &str, max_tokens: usize, temperature: f32) -> Result<String>;

    /// Get the name of the backing model
    fn name(&self) -> &str;

    /// Check if this is a local model (no API calls)
    fn is_local(&self) -> bool;

    /// How the dispatcher should wrap user text before calling `generate`
    fn prompt_style(&self) -> PromptStyle;
}
