use serde::{Deserialize, Serialize};

/// Prompt framing expected by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptStyle {
    /// Mistral instruct template: `<s>[INST] {preamble}\n\n{text} [/INST]`
    Instruction,
    /// Preamble and text separated by a blank line
    Plain,
}

impl PromptStyle {
    pub fn render(&self, preamble: &str, text: &str) -> String {
        match self {
            Self::Instruction => format!("<s>[INST] {}\n\n{} [/INST]", preamble, text),
            Self::Plain => format!("{}\n\n{}", preamble, text),
        }
    }
}

/// Sampling parameters passed to every `generate` call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub max_tokens: usize,
    pub temperature: f32,
}

impl From<&crate::app::Config> for GenerationSettings {
    fn from(config: &crate::app::Config) -> Self {
        Self {
            max_tokens: config.generation.max_tokens,
            temperature: config.generation.temperature,
        }
    }
}
