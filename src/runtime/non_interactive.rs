use serde::{Deserialize, Serialize};

use crate::{app::AppState, cli::OutputFormat, dispatch::Language};

/// Result of a non-interactive run
#[derive(Debug, Serialize, Deserialize)]
pub struct NonInteractiveResult {
    /// The prompt that was executed
    pub prompt: String,
    /// The model's response (empty on failure)
    pub response: String,
    /// Detected language of the prompt, when generation succeeded
    pub language: Option<Language>,
    /// Any errors that occurred
    pub errors: Vec<String>,
    pub metadata: ExecutionMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    pub mode: String,
    pub model: String,
    pub project: String,
    /// Execution time in milliseconds
    pub duration_ms: u128,
}

/// Runs exactly one turn and reports it
pub struct NonInteractiveRunner<'a> {
    state: &'a AppState,
}

impl<'a> NonInteractiveRunner<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Execute a single prompt, logging both sides to the active project
    pub async fn execute(&self, prompt: &str) -> NonInteractiveResult {
        let start_time = std::time::Instant::now();
        let mut errors = Vec::new();

        self.state.workspace.log_chat("user", prompt);

        let (response, language) = match self.state.dispatcher.dispatch(prompt).await {
            Ok(result) => {
                self.state.workspace.log_chat("assistant", &result.text);
                (result.text, Some(result.language))
            }
            Err(e) => {
                errors.push(format!("Generation error: {:#}", e));
                (String::new(), None)
            }
        };

        NonInteractiveResult {
            prompt: prompt.to_string(),
            response,
            language,
            errors,
            metadata: ExecutionMetadata {
                mode: self.state.mode.to_string(),
                model: self.state.dispatcher.generator().name().to_string(),
                project: self.state.workspace.active_project().to_string(),
                duration_ms: start_time.elapsed().as_millis(),
            },
        }
    }

    /// Format the result according to the output format
    pub fn format_result(result: &NonInteractiveResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(result).unwrap_or_else(|e| {
                format!("{{\"error\": \"Failed to serialize result: {}\"}}", e)
            }),
            OutputFormat::Text => {
                let mut output = String::new();
                if let Some(language) = result.language {
                    output.push_str(&format!("({}) ", language));
                }
                output.push_str(&result.response);

                if !result.errors.is_empty() {
                    output.push_str("\n--- Errors ---\n");
                    for error in &result.errors {
                        output.push_str(&format!("• {}\n", error));
                    }
                }

                output
            }
        }
    }
}
