use thiserror::Error;

/// Main error type for Dayna
#[derive(Error, Debug)]
pub enum DaynaError {
    /// Missing credential or local model file. Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Workspace error: {0}")]
    Workspace(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DaynaError {
    /// Whether the process should stop before entering the turn loop
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
