// Gateway module for workspace - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod artifact;
mod chat_log;
mod manager;
mod sanitize;

// Public re-exports - the ONLY way to access workspace functionality
pub use artifact::{artifact_filename, artifact_filename_at};
pub use chat_log::ChatLogEntry;
pub use manager::{project_names, Outcome, ProjectWorkspace};
pub use sanitize::{prompt_slug, sanitize_name};
