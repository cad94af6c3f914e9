// Gateway module for dispatch - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod dispatcher;
mod language;
mod prompt;

// Public re-exports - the ONLY way to access dispatch functionality
pub use dispatcher::{DispatchResult, ResponseDispatcher};
pub use language::{detect_language, Language};
pub use prompt::{clean_completion, preamble};
