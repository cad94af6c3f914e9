// Gateway module for models - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod factory;
mod local;
mod remote;
mod traits;
mod types;

// Public re-exports - the ONLY way to access model functionality
pub use factory::GeneratorFactory;
pub use local::LocalGenerator;
pub use remote::RemoteGenerator;
pub use traits::Generator;
#[cfg(test)]
pub use traits::MockGenerator;
pub use types::{GenerationSettings, PromptStyle};
