pub mod app;
pub mod cli;
pub mod connectivity;
pub mod constants;
pub mod dispatch;
pub mod local;
pub mod models;
pub mod runtime;
pub mod utils;
pub mod workspace;

pub use app::{load_config, AppState, Config};
pub use connectivity::{ConnectivityProbe, Mode, ModeArbiter};
pub use dispatch::{DispatchResult, Language, ResponseDispatcher};
pub use models::{Generator, GeneratorFactory};
pub use utils::DaynaError;
pub use workspace::ProjectWorkspace;
