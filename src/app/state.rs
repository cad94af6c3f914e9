use std::sync::Arc;

use crate::app::Config;
use crate::connectivity::Mode;
use crate::dispatch::ResponseDispatcher;
use crate::models::{GenerationSettings, Generator};
use crate::workspace::ProjectWorkspace;

/// Everything a session needs, passed explicitly to each turn
pub struct AppState {
    pub config: Config,
    /// Decided once at startup
    pub mode: Mode,
    pub workspace: ProjectWorkspace,
    pub dispatcher: ResponseDispatcher,
}

impl AppState {
    /// Create new app state around an already-selected generator
    pub fn new(
        config: Config,
        mode: Mode,
        workspace: ProjectWorkspace,
        generator: Arc<dyn Generator>,
    ) -> Self {
        let dispatcher = ResponseDispatcher::new(
            generator,
            GenerationSettings::from(&config),
            config.assistant.name.clone(),
        );
        Self {
            config,
            mode,
            workspace,
            dispatcher,
        }
    }

    pub fn assistant_name(&self) -> &str {
        &self.config.assistant.name
    }
}
