/// Runtime orchestration module - Gateway
mod non_interactive;
mod orchestrator;
mod turn;

pub use non_interactive::{ExecutionMetadata, NonInteractiveResult, NonInteractiveRunner};
pub use orchestrator::{decide_mode, Orchestrator};
pub use turn::{process_turn, ChatCommand, TurnError, TurnErrorKind, TurnOutcome};
