use std::fmt;
use std::path::PathBuf;

use crate::app::AppState;
use crate::constants::EXIT_WORDS;
use crate::dispatch::DispatchResult;

const DEFAULT_HISTORY_LINES: usize = 10;

/// Why a turn failed. None of these end the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnErrorKind {
    /// The backend call failed
    Generation,
    /// An in-chat command was malformed or unknown
    Command,
    /// A project or artifact operation failed
    Workspace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnError {
    pub kind: TurnErrorKind,
    pub message: String,
}

impl TurnError {
    fn new(kind: TurnErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of handling one line of user input
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The backend answered
    Reply(DispatchResult),
    /// A local command ran; the string is shown to the user
    Command(String),
    Failed(TurnError),
    /// Blank input
    Skip,
    /// The user asked to leave
    Exit,
}

impl TurnOutcome {
    pub fn should_continue(&self) -> bool {
        !matches!(self, Self::Exit)
    }
}

/// In-chat commands, handled without calling the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Projects,
    New(String),
    Switch(String),
    Project,
    History(usize),
    Artifact { path: PathBuf, prompt: String },
    Mode,
    Help,
}

impl ChatCommand {
    /// Parse a `/command args...` line
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let body = line.strip_prefix('/').unwrap_or(line);
        let (name, rest) = match body.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (body, ""),
        };

        match name.to_lowercase().as_str() {
            "projects" | "list" => Ok(Self::Projects),
            "new" | "create" => required(rest, "/new <name>").map(Self::New),
            "switch" | "open" => required(rest, "/switch <name>").map(Self::Switch),
            "project" => Ok(Self::Project),
            "history" => {
                if rest.is_empty() {
                    Ok(Self::History(DEFAULT_HISTORY_LINES))
                } else {
                    rest.parse()
                        .map(Self::History)
                        .map_err(|_| format!("Not a number: {}", rest))
                }
            }
            "artifact" | "save" => {
                let rest = required(rest, "/artifact <path> [prompt]")?;
                let (path, prompt) = match rest.split_once(char::is_whitespace) {
                    Some((path, prompt)) => (path, prompt.trim()),
                    None => (rest.as_str(), ""),
                };
                Ok(Self::Artifact {
                    path: PathBuf::from(path),
                    prompt: prompt.to_string(),
                })
            }
            "mode" => Ok(Self::Mode),
            "help" | "?" => Ok(Self::Help),
            other => Err(format!("Unknown command: /{} (try /help)", other)),
        }
    }
}

fn required(rest: &str, usage: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("Usage: {}", usage))
    } else {
        Ok(rest.to_string())
    }
}

pub fn is_exit_word(line: &str) -> bool {
    let word = line.trim().to_lowercase();
    EXIT_WORDS.contains(&word.as_str())
}

pub fn help_text() -> String {
    [
        "Commands:",
        "  /projects                 list projects",
        "  /new <name>               create a project",
        "  /switch <name>            make a project active",
        "  /project                  show the active project",
        "  /history [n]              show the last n chat entries",
        "  /artifact <path> [prompt] copy a generated file into the project",
        "  /mode                     show the backend in use",
        "  exit | quit | bye         leave",
    ]
    .join("\n")
}

/// Handle one line of input against the session
pub async fn process_turn(state: &mut AppState, line: &str) -> TurnOutcome {
    let line = line.trim();

    if line.is_empty() {
        return TurnOutcome::Skip;
    }
    if is_exit_word(line) {
        return TurnOutcome::Exit;
    }
    if line.starts_with('/') {
        return match ChatCommand::parse(line) {
            Ok(command) => run_command(state, command),
            Err(message) => TurnOutcome::Failed(TurnError::new(TurnErrorKind::Command, message)),
        };
    }

    state.workspace.log_chat("user", line);

    match state.dispatcher.dispatch(line).await {
        Ok(result) => {
            state.workspace.log_chat("assistant", &result.text);
            TurnOutcome::Reply(result)
        }
        Err(e) => TurnOutcome::Failed(TurnError::new(
            TurnErrorKind::Generation,
            format!("{:#}", e),
        )),
    }
}

fn run_command(state: &mut AppState, command: ChatCommand) -> TurnOutcome {
    let workspace = &mut state.workspace;

    match command {
        ChatCommand::Projects => {
            let mut names: Vec<String> = workspace.list_projects().collect();
            names.sort();
            let active = workspace.active_project().to_string();
            let listing = names
                .into_iter()
                .map(|name| {
                    let marker = if name == active { "*" } else { " " };
                    format!("{} {}", marker, name)
                })
                .collect::<Vec<_>>()
                .join("\n");
            TurnOutcome::Command(listing)
        }
        ChatCommand::New(name) => outcome_to_turn(workspace.create_project(&name)),
        ChatCommand::Switch(name) => outcome_to_turn(workspace.switch_project(&name)),
        ChatCommand::Project => TurnOutcome::Command(format!(
            "{} ({})",
            workspace.active_project(),
            workspace.active_project_path().display()
        )),
        ChatCommand::History(count) => match workspace.chat_history() {
            Ok(entries) => {
                let skip = entries.len().saturating_sub(count);
                let lines = entries
                    .iter()
                    .skip(skip)
                    .map(|e| format!("{}: {}", e.sender, e.text))
                    .collect::<Vec<_>>();
                if lines.is_empty() {
                    TurnOutcome::Command("(no history yet)".to_string())
                } else {
                    TurnOutcome::Command(lines.join("\n"))
                }
            }
            Err(e) => TurnOutcome::Failed(TurnError::new(
                TurnErrorKind::Workspace,
                format!("{:#}", e),
            )),
        },
        ChatCommand::Artifact { path, prompt } => {
            let prompt = if prompt.is_empty() {
                path.file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default()
            } else {
                prompt
            };
            match workspace.save_artifact(&path, &prompt) {
                Some(dest) => TurnOutcome::Command(format!("Saved to {}", dest.display())),
                None => TurnOutcome::Failed(TurnError::new(
                    TurnErrorKind::Workspace,
                    format!("Could not save artifact from {}", path.display()),
                )),
            }
        }
        ChatCommand::Mode => {
            let generator = state.dispatcher.generator();
            TurnOutcome::Command(format!("{} ({})", state.mode, generator.name()))
        }
        ChatCommand::Help => TurnOutcome::Command(help_text()),
    }
}

fn outcome_to_turn(outcome: crate::workspace::Outcome) -> TurnOutcome {
    if outcome.ok {
        TurnOutcome::Command(outcome.message)
    } else {
        TurnOutcome::Failed(TurnError::new(TurnErrorKind::Workspace, outcome.message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Config;
    use crate::connectivity::Mode;
    use crate::dispatch::Language;
    use crate::models::{MockGenerator, PromptStyle};
    use crate::workspace::ProjectWorkspace;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn state_with(generator: MockGenerator) -> (TempDir, AppState) {
        let dir = TempDir::new().unwrap();
        let workspace = ProjectWorkspace::initialize(dir.path()).unwrap();
        let state = AppState::new(Config::default(), Mode::Offline, workspace, Arc::new(generator));
        (dir, state)
    }

    fn idle_generator() -> MockGenerator {
        let mut generator = MockGenerator::new();
        generator.expect_generate().never();
        generator
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ChatCommand::parse("/projects"), Ok(ChatCommand::Projects));
        assert_eq!(
            ChatCommand::parse("/new  Robot Arm "),
            Ok(ChatCommand::New("Robot Arm".to_string()))
        );
        assert_eq!(ChatCommand::parse("/history"), Ok(ChatCommand::History(10)));
        assert_eq!(ChatCommand::parse("/history 3"), Ok(ChatCommand::History(3)));
        assert_eq!(
            ChatCommand::parse("/artifact out.stl a small wheel"),
            Ok(ChatCommand::Artifact {
                path: PathBuf::from("out.stl"),
                prompt: "a small wheel".to_string(),
            })
        );
        assert!(ChatCommand::parse("/switch").is_err());
        assert!(ChatCommand::parse("/history lots").is_err());
        assert!(ChatCommand::parse("/dance").is_err());
    }

    #[test]
    fn test_exit_words() {
        assert!(is_exit_word("exit"));
        assert!(is_exit_word("  Bye "));
        assert!(is_exit_word("GOODBYE"));
        assert!(!is_exit_word("exit now"));
    }

    #[tokio::test]
    async fn test_blank_and_exit_never_reach_backend() {
        let (_dir, mut state) = state_with(idle_generator());
        assert_eq!(process_turn(&mut state, "   ").await, TurnOutcome::Skip);
        let outcome = process_turn(&mut state, "quit").await;
        assert_eq!(outcome, TurnOutcome::Exit);
        assert!(!outcome.should_continue());
        assert!(state.workspace.chat_history().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reply_is_logged_on_both_sides() {
        let mut generator = MockGenerator::new();
        generator
            .expect_prompt_style()
            .return_const(PromptStyle::Instruction);
        generator
            .expect_generate()
            .times(1)
            .returning(|_, _, _| Ok(" Hello! </s>".to_string()));
        let (_dir, mut state) = state_with(generator);

        let outcome = process_turn(&mut state, "Hi there").await;
        assert_eq!(
            outcome,
            TurnOutcome::Reply(DispatchResult {
                text: "Hello!".to_string(),
                language: Language::En,
            })
        );

        let history = state.workspace.chat_history().unwrap();
        let pairs: Vec<(&str, &str)> = history
            .iter()
            .map(|e| (e.sender.as_str(), e.text.as_str()))
            .collect();
        assert_eq!(pairs, vec![("user", "Hi there"), ("assistant", "Hello!")]);
    }

    #[tokio::test]
    async fn test_generation_failure_keeps_session_alive() {
        let mut generator = MockGenerator::new();
        generator
            .expect_prompt_style()
            .return_const(PromptStyle::Instruction);
        generator
            .expect_generate()
            .times(1)
            .returning(|_, _, _| anyhow::bail!("connection refused"));
        let (_dir, mut state) = state_with(generator);

        let outcome = process_turn(&mut state, "hello").await;
        match &outcome {
            TurnOutcome::Failed(err) => {
                assert_eq!(err.kind, TurnErrorKind::Generation);
                assert!(err.message.contains("connection refused"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(outcome.should_continue());
        // the user side is still recorded
        assert_eq!(state.workspace.chat_history().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_project_commands() {
        let (_dir, mut state) = state_with(idle_generator());

        let created = process_turn(&mut state, "/new Rover").await;
        assert!(matches!(created, TurnOutcome::Command(_)));

        let duplicate = process_turn(&mut state, "/new Rover").await;
        assert!(matches!(
            duplicate,
            TurnOutcome::Failed(TurnError { kind: TurnErrorKind::Workspace, .. })
        ));

        let missing = process_turn(&mut state, "/switch Ghost").await;
        assert!(matches!(missing, TurnOutcome::Failed(_)));
        assert_eq!(state.workspace.active_project(), "temp");

        process_turn(&mut state, "/switch Rover").await;
        assert_eq!(state.workspace.active_project(), "Rover");

        assert_eq!(
            process_turn(&mut state, "/projects").await,
            TurnOutcome::Command("* Rover\n  temp".to_string())
        );
    }

    #[tokio::test]
    async fn test_artifact_command() {
        let (dir, mut state) = state_with(idle_generator());
        let source = dir.path().join("output.stl");
        std::fs::write(&source, "solid x").unwrap();

        let line = format!("/artifact {} tiny wheel", source.display());
        match process_turn(&mut state, &line).await {
            TurnOutcome::Command(message) => assert!(message.ends_with("_tiny_wheel.stl")),
            other => panic!("expected saved artifact, got {:?}", other),
        }

        let missing = process_turn(&mut state, "/artifact /no/such/file.stl x").await;
        assert!(matches!(
            missing,
            TurnOutcome::Failed(TurnError { kind: TurnErrorKind::Workspace, .. })
        ));
    }

    #[tokio::test]
    async fn test_history_command_tails_log() {
        let (_dir, mut state) = state_with(idle_generator());
        assert_eq!(
            process_turn(&mut state, "/history").await,
            TurnOutcome::Command("(no history yet)".to_string())
        );
        state.workspace.log_chat("user", "one");
        state.workspace.log_chat("assistant", "two");
        state.workspace.log_chat("user", "three");
        assert_eq!(
            process_turn(&mut state, "/history 2").await,
            TurnOutcome::Command("assistant: two\nuser: three".to_string())
        );
    }
}
