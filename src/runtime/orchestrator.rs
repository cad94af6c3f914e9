use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::non_interactive::NonInteractiveRunner;
use super::turn::{process_turn, TurnOutcome};
use crate::{
    app::{load_config, AppState, Config},
    cli::{handle_command, Cli},
    connectivity::{ConnectivityProbe, Mode, ModeArbiter, ModePreference},
    local::{ensure_server, ServerHandle},
    models::GeneratorFactory,
    utils::{log_progress, log_warn},
    workspace::ProjectWorkspace,
};

/// Main runtime orchestrator
pub struct Orchestrator {
    cli: Cli,
    config: Config,
    server: Option<ServerHandle>,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        let mut config = load_config(cli.config.as_deref())?;

        if let Some(root) = &cli.workspace {
            config.workspace.root = root.clone();
        }

        Ok(Self {
            cli,
            config,
            server: None,
        })
    }

    /// Run the orchestrator
    pub async fn run(mut self) -> Result<()> {
        if let Some(command) = &self.cli.command {
            if handle_command(command, &self.config).await? {
                return Ok(());
            }
        }

        let result = self.run_session().await;
        self.cleanup().await?;
        result
    }

    async fn run_session(&mut self) -> Result<()> {
        let state = self.bootstrap().await?;

        if let Some(prompt) = self.cli.prompt.clone() {
            let runner = NonInteractiveRunner::new(&state);
            let result = runner.execute(&prompt).await;
            println!("{}", NonInteractiveRunner::format_result(&result, self.cli.output_format));
            if !result.errors.is_empty() {
                self.cleanup().await?;
                std::process::exit(1);
            }
            return Ok(());
        }

        self.chat_loop(state).await
    }

    /// Decide the mode, validate what it needs, prepare the workspace
    async fn bootstrap(&mut self) -> Result<AppState> {
        let preference = self.cli.mode.unwrap_or(self.config.mode.default);

        log_progress(1, 4, "Checking connectivity");
        let mode = decide_mode(preference, &self.config).await;

        log_progress(2, 4, format!("Preparing {} backend", mode));
        let generator = GeneratorFactory::create(mode, &self.config)?;
        if mode == Mode::Offline {
            self.server = ensure_server(&self.config.local).await?;
        }

        log_progress(3, 4, "Opening workspace");
        let mut workspace = ProjectWorkspace::initialize(&self.config.workspace.root)?;
        if let Some(project) = &self.cli.project {
            // create is a no-op for an existing project
            workspace.create_project(project);
            let outcome = workspace.switch_project(project);
            if !outcome.ok {
                anyhow::bail!("{}", outcome.message);
            }
        }

        log_progress(4, 4, "Ready");
        Ok(AppState::new(self.config.clone(), mode, workspace, generator))
    }

    async fn chat_loop(&self, mut state: AppState) -> Result<()> {
        print_banner(&state);

        let farewell = state.config.assistant.farewell.clone();
        let name = state.assistant_name().to_string();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("\n{} ", "You:".cyan().bold());
            std::io::stdout().flush()?;

            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = tokio::signal::ctrl_c() => None,
            };
            let Some(line) = line else {
                break;
            };

            // Ctrl-C during generation ends the whole session
            let outcome = tokio::select! {
                outcome = process_turn(&mut state, &line) => outcome,
                _ = tokio::signal::ctrl_c() => TurnOutcome::Exit,
            };

            match &outcome {
                TurnOutcome::Reply(result) => {
                    println!(
                        "{} {}",
                        format!("{} ({}):", name, result.language).magenta().bold(),
                        result.text
                    );
                }
                TurnOutcome::Command(message) => println!("{}", message),
                TurnOutcome::Failed(err) => {
                    eprintln!("{} {}", "Error:".red().bold(), err);
                }
                TurnOutcome::Skip | TurnOutcome::Exit => {}
            }

            if !outcome.should_continue() {
                break;
            }
        }

        println!("\n{}: {}\n", name, farewell);
        Ok(())
    }

    /// Cleanup on exit
    async fn cleanup(&mut self) -> Result<()> {
        if let Some(server) = self.server.take() {
            server.stop().await?;
        }
        Ok(())
    }
}

/// Probe only when the preference leaves the choice open
pub async fn decide_mode(preference: ModePreference, config: &Config) -> Mode {
    let probe = ConnectivityProbe::from_config(config);
    ModeArbiter::new(&probe).decide(preference).await
}

fn print_banner(state: &AppState) {
    let rule = "=".repeat(50);
    println!("\n{}", rule);
    println!(
        "{} is ready! ({} mode, project: {})",
        state.assistant_name().bold(),
        match state.mode {
            Mode::Online => state.mode.as_str().green(),
            Mode::Offline => state.mode.as_str().yellow(),
        },
        state.workspace.active_project()
    );
    println!("Type your messages in Hindi or English.");
    println!("Type /help for commands, 'exit' to quit.");
    println!("{}", rule);

    if state.mode == Mode::Offline {
        log_warn("[MODE]", "Offline: answers come from the local model only");
    }
}
