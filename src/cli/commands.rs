use anyhow::Result;
use colored::Colorize;

use crate::{
    app::{init_config, Config},
    connectivity::{ConnectivityProbe, Reachability},
    constants::{PROJECTS_DIR, TEMP_PROJECT},
    local::{is_installed as is_llama_installed, is_server_running},
    workspace::project_names,
};

use super::Commands;

/// Handle CLI subcommands. Returns `true` when the process should exit
/// instead of starting a chat.
pub async fn handle_command(command: &Commands, config: &Config) -> Result<bool> {
    match command {
        Commands::Init => {
            println!("Initializing Dayna configuration...");
            init_config()?;
            println!("Configuration initialized successfully!");
            Ok(true)
        }
        Commands::Status => {
            show_status(config).await;
            Ok(true)
        }
        Commands::Projects => {
            list_projects(config)?;
            Ok(true)
        }
        Commands::Chat => Ok(false),
    }
}

/// List projects without touching the temp project
pub fn list_projects(config: &Config) -> Result<()> {
    let projects_dir = config.workspace.root.join(PROJECTS_DIR);
    if !projects_dir.is_dir() {
        println!("No projects yet in {}", projects_dir.display());
        return Ok(());
    }

    let names = sorted_project_names(config);

    println!("Projects in {}:", projects_dir.display());
    for name in names {
        if name == TEMP_PROJECT {
            println!("  • {} {}", name, "(scratch, cleared on start)".dimmed());
        } else {
            println!("  • {}", name.green());
        }
    }
    Ok(())
}

/// Show readiness of both backends
async fn show_status(config: &Config) {
    println!("Dayna Status:");
    println!();

    let probe = ConnectivityProbe::from_config(config);
    if probe.is_reachable().await {
        println!("  [OK] Internet: reachable (online mode available)");
    } else {
        println!("  [WARNING] Internet: unreachable (auto mode will go offline)");
    }

    println!("\n  Online:");
    if config.remote.api_key().is_some() {
        println!("    [OK] {}: Set", config.remote.api_key_env);
    } else {
        println!("    [ERROR] {}: Not set", config.remote.api_key_env);
    }
    println!("    • Model: {}", config.remote.model);

    println!("\n  Offline:");
    match std::fs::metadata(&config.local.model_path) {
        Ok(meta) if meta.is_file() => {
            let size_gb = meta.len() as f64 / (1024.0 * 1024.0 * 1024.0);
            println!(
                "    [OK] Model: {} ({:.1} GB)",
                config.local.model_path.display(),
                size_gb
            );
        }
        _ => {
            println!(
                "    [ERROR] Model: {} not found",
                config.local.model_path.display()
            );
        }
    }
    if is_server_running(&config.local.server_url).await {
        println!("    [OK] llama-server: Running at {}", config.local.server_url);
    } else if is_llama_installed() {
        println!("    [WARNING] llama-server: Installed (not running, starts on demand)");
    } else {
        println!("    [ERROR] llama-server: Not installed");
    }

    println!(
        "\n  Workspace: {}",
        config.workspace.root.join(PROJECTS_DIR).display()
    );
    let names = sorted_project_names(config);
    if names.is_empty() {
        println!("    • No projects yet");
    } else {
        println!("    • Projects ({}): {}", names.len(), names.join(", "));
    }
    println!();
}

fn sorted_project_names(config: &Config) -> Vec<String> {
    let mut names: Vec<String> =
        project_names(&config.workspace.root.join(PROJECTS_DIR)).collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_project_listing_is_sorted_and_read_only() {
        let dir = TempDir::new().unwrap();
        let projects = dir.path().join(PROJECTS_DIR);
        for name in ["zeta", TEMP_PROJECT, "alpha"] {
            std::fs::create_dir_all(projects.join(name)).unwrap();
        }
        std::fs::write(projects.join(TEMP_PROJECT).join("chat_history.jsonl"), "{}\n").unwrap();

        let mut config = Config::default();
        config.workspace.root = dir.path().to_path_buf();

        assert_eq!(sorted_project_names(&config), vec!["alpha", "temp", "zeta"]);
        assert!(projects.join(TEMP_PROJECT).join("chat_history.jsonl").exists());
    }
}
