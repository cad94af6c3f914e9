use anyhow::{Context, Result};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};

use super::detector::{is_installed, is_server_running};
use super::guide::print_install_guide;
use crate::app::LocalConfig;
use crate::constants::{
    LOCAL_SERVER_BINARY, LOCAL_SERVER_MAX_STARTUP_ATTEMPTS, LOCAL_SERVER_STARTUP_WAIT_SECS,
};
use crate::utils::{log_info, log_warn};

/// A llama-server process this run started
pub struct ServerHandle {
    child: Child,
}

impl ServerHandle {
    /// Stop the server we started
    pub async fn stop(mut self) -> Result<()> {
        log_info("[LOCAL]", "Stopping llama-server...");
        if let Err(e) = self.child.kill().await {
            log_warn("[LOCAL]", format!("Failed to stop llama-server gracefully: {}", e));
        }
        Ok(())
    }
}

/// Port component of the server URL, if any
fn server_port(server_url: &str) -> Option<u16> {
    let without_scheme = server_url.split("://").nth(1).unwrap_or(server_url);
    let authority = without_scheme.split('/').next()?;
    authority.rsplit_once(':')?.1.parse().ok()
}

fn server_args(config: &LocalConfig) -> Vec<String> {
    let mut args = vec![
        "-m".to_string(),
        config.model_path.display().to_string(),
        "-c".to_string(),
        config.context_size.to_string(),
        "-t".to_string(),
        config.threads.to_string(),
        "-ngl".to_string(),
        config.gpu_layers.to_string(),
    ];
    if let Some(port) = server_port(&config.server_url) {
        args.push("--port".to_string());
        args.push(port.to_string());
    }
    args
}

/// Start llama-server for the configured model and wait until it is healthy
pub async fn start_server(config: &LocalConfig) -> Result<ServerHandle> {
    log_info(
        "[LOCAL]",
        format!("Loading {} ...", config.model_path.display()),
    );

    let child = Command::new(LOCAL_SERVER_BINARY)
        .args(server_args(config))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .context("Failed to launch llama-server")?;

    let mut handle = ServerHandle { child };

    tokio::time::sleep(Duration::from_secs(LOCAL_SERVER_STARTUP_WAIT_SECS)).await;

    for _ in 0..LOCAL_SERVER_MAX_STARTUP_ATTEMPTS {
        if is_server_running(&config.server_url).await {
            log_info("[LOCAL]", "llama-server is ready");
            return Ok(handle);
        }
        if let Ok(Some(status)) = handle.child.try_wait() {
            anyhow::bail!("llama-server exited during startup ({})", status);
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    handle.stop().await?;
    anyhow::bail!(
        "llama-server did not become healthy at {}. Try running it by hand to see its logs.",
        config.server_url
    )
}

/// Make sure a local server is answering.
///
/// Returns `Some(handle)` only when this call started the server, so the
/// caller knows to stop it on exit.
pub async fn ensure_server(config: &LocalConfig) -> Result<Option<ServerHandle>> {
    if is_server_running(&config.server_url).await {
        return Ok(None);
    }

    if !config.auto_start {
        anyhow::bail!(
            "No llama-server answering at {} and auto_start is disabled",
            config.server_url
        );
    }

    if !is_installed() {
        print_install_guide();
        anyhow::bail!("llama-server is not installed");
    }

    start_server(config).await.map(Some)
}
