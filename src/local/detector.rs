use std::time::Duration;

use crate::constants::{LOCAL_SERVER_BINARY, LOCAL_SERVER_HEALTH_TIMEOUT_MS};

/// Check if llama-server is on PATH
pub fn is_installed() -> bool {
    which::which(LOCAL_SERVER_BINARY).is_ok()
}

/// Check if a llama.cpp server is answering at `server_url`
pub async fn is_server_running(server_url: &str) -> bool {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(LOCAL_SERVER_HEALTH_TIMEOUT_MS))
        .build();

    if let Ok(client) = client {
        let url = format!("{}/health", server_url.trim_end_matches('/'));
        if let Ok(resp) = client.get(&url).send().await {
            return resp.status().is_success();
        }
    }

    false
}
