use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::connectivity::ModePreference;
use crate::constants::{
    DEFAULT_API_KEY_ENV, DEFAULT_ASSISTANT_NAME, DEFAULT_DNS_TARGET, DEFAULT_HTTP_ENDPOINTS,
    DEFAULT_LOCAL_CONTEXT_SIZE, DEFAULT_LOCAL_GPU_LAYERS, DEFAULT_LOCAL_MODEL_PATH,
    DEFAULT_LOCAL_SERVER_URL, DEFAULT_LOCAL_THREADS, DEFAULT_MAX_TOKENS,
    DEFAULT_PROBE_TIMEOUT_SECS, DEFAULT_REMOTE_BASE_URL, DEFAULT_REMOTE_MODEL,
    DEFAULT_TEMPERATURE, FAREWELL, HTTP_REQUEST_TIMEOUT_SECS,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Preferred operating mode when no CLI override is given
    #[serde(default)]
    pub mode: ModeConfig,

    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub workspace: WorkspaceConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    /// Cloud backend (Gemini)
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Local backend (llama.cpp server + GGUF model)
    #[serde(default)]
    pub local: LocalConfig,
}

/// Persona settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    pub name: String,
    pub farewell: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_ASSISTANT_NAME.to_string(),
            farewell: FAREWELL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModeConfig {
    #[serde(default)]
    pub default: ModePreference,
}

/// Connectivity probe settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Timeout applied to every individual attempt
    pub timeout_secs: f64,
    /// Raw TCP target tried first
    pub dns_target: String,
    /// HTTP endpoints tried in order when the raw connect fails
    pub http_endpoints: Vec<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            dns_target: DEFAULT_DNS_TARGET.to_string(),
            http_endpoints: DEFAULT_HTTP_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs.max(0.0))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Directory holding `projects/`
    pub root: PathBuf,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub max_tokens: usize,
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Environment variable containing the API key
    pub api_key_env: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            model: DEFAULT_REMOTE_MODEL.to_string(),
            base_url: DEFAULT_REMOTE_BASE_URL.to_string(),
            timeout_secs: HTTP_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl RemoteConfig {
    /// Read the API key from the configured environment variable.
    /// Empty values count as missing.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalConfig {
    /// GGUF model file served by llama-server
    pub model_path: PathBuf,
    pub server_url: String,
    pub context_size: usize,
    pub threads: usize,
    pub gpu_layers: usize,
    /// Spawn llama-server when it is not already running
    pub auto_start: bool,
    pub timeout_secs: u64,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_LOCAL_MODEL_PATH),
            server_url: DEFAULT_LOCAL_SERVER_URL.to_string(),
            context_size: DEFAULT_LOCAL_CONTEXT_SIZE,
            threads: DEFAULT_LOCAL_THREADS,
            gpu_layers: DEFAULT_LOCAL_GPU_LAYERS,
            auto_start: true,
            timeout_secs: HTTP_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Load configuration from multiple sources
///
/// Precedence (lowest first): defaults, global config, `.dayna/config.toml`,
/// the explicit `override_file`, then `DAYNA_*` environment variables.
pub fn load_config(override_file: Option<&Path>) -> Result<Config> {
    let global_config = get_config_dir()?.join("config.toml");
    let local_config = PathBuf::from(".dayna/config.toml");

    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if global_config.exists() {
        figment = figment.merge(Toml::file(&global_config));
    }

    if local_config.exists() {
        figment = figment.merge(Toml::file(&local_config));
    }

    if let Some(path) = override_file {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        figment = figment.merge(Toml::file(path));
    }

    // DAYNA_PROBE__TIMEOUT_SECS=1 -> probe.timeout_secs
    figment = figment.merge(Env::prefixed("DAYNA_").split("__"));

    figment
        .extract()
        .context("Failed to load configuration")
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "dayna") {
        Ok(proj_dirs.config_dir().to_path_buf())
    } else {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        Ok(PathBuf::from(home).join(".config").join("dayna"))
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => get_config_dir()?.join("config.toml"),
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<()> {
    let config_file = get_config_dir()?.join("config.toml");

    if !config_file.exists() {
        save_config(&Config::default(), Some(config_file.clone()))?;
        println!("Created default configuration at: {}", config_file.display());
    } else {
        println!("Configuration already exists at: {}", config_file.display());
    }

    let local_example = PathBuf::from(".dayna/config.toml.example");
    if !local_example.exists() {
        if let Some(parent) = local_example.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let example_config = r#"# Dayna Workspace Configuration
# This file overrides global settings for this directory

[mode]
default = "auto"   # auto | online | offline

[workspace]
root = "."

[generation]
max_tokens = 512
temperature = 0.7

[local]
model_path = "backend/models/mistral-7b-instruct-v0.2.Q4_K_M.gguf"
server_url = "http://127.0.0.1:8080"
"#;
        std::fs::write(&local_example, example_config)?;
        println!("Created example configuration at: {}", local_example.display());
    }

    Ok(())
}
