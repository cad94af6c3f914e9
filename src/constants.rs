/// Constants module to avoid magic numbers in the codebase

// Connectivity probe
pub const DEFAULT_PROBE_TIMEOUT_SECS: f64 = 3.0;
pub const DEFAULT_DNS_TARGET: &str = "8.8.8.8:53";
pub const DEFAULT_HTTP_ENDPOINTS: &[&str] = &[
    "https://www.google.com",
    "https://www.cloudflare.com",
    "https://1.1.1.1",
];

// Remote backend (Gemini)
pub const DEFAULT_REMOTE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_REMOTE_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

// Local backend (llama.cpp server)
pub const DEFAULT_LOCAL_SERVER_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_LOCAL_MODEL_PATH: &str = "backend/models/mistral-7b-instruct-v0.2.Q4_K_M.gguf";
pub const DEFAULT_LOCAL_CONTEXT_SIZE: usize = 4096;
pub const DEFAULT_LOCAL_THREADS: usize = 8;
pub const DEFAULT_LOCAL_GPU_LAYERS: usize = 35;
pub const LOCAL_SERVER_BINARY: &str = "llama-server";
pub const LOCAL_SERVER_HEALTH_TIMEOUT_MS: u64 = 500;
pub const LOCAL_SERVER_STARTUP_WAIT_SECS: u64 = 2;
pub const LOCAL_SERVER_MAX_STARTUP_ATTEMPTS: usize = 30;

// Timeouts
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 600; // 10 minutes for slow local inference

// Default generation parameters
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: usize = 512;

// Language detection
pub const DEVANAGARI_START: char = '\u{0900}';
pub const DEVANAGARI_END: char = '\u{097F}';
pub const HINDI_RATIO_THRESHOLD: f64 = 0.3;

// Workspace layout
pub const PROJECTS_DIR: &str = "projects";
pub const TEMP_PROJECT: &str = "temp";
pub const CAD_DIR: &str = "cad";
pub const BROWSER_DIR: &str = "browser";
pub const CHAT_LOG_FILE: &str = "chat_history.jsonl";
pub const ARTIFACT_EXTENSION: &str = "stl";
pub const ARTIFACT_PROMPT_CHARS: usize = 30;

// Assistant persona
pub const DEFAULT_ASSISTANT_NAME: &str = "Dayna";
pub const FAREWELL: &str = "अलविदा! Goodbye!";
pub const EXIT_WORDS: &[&str] = &["exit", "quit", "bye", "goodbye"];
