use std::io;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging system
pub fn init_logger(verbose: bool) {
    // RUST_LOG wins; otherwise info, or debug with --verbose
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // try_init so a second call (tests, embedding) is harmless
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr) // stdout is reserved for the conversation
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .try_init();
}

/// Log an info message with a component tag, e.g. `[MODE]`
pub fn log_info(tag: &str, message: impl std::fmt::Display) {
    info!("{} {}", tag, message);
}

/// Log a warning message with a component tag
pub fn log_warn(tag: &str, message: impl std::fmt::Display) {
    warn!("{} {}", tag, message);
}

/// Log an error message with a component tag
pub fn log_error(tag: &str, message: impl std::fmt::Display) {
    error!("{} {}", tag, message);
}

/// Log a debug message
pub fn log_debug(message: impl std::fmt::Display) {
    debug!("{}", message);
}

/// Progress indicator for startup sequence
pub fn log_progress(step: usize, total: usize, message: impl std::fmt::Display) {
    eprintln!("[{}/{}] -> {}", step, total, message);
}
