/// llama.cpp server integration module - Gateway
mod detector;
mod guide;
mod server;

pub use detector::{is_installed, is_server_running};
pub use guide::print_install_guide;
pub use server::{ensure_server, start_server, ServerHandle};
