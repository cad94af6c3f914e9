/// Print OS-specific instructions for getting llama.cpp's server
pub fn print_install_guide() {
    eprintln!("[WARNING] llama-server not found on your system\n");

    #[cfg(target_os = "macos")]
    {
        eprintln!("To use offline mode, install llama.cpp:");
        eprintln!("[INSTALL] macOS: brew install llama.cpp\n");
    }

    #[cfg(target_os = "linux")]
    {
        eprintln!("To use offline mode, install llama.cpp:");
        eprintln!("[INSTALL] Linux: build from https://github.com/ggml-org/llama.cpp");
        eprintln!("   or");
        eprintln!("[DOWNLOAD] Grab a release binary from the same repository\n");
    }

    #[cfg(target_os = "windows")]
    {
        eprintln!("To use offline mode, install llama.cpp:");
        eprintln!("[INSTALL] Windows: winget install llama.cpp\n");
    }

    eprintln!("Or start a server yourself and point [local] server_url at it:");
    eprintln!("  llama-server -m <model.gguf> --port 8080");
    eprintln!("\nAlternatively, go online and run with --mode online");
}
