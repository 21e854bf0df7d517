//! CLI entrypoint for the syngrep structural search tool.
//!
//! The binary delegates to [`syngrep_cli::run`]; this shim only wires up
//! diagnostics and the standard streams.

use std::io;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    syngrep_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
