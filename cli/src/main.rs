//! `flagdemo`: a small tool built on `command-flags-core`.
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default `warn`).

mod commands;

use std::io;

use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = std::env::args_os().map(|arg| arg.to_string_lossy().into_owned());
    let mut app = commands::build_app();
    let code = app.run(args, &mut io::stdout().lock(), &mut io::stderr().lock());
    std::process::exit(code);
}
