mod cli;
mod config;
mod console;
mod images;
mod interview;
mod model;
mod operator;
mod prompt;
mod schema;
mod session;
mod storage;
mod viewer;

use std::{io, process};

use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr; stdout carries the prompts.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("labeller=warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = cli::run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
