mod cli;
mod codec;
mod display;
mod error;
mod exit_codes;
mod models;
mod provider;
mod submission;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn init_logging(debug: bool) {
    let default = if debug { "coderound=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let code = cli::run(cli).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        exit_codes::ERROR
    });
    std::process::exit(code);
}
