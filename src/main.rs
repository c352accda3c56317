use cascade::cli::commands::Cli;
use cascade::cli::handlers;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    // Engine decisions are logged at debug; set CASCADE_LOG=debug to see them.
    let filter = std::env::var("CASCADE_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
