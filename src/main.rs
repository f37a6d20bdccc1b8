//! Fleetcheck CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fleetcheck::cli::{Cli, Commands};
use fleetcheck::infrastructure::config::ConfigLoader;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match cli.config.as_ref() {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => fleetcheck::cli::handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Simulate(args) => {
            fleetcheck::cli::commands::simulate::execute(args, config, cli.json).await
        }
        Commands::Config => fleetcheck::cli::commands::config::execute(&config, cli.json),
    };

    if let Err(err) = result {
        fleetcheck::cli::handle_error(err, cli.json);
    }
}
