mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tokenlist=info".parse()?))
        .init();

    match cli.command {
        Commands::Serve(args) => commands::serve::run(&args).await,
        Commands::Health(args) => commands::health::run(&args).await,
    }
}
