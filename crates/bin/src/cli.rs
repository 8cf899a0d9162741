//! CLI argument definitions for the tokenlist binary.

use clap::{Parser, Subcommand};

/// Token-addressed todo list server
#[derive(Parser, Debug)]
#[command(name = "tokenlist")]
#[command(about = "tokenlist: shareable todo lists behind unguessable tokens")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Check health of a running tokenlist server
    Health(HealthArgs),
}

/// Arguments for the serve command
#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8000, env = "TOKENLIST_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(long, default_value = "0.0.0.0", env = "TOKENLIST_HOST")]
    pub host: String,

    /// Value sent in the Access-Control-Allow-Origin header
    #[arg(long, default_value = "*", env = "TOKENLIST_ALLOW_ORIGIN")]
    pub allow_origin: String,
}

/// Arguments for the health command
#[derive(clap::Args, Debug)]
pub struct HealthArgs {
    /// Port of the server to check
    #[arg(short, long, default_value_t = 8000, env = "TOKENLIST_PORT")]
    pub port: u16,

    /// Host of the server to check
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Timeout in seconds
    #[arg(short, long, default_value_t = 5)]
    pub timeout: u64,
}
