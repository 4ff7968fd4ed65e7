//! Linkgraph CLI: manage a wallet's social graph from the command line.
//!
//! Subcommands: init, connect, disconnect, alias, links, whoami, info,
//! popular.

mod commands;
mod config;
mod wallet;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Linkgraph: follow accounts with a wallet-derived identity.
#[derive(Parser, Debug)]
#[command(name = "linkgraph", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, default_value = "linkgraph.toml")]
    config: PathBuf,

    /// Override the graph namespace.
    #[arg(long, global = true)]
    namespace: Option<String>,

    /// Override the environment (production, staging).
    #[arg(long, global = true)]
    environment: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration and generate a wallet key.
    Init(commands::init::InitArgs),
    /// Follow an address.
    Connect(commands::connect::ConnectArgs),
    /// Unfollow an address.
    Disconnect(commands::disconnect::DisconnectArgs),
    /// Set the alias of a followed address.
    Alias(commands::alias::AliasArgs),
    /// List the links held in the mirror document.
    Links(commands::links::LinksArgs),
    /// Show the wallet address and derived DID.
    Whoami,
    /// Show follow counts of an address.
    Info(commands::info::InfoArgs),
    /// List popular accounts.
    Popular(commands::popular::PopularArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }

    let ctx = commands::Context {
        config_path: cli.config,
        namespace: cli.namespace,
        environment: cli.environment,
    };

    match &cli.command {
        Commands::Init(args) => commands::init::run(&ctx, args),
        Commands::Connect(args) => commands::connect::run(&ctx, args).await,
        Commands::Disconnect(args) => commands::disconnect::run(&ctx, args).await,
        Commands::Alias(args) => commands::alias::run(&ctx, args).await,
        Commands::Links(args) => commands::links::run(&ctx, args).await,
        Commands::Whoami => commands::whoami::run(&ctx).await,
        Commands::Info(args) => commands::info::run(&ctx, args).await,
        Commands::Popular(args) => commands::popular::run(&ctx, args).await,
    }
}
