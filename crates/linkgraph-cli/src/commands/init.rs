//! `linkgraph init`: Write a default configuration and wallet key.

use clap::Args;
use linkgraph::{Chain, Environment};

use super::Context;
use crate::config::CliConfig;
use crate::wallet;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Chain family of the generated wallet (eth, solana).
    #[arg(long, default_value = "eth")]
    pub chain: Chain,

    /// Overwrite an existing configuration and key.
    #[arg(long)]
    pub force: bool,
}

pub fn run(ctx: &Context, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = &ctx.config_path;
    if config_path.exists() && !args.force {
        anyhow::bail!(
            "configuration file already exists at {}",
            config_path.display()
        );
    }

    let mut config = CliConfig::default();
    config.graph.chain = args.chain;
    if let Some(ref namespace) = ctx.namespace {
        config.graph.namespace = namespace.clone();
    }
    if let Some(ref environment) = ctx.environment {
        config.graph.environment = Environment::from_name(environment);
    }
    config.graph.validate()?;
    config.save(config_path)?;

    let key_path = config.key_path(config_path);
    if key_path.exists() && !args.force {
        anyhow::bail!("key file already exists at {}", key_path.display());
    }
    let (secret, address) = wallet::generate(args.chain);
    std::fs::write(&key_path, format!("{}\n", secret.as_str()))?;
    tracing::info!(path = %key_path.display(), chain = %args.chain, "wrote wallet key");

    println!("Initialized linkgraph at {}", config_path.display());
    println!("  Namespace: {}", config.graph.namespace);
    println!("  Chain:     {}", args.chain);
    println!("  Address:   {}", address);
    println!("  Key file:  {}", key_path.display());
    println!("Keep the key file private; it controls your identity.");
    Ok(())
}
