pub mod alias;
pub mod connect;
pub mod disconnect;
pub mod info;
pub mod init;
pub mod links;
pub mod popular;
pub mod whoami;

use linkgraph::{Environment, GraphFacade, MirrorStatus, OperationReport};
use std::path::PathBuf;

use crate::config::CliConfig;
use crate::wallet;

/// Global flags shared by every subcommand.
pub struct Context {
    pub config_path: PathBuf,
    pub namespace: Option<String>,
    pub environment: Option<String>,
}

impl Context {
    /// Load the config file and apply command-line overrides.
    pub fn config(&self) -> anyhow::Result<CliConfig> {
        let mut config = CliConfig::load(&self.config_path)?;
        if let Some(ref namespace) = self.namespace {
            config.graph.namespace = namespace.clone();
        }
        if let Some(ref environment) = self.environment {
            config.graph.environment = Environment::from_name(environment);
        }
        Ok(config)
    }

    /// Graph client signing with the configured key file.
    pub fn graph(&self) -> anyhow::Result<GraphFacade> {
        let config = self.config()?;
        let key_path = config.key_path(&self.config_path);
        let signer = wallet::load(config.graph.chain, &key_path)?;
        let graph = GraphFacade::builder(config.graph).signer(signer).build()?;
        Ok(graph)
    }
}

/// Print the outcome of a mutation.
pub fn print_report(action: &str, target: &str, report: &OperationReport) {
    println!("{} {}", action, target);
    match &report.mirror {
        MirrorStatus::Synced => println!("  Mirror:  synced"),
        MirrorStatus::Lagging(e) => println!("  Mirror:  lagging ({})", e),
    }
    if let Some(ref warning) = report.binding_warning {
        println!("  Binding: {}", warning);
    }
}
