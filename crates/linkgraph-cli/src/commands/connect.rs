//! `linkgraph connect`: Follow an address.

use clap::Args;

use super::{print_report, Context};

#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Address to follow.
    pub target: String,

    /// Optional alias for the followed address.
    #[arg(short, long)]
    pub alias: Option<String>,
}

pub async fn run(ctx: &Context, args: &ConnectArgs) -> anyhow::Result<()> {
    let graph = ctx.graph()?;
    let report = graph.connect(&args.target, args.alias.as_deref()).await?;
    print_report("Connected to", &args.target, &report);
    Ok(())
}
