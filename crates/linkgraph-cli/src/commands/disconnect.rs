//! `linkgraph disconnect`: Unfollow an address.

use clap::Args;

use super::{print_report, Context};

#[derive(Args, Debug)]
pub struct DisconnectArgs {
    /// Address to unfollow.
    pub target: String,
}

pub async fn run(ctx: &Context, args: &DisconnectArgs) -> anyhow::Result<()> {
    let graph = ctx.graph()?;
    let report = graph.disconnect(&args.target).await?;
    print_report("Disconnected from", &args.target, &report);
    Ok(())
}
