//! `linkgraph alias`: Rename a followed address.

use clap::Args;

use super::{print_report, Context};

#[derive(Args, Debug)]
pub struct AliasArgs {
    /// Followed address.
    pub target: String,

    /// New alias.
    pub alias: String,
}

pub async fn run(ctx: &Context, args: &AliasArgs) -> anyhow::Result<()> {
    let graph = ctx.graph()?;
    let report = graph.set_alias(&args.target, &args.alias).await?;
    print_report(&format!("Aliased \"{}\" ->", args.alias), &args.target, &report);
    Ok(())
}
