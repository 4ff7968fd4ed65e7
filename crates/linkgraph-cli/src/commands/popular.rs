//! `linkgraph popular`: List popular accounts.

use clap::Args;

use super::Context;

#[derive(Args, Debug)]
pub struct PopularArgs {
    /// Tag to list.
    #[arg(short, long, default_value = linkgraph::DEFAULT_POPULAR_TAG)]
    pub tag: String,

    /// Authenticate first so followed accounts are marked.
    #[arg(long)]
    pub mine: bool,
}

pub async fn run(ctx: &Context, args: &PopularArgs) -> anyhow::Result<()> {
    let graph = ctx.graph()?;
    if args.mine {
        graph.authenticate().await?;
    }
    let accounts = graph.popular_accounts(Some(&args.tag)).await?;
    if accounts.is_empty() {
        println!("No popular accounts under {}.", args.tag);
        return Ok(());
    }
    for account in &accounts {
        let marker = if account.is_following { "*" } else { " " };
        let name = account.ens.as_deref().unwrap_or(&account.address);
        println!("{} {:<44} {:>8} followers", marker, name, account.follower_count);
    }
    Ok(())
}
