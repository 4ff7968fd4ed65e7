//! `linkgraph info`: Show follow counts of an address.

use clap::Args;

use super::Context;

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Address to look up; defaults to the local wallet.
    pub address: Option<String>,

    /// List followers and followings.
    #[arg(short, long)]
    pub verbose: bool,
}

pub async fn run(ctx: &Context, args: &InfoArgs) -> anyhow::Result<()> {
    let graph = ctx.graph()?;
    let address = match args.address {
        Some(ref address) => address.clone(),
        None => graph.identity().await?.wallet_address,
    };
    let info = graph.account_info(&address).await?;

    println!("Account {}", info.address);
    if let Some(ref ens) = info.ens {
        println!("  ENS:        {}", ens);
    }
    println!("  Followers:  {}", info.follower_count);
    println!("  Followings: {}", info.following_count);
    if args.verbose {
        for follower in &info.followers {
            println!("  <- {}", follower);
        }
        for following in &info.followings {
            println!("  -> {}", following);
        }
    }
    Ok(())
}
