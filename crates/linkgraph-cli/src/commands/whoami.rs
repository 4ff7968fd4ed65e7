//! `linkgraph whoami`: Show the wallet address and derived DID.

use super::Context;

pub async fn run(ctx: &Context) -> anyhow::Result<()> {
    let graph = ctx.graph()?;
    let identity = graph.identity().await?;
    println!("Identity:");
    println!("  Address:   {}", identity.wallet_address);
    println!("  Account:   {}", identity.auth_id);
    println!("  DID:       {}", identity.did);
    println!("  Namespace: {}", graph.options().namespace);
    Ok(())
}
