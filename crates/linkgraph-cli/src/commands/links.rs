//! `linkgraph links`: List the links held in the mirror document.

use clap::Args;

use super::Context;

#[derive(Args, Debug)]
pub struct LinksArgs {
    /// Include links from every namespace.
    #[arg(long)]
    pub all: bool,

    /// Print as JSON.
    #[arg(long)]
    pub json: bool,
}

pub async fn run(ctx: &Context, args: &LinksArgs) -> anyhow::Result<()> {
    let graph = ctx.graph()?;
    let namespace = graph.options().namespace.clone();
    let links: Vec<_> = graph
        .links()
        .await?
        .into_iter()
        .filter(|link| args.all || link.namespace == namespace)
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&links)?);
        return Ok(());
    }
    if links.is_empty() {
        println!("No links.");
        return Ok(());
    }
    for link in &links {
        let alias = if link.alias.is_empty() {
            String::new()
        } else {
            format!(" ({})", link.alias)
        };
        println!(
            "{}{}  [{}]  since {}",
            link.target,
            alias,
            link.namespace,
            link.created_at.to_rfc3339()
        );
    }
    Ok(())
}
