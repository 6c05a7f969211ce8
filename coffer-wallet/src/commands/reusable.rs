//! Reusable seed listing command

use anyhow::Result;

use crate::seeds::find_reusable_seeds_for;

use super::Context;

/// Run the reusable command
pub fn run(ctx: &Context, symbol: &str) -> Result<()> {
    // Reject unknown symbols up front
    ctx.coins.get(symbol)?;

    let registry = ctx.load_registry()?;
    let groups = find_reusable_seeds_for(symbol, registry.list_all());

    if groups.is_empty() {
        println!("No seeds available for {}.", symbol);
        return Ok(());
    }

    println!();
    println!("Seeds that can be reused for {}:", symbol);
    for (n, group) in groups.iter().enumerate() {
        println!();
        println!("  Seed #{} ({}…)", n + 1, short_hash(group.hash));
        for asset in &group.assets {
            println!("    {:<6} {}  [{}]", asset.symbol(), asset.label_or_address(), asset.id());
        }
    }

    println!();
    println!(
        "Use `coffer-wallet add-seed --symbol {} --reuse <id>` with any listed id.",
        symbol
    );

    Ok(())
}

/// First eight characters of a seed fingerprint
fn short_hash(hash: &str) -> String {
    hash.chars().take(8).collect()
}
