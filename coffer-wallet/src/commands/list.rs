//! Asset listing command

use anyhow::Result;

use crate::asset::{Asset, Secret};

use super::Context;

fn secret_kind(asset: &Asset) -> &'static str {
    match asset.secret() {
        Secret::None => "watch",
        Secret::PrivateKey(_) => "key",
        Secret::Seed(_) => "seed",
    }
}

/// Run the list command
pub fn run(ctx: &Context, symbol: Option<String>) -> Result<()> {
    let registry = ctx.load_registry()?;

    let assets: Vec<&Asset> = registry
        .list_all()
        .iter()
        .filter(|asset| symbol.as_deref().map_or(true, |s| asset.symbol() == s))
        .collect();

    if assets.is_empty() {
        println!("No assets.");
        return Ok(());
    }

    println!();
    println!("{:<6} {:<6} {:>16}  {}", "Symbol", "Secret", "Balance", "Asset");
    println!("{}", "-".repeat(72));

    for asset in &assets {
        println!(
            "{:<6} {:<6} {:>16.8}  {}",
            asset.symbol(),
            secret_kind(asset),
            asset.balance(),
            asset.label_or_address()
        );
        println!("{:<30}  id: {}", "", asset.id());
        for address in asset.addresses().iter().skip(1) {
            println!("{:<30}  + {}", "", address);
        }
    }

    println!();
    println!("Symbols: {}", crate::seeds::distinct_symbols(assets.iter().copied()).join(", "));

    Ok(())
}
