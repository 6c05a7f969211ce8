//! Portfolio valuation command

use anyhow::Result;
use std::path::Path;

use crate::price::{convert, portfolio_value, PriceTable};

use super::{print_warning, Context};

/// Run the value command
pub fn run(ctx: &Context, prices: &Path) -> Result<()> {
    let table = PriceTable::from_file(prices)?;
    let registry = ctx.load_registry()?;

    println!();
    for asset in registry.list_all() {
        if table.get(asset.symbol()).is_none() {
            print_warning(&format!("No price for {}", asset.symbol()));
        }
        println!(
            "{:<6} {:>16.8}  {:>14.2}  {}",
            asset.symbol(),
            asset.balance(),
            convert(asset.symbol(), Some(asset.balance()), &table),
            asset.label_or_address()
        );
    }

    println!("{}", "-".repeat(72));
    println!("Total: {:.2}", portfolio_value(registry.list_all(), &table));

    Ok(())
}
