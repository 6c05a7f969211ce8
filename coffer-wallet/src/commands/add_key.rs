//! Add a private-key or watch-only asset

use anyhow::Result;

use crate::builder::{build_default, PartialAsset};
use crate::keys::PrivateKey;
use crate::registry::is_valid_asset;

use super::{print_error, print_success, print_warning, prompt_confirm, prompt_new_password, prompt_password, Context};

/// Run the add-key command
pub fn run(ctx: &Context, symbol: &str, watch: Option<String>, label: Option<String>) -> Result<()> {
    let coin = ctx.coins.get(symbol)?;
    let mut registry = ctx.load_registry()?;

    let partial = match watch {
        Some(address) => PartialAsset {
            symbol: Some(symbol.to_string()),
            address: Some(address),
            label,
            ..Default::default()
        },
        None => {
            let input = prompt_password("Enter private key (hex): ")?;
            let key = PrivateKey::from_hex(&input)?;
            let address = coin.address_for_key(&key);

            println!();
            println!("Address: {}", address);
            let password = prompt_new_password()?;

            PartialAsset {
                symbol: Some(symbol.to_string()),
                address: Some(address),
                label,
                private_key: Some(coin.encrypt_private_key(&key, &password)?),
                ..Default::default()
            }
        }
    };

    let asset = build_default(partial)?;
    if !is_valid_asset(&asset, &ctx.coins) {
        print_error(&format!("{} is not a valid {} address", asset.address(), symbol));
        return Ok(());
    }

    if let Some(existing) =
        registry.find_by_symbol_and_address_with(symbol, asset.address(), &ctx.coins)
    {
        print_warning(&format!("Address already tracked as {}", existing));
        if !prompt_confirm("Add it again?")? {
            println!("Aborted.");
            return Ok(());
        }
    }

    let id = registry.register(asset)?;
    ctx.save_registry(&registry)?;

    println!();
    print_success(&format!("Added {}", id));

    Ok(())
}
