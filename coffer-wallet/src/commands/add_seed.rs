//! Add a seed-backed asset

use anyhow::{anyhow, bail, Result};

use crate::builder::{build_default, PartialAsset};
use crate::mnemonic::{root_key_from_mnemonic, seed_fingerprint, validate_mnemonic};
use crate::seeds::find_seed_conflicts;

use super::{print_success, print_warning, prompt_confirm, prompt_new_password, prompt_password, Context};

/// Run the add-seed command
pub fn run(
    ctx: &Context,
    symbol: &str,
    count: u32,
    label: Option<String>,
    reuse: Option<String>,
) -> Result<()> {
    let coin = ctx.coins.get(symbol)?;

    let window = ctx.config.seed_search_window;
    if count == 0 || count > window {
        bail!("address count must be between 1 and {} (the seed search window)", window);
    }

    let mut registry = ctx.load_registry()?;

    let (mnemonic, password) = match reuse {
        Some(source_id) => {
            let source = registry
                .lookup(&source_id)
                .ok_or_else(|| anyhow!("no asset with id {}", source_id))?;
            let seed = source
                .seed()
                .ok_or_else(|| anyhow!("asset {} was not created from a seed", source_id))?;

            let password = prompt_password("Enter password of the existing seed: ")?;
            let mnemonic = ctx.coins.get(source.symbol())?.decrypt_seed(seed, &password)?;
            (mnemonic, password)
        }
        None => {
            let mnemonic = prompt_password("Enter recovery phrase: ")?;
            validate_mnemonic(&mnemonic)?;
            println!();
            let password = prompt_new_password()?;
            (mnemonic, password)
        }
    };

    let hash = seed_fingerprint(&mnemonic);
    let conflicts = find_seed_conflicts(symbol, &hash, registry.list_all());
    if !conflicts.is_empty() {
        for asset in &conflicts {
            print_warning(&format!(
                "This seed already backs {} asset {}",
                symbol,
                asset.label_or_address()
            ));
        }
        if !prompt_confirm("Add it again?")? {
            println!("Aborted.");
            return Ok(());
        }
    }

    let root = root_key_from_mnemonic(&mnemonic, "", ctx.config.network)?;
    let addresses = (0..count)
        .map(|index| Ok(coin.derive_key_from_root(&root, index)?.address))
        .collect::<Result<Vec<String>>>()?;

    let seed = coin.encrypt_seed(&mnemonic, &password)?;

    let asset = build_default(PartialAsset {
        symbol: Some(symbol.to_string()),
        addresses: Some(addresses),
        label,
        seed: Some(seed),
        ..Default::default()
    })?;
    let id = registry.register(asset)?;
    ctx.save_registry(&registry)?;

    println!();
    print_success(&format!("Added {}", id));
    if let Some(asset) = registry.lookup(&id) {
        for address in asset.addresses() {
            println!("  {}", address);
        }
    }

    Ok(())
}
