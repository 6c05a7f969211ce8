//! Private key reveal command

use anyhow::Result;

use super::{print_error, print_warning, prompt_confirm, prompt_password, Context};

/// Run the reveal command
pub fn run(ctx: &Context, asset_id: &str) -> Result<()> {
    let registry = ctx.load_registry()?;

    if !registry.contains(asset_id) {
        print_error(&format!("No asset with id {}", asset_id));
        return Ok(());
    }
    if !registry.has_secret(asset_id) {
        print_error("This asset is watch-only and has no private key.");
        return Ok(());
    }

    print_warning("The private key gives full control over the funds of this address.");
    if !prompt_confirm("Display it on screen?")? {
        println!("Aborted.");
        return Ok(());
    }

    let password = prompt_password("Enter password: ")?;
    let key = registry.decrypt(asset_id, &password, &ctx.coins)?;
    let hex = key.to_hex();

    println!();
    if let Some(name) = registry.label_or_address(asset_id) {
        println!("{}", name);
    }
    println!("  {}", hex.as_str());

    Ok(())
}
