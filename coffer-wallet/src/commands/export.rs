//! Wallet export/backup command

use anyhow::Result;
use std::path::Path;

use super::{print_error, print_success, print_warning, prompt_confirm, Context};

/// Run the export command
pub fn run(ctx: &Context, output: &Path) -> Result<()> {
    let Some(mut backup) = ctx.load_backup()? else {
        print_error("No wallet found. Add an asset first.");
        return Ok(());
    };

    if output.exists() && !prompt_confirm("Output file exists. Overwrite?")? {
        println!("Aborted.");
        return Ok(());
    }

    backup.date = chrono::Utc::now().timestamp_millis();
    backup.save(output)?;

    println!();
    print_success(&format!(
        "Exported {} assets to: {}",
        backup.assets.len(),
        output.display()
    ));
    print_warning("Secrets stay encrypted, but keep this file private.");

    Ok(())
}
