//! Mnemonic generation command

use anyhow::Result;

use crate::mnemonic::{generate_mnemonic, WordCount};

use super::print_warning;

/// Run the mnemonic command
pub fn run(words: usize) -> Result<()> {
    let count = WordCount::try_from(words)?;
    let phrase = generate_mnemonic(count)?;

    println!();
    println!("Your recovery phrase ({} words):", count.words());
    println!();

    // Display in 4 columns
    for (i, word) in phrase.split_whitespace().enumerate() {
        print!("{:>2}. {:<12}", i + 1, word);
        if (i + 1) % 4 == 0 {
            println!();
        }
    }
    println!();

    println!();
    print_warning("Write down your recovery phrase and store it safely!");
    print_warning("Anyone with this phrase can access your funds.");

    Ok(())
}
