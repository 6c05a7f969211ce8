//! Coffer Wallet CLI
//!
//! Track addresses, keys and seeds for several currencies from one wallet file.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coffer_wallet::commands::{self, Context};
use coffer_wallet::config::WalletConfig;

#[derive(Parser)]
#[command(name = "coffer-wallet")]
#[command(about = "Coffer - multi-currency wallet with encrypted keys and seeds")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Custom wallet file path
    #[arg(short, long, global = true)]
    wallet: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new recovery phrase
    Mnemonic {
        /// Number of words (12 or 24)
        #[arg(long, default_value = "24")]
        words: usize,
    },

    /// Add an asset derived from a recovery phrase
    AddSeed {
        /// Currency symbol, e.g. BTC
        #[arg(short, long)]
        symbol: String,

        /// Number of addresses to derive
        #[arg(short = 'n', long, default_value = "1")]
        count: u32,

        /// Display label
        #[arg(short, long)]
        label: Option<String>,

        /// Reuse the seed of an existing asset (by id)
        #[arg(long)]
        reuse: Option<String>,
    },

    /// Add an asset from a private key, or a watch-only address
    AddKey {
        /// Currency symbol, e.g. ETH
        #[arg(short, long)]
        symbol: String,

        /// Track this address without a private key
        #[arg(long)]
        watch: Option<String>,

        /// Display label
        #[arg(short, long)]
        label: Option<String>,
    },

    /// List tracked assets
    List {
        /// Only show assets of this symbol
        #[arg(short, long)]
        symbol: Option<String>,
    },

    /// Show seeds that can back a new asset of a currency
    Reusable {
        /// Currency symbol the seed would be used for
        symbol: String,
    },

    /// Decrypt and display the private key of an asset
    Reveal {
        /// Asset id, as shown by `list`
        asset_id: String,
    },

    /// Value every asset with a price table
    Value {
        /// JSON object of unit prices, e.g. {"BTC": 30000}
        #[arg(short, long)]
        prices: PathBuf,
    },

    /// Export the wallet backup
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let mut config = match &cli.config {
        Some(path) => WalletConfig::from_file(path)?,
        None => WalletConfig::default(),
    };
    if let Some(wallet) = cli.wallet {
        config.wallet_path = wallet;
    }

    let ctx = Context::new(config);

    match cli.command {
        Commands::Mnemonic { words } => commands::mnemonic::run(words),
        Commands::AddSeed {
            symbol,
            count,
            label,
            reuse,
        } => commands::add_seed::run(&ctx, &symbol, count, label, reuse),
        Commands::AddKey {
            symbol,
            watch,
            label,
        } => commands::add_key::run(&ctx, &symbol, watch, label),
        Commands::List { symbol } => commands::list::run(&ctx, symbol),
        Commands::Reusable { symbol } => commands::reusable::run(&ctx, &symbol),
        Commands::Reveal { asset_id } => commands::reveal::run(&ctx, &asset_id),
        Commands::Value { prices } => commands::value::run(&ctx, &prices),
        Commands::Export { output } => commands::export::run(&ctx, &output),
    }
}
