//! Integration tests for coffer-wallet
//!
//! These tests exercise the wallet end to end:
//! - Seed and private-key assets (create, register, back up, restore, decrypt)
//! - Seed reuse detection across currencies
//! - Error handling for wrong passwords and unknown currencies
//! - Portfolio valuation

use coffer_wallet::{
    build_default, cipher::KdfParams, convert, derive_root_key, find_reusable_seeds_for,
    find_seed_conflicts, generate_mnemonic, mnemonic::seed_fingerprint, portfolio_value,
    validate_mnemonic, AdapterSettings, AssetRegistry, Backup, CoinRegistry, Network,
    PartialAsset, PriceTable, PrivateKey, WalletError, WordCount,
};
use tempfile::TempDir;

// Standard BIP39 test vector (12 words, zero entropy)
const TEST_MNEMONIC: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
// Second valid vector (12 words, 0x7f entropy)
const OTHER_MNEMONIC: &str =
    "legal winner thank year wave sausage worth useful legal winner thank yellow";
const TEST_PASSWORD: &str = "secure-test-password-123!";

fn coins() -> CoinRegistry {
    CoinRegistry::with_defaults(AdapterSettings {
        network: Network::Bitcoin,
        seed_search_window: 10,
        kdf: KdfParams::new(64, 1, 1),
    })
}

/// Register a seed asset of `symbol` with the first `count` addresses
fn add_seed_asset(
    registry: &mut AssetRegistry,
    coins: &CoinRegistry,
    symbol: &str,
    mnemonic: &str,
    count: u32,
) -> String {
    let coin = coins.get(symbol).unwrap();
    let root = derive_root_key(mnemonic, "", "bitcoin").unwrap();
    let addresses = (0..count)
        .map(|i| coin.derive_key_from_root(&root, i).unwrap().address)
        .collect();

    let asset = build_default(PartialAsset {
        symbol: Some(symbol.to_string()),
        addresses: Some(addresses),
        seed: Some(coin.encrypt_seed(mnemonic, TEST_PASSWORD).unwrap()),
        ..Default::default()
    })
    .unwrap();
    registry.register(asset).unwrap()
}

// ============================================================================
// Wallet Lifecycle Tests
// ============================================================================

mod wallet_lifecycle {
    use super::*;

    #[test]
    fn test_full_seed_lifecycle() {
        let temp_dir = TempDir::new().unwrap();
        let wallet_path = temp_dir.path().join("backup.json");
        let coins = coins();

        // 1. Generate a new mnemonic
        let mnemonic = generate_mnemonic(WordCount::Twelve).unwrap();
        validate_mnemonic(&mnemonic).unwrap();

        // 2. Create and register a BTC asset with three addresses
        let mut registry = AssetRegistry::new();
        let id = add_seed_asset(&mut registry, &coins, "BTC", &mnemonic, 3);

        // 3. Back up to disk and restore
        registry.export_backup("bitcoin").save(&wallet_path).unwrap();
        let restored = AssetRegistry::from_backup(&Backup::load(&wallet_path).unwrap()).unwrap();
        assert_eq!(restored.len(), 1);

        // 4. Decrypt the primary key from the restored registry
        let key = restored.decrypt(&id, TEST_PASSWORD, &coins).unwrap();
        let btc = coins.get("BTC").unwrap();
        assert_eq!(
            btc.address_for_key(&key),
            restored.lookup(&id).unwrap().address()
        );
    }

    #[test]
    fn test_private_key_lifecycle() {
        let coins = coins();
        let eth = coins.get("ETH").unwrap();

        let key = PrivateKey::from_hex(
            "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318",
        )
        .unwrap();
        let address = eth.address_for_key(&key);
        assert!(eth.is_valid_address(&address));

        let asset = build_default(PartialAsset {
            symbol: Some("ETH".to_string()),
            address: Some(address.clone()),
            private_key: Some(eth.encrypt_private_key(&key, TEST_PASSWORD).unwrap()),
            ..Default::default()
        })
        .unwrap();

        let mut registry = AssetRegistry::new();
        let id = registry.register(asset).unwrap();
        assert_eq!(id, format!("ETH-{}", address));
        assert!(registry.has_private_key(&id));

        let decrypted = registry.decrypt(&id, TEST_PASSWORD, &coins).unwrap();
        assert_eq!(decrypted.as_bytes(), key.as_bytes());
    }

    #[test]
    fn test_watch_only_asset_cannot_decrypt() {
        let coins = coins();
        let mut registry = AssetRegistry::new();
        let id = registry
            .register(
                build_default(PartialAsset {
                    symbol: Some("BTC".to_string()),
                    address: Some("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2".to_string()),
                    ..Default::default()
                })
                .unwrap(),
            )
            .unwrap();

        assert!(coffer_wallet::is_valid_asset(registry.lookup(&id).unwrap(), &coins));
        assert!(matches!(
            registry.decrypt(&id, TEST_PASSWORD, &coins),
            Err(WalletError::InvalidAsset(_))
        ));
    }
}

// ============================================================================
// Seed Reuse Tests
// ============================================================================

mod seed_reuse {
    use super::*;

    #[test]
    fn test_reusable_seeds_across_currencies() {
        let coins = coins();
        let mut registry = AssetRegistry::new();

        let btc_a = add_seed_asset(&mut registry, &coins, "BTC", TEST_MNEMONIC, 1);
        let eth_b = add_seed_asset(&mut registry, &coins, "ETH", OTHER_MNEMONIC, 1);

        // Seed A backs BTC only, so it can be reused for ETH
        let for_eth = find_reusable_seeds_for("ETH", registry.list_all());
        assert_eq!(for_eth.len(), 1);
        assert_eq!(for_eth[0].asset_ids(), vec![btc_a.as_str()]);

        let for_btc = find_reusable_seeds_for("BTC", registry.list_all());
        assert_eq!(for_btc.len(), 1);
        assert_eq!(for_btc[0].asset_ids(), vec![eth_b.as_str()]);

        // Reuse seed A for ETH: now neither seed is reusable for ETH
        add_seed_asset(&mut registry, &coins, "ETH", TEST_MNEMONIC, 1);
        assert!(find_reusable_seeds_for("ETH", registry.list_all()).is_empty());
        assert_eq!(find_reusable_seeds_for("LTC", registry.list_all()).len(), 2);
    }

    #[test]
    fn test_duplicate_seed_detection() {
        let coins = coins();
        let mut registry = AssetRegistry::new();
        let id = add_seed_asset(&mut registry, &coins, "BTC", TEST_MNEMONIC, 1);

        assert!(registry.is_registered_by_seed("BTC", TEST_MNEMONIC));
        assert!(!registry.is_registered_by_seed("BTC", OTHER_MNEMONIC));

        let conflicts = find_seed_conflicts(
            "BTC",
            &seed_fingerprint(TEST_MNEMONIC),
            registry.list_all(),
        );
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].id(), id);
    }

    #[test]
    fn test_seed_reused_asset_decrypts_with_same_password() {
        let coins = coins();
        let mut registry = AssetRegistry::new();
        let btc = add_seed_asset(&mut registry, &coins, "BTC", TEST_MNEMONIC, 1);

        // Recover the phrase from the BTC asset and create an ETH asset from it
        let seed = registry.lookup(&btc).unwrap().seed().unwrap().clone();
        let phrase = coins
            .get("BTC")
            .unwrap()
            .decrypt_seed(&seed, TEST_PASSWORD)
            .unwrap();
        let eth = add_seed_asset(&mut registry, &coins, "ETH", &phrase, 2);

        let key = registry.decrypt(&eth, TEST_PASSWORD, &coins).unwrap();
        assert_eq!(
            coins.get("ETH").unwrap().address_for_key(&key),
            "0x9858EfFD232B4033E47d90003D41EC34EcaEda94"
        );
    }
}

// ============================================================================
// Error Handling Tests
// ============================================================================

mod error_handling {
    use super::*;

    #[test]
    fn test_wrong_password_on_seed_asset() {
        let coins = coins();
        let mut registry = AssetRegistry::new();
        let id = add_seed_asset(&mut registry, &coins, "ETH", TEST_MNEMONIC, 2);

        assert!(matches!(
            registry.decrypt(&id, "wrong-password", &coins),
            Err(WalletError::WrongPassword)
        ));
    }

    #[test]
    fn test_unknown_currency() {
        let coins = coins();
        assert!(matches!(
            coins.get("XMR"),
            Err(WalletError::UnsupportedCurrency(_))
        ));
    }

    #[test]
    fn test_seed_window_is_honored() {
        // Addresses derived with a wide window cannot be found with a narrow one
        let wide = coins();
        let narrow = CoinRegistry::with_defaults(AdapterSettings {
            network: Network::Bitcoin,
            seed_search_window: 1,
            kdf: KdfParams::new(64, 1, 1),
        });

        let mut registry = AssetRegistry::new();
        let id = add_seed_asset(&mut registry, &wide, "BTC", TEST_MNEMONIC, 2);

        assert!(registry.decrypt(&id, TEST_PASSWORD, &wide).is_ok());
        assert!(matches!(
            registry.decrypt(&id, TEST_PASSWORD, &narrow),
            Err(WalletError::AddressNotDerived { window: 1, .. })
        ));
    }

    #[test]
    fn test_restore_rejects_tampered_backup() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("backup.json");

        std::fs::write(
            &path,
            r#"{
                "date": 0,
                "network": "bitcoin",
                "v": "0.1",
                "assets": { "BTC-x": { "id": "BTC-x", "symbol": "BTC", "addresses": [] } },
                "customs": {}
            }"#,
        )
        .unwrap();

        assert!(matches!(
            Backup::load(&path),
            Err(WalletError::Serialization(_))
        ));
    }
}

// ============================================================================
// Valuation Tests
// ============================================================================

mod valuation {
    use super::*;

    #[test]
    fn test_portfolio_value_of_registry() {
        let mut registry = AssetRegistry::new();
        for (symbol, address, balance) in [("BTC", "a", 2.0), ("ETH", "b", 10.0), ("DOGE", "c", 5.0)] {
            let id = registry
                .register(
                    build_default(PartialAsset {
                        symbol: Some(symbol.to_string()),
                        address: Some(address.to_string()),
                        balance: Some(balance),
                        ..Default::default()
                    })
                    .unwrap(),
                )
                .unwrap();
            assert_eq!(registry.lookup(&id).unwrap().balance(), balance);
        }

        let prices = PriceTable::from_json(r#"{"BTC": 30000, "ETH": 2000}"#).unwrap();
        assert_eq!(convert("BTC", Some(2.0), &prices), 60000.0);
        assert_eq!(convert("DOGE", Some(5.0), &prices), 0.0);
        assert_eq!(portfolio_value(registry.list_all(), &prices), 80000.0);
    }
}
