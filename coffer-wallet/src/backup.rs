//! Backup export and persistence
//!
//! A backup is a point-in-time JSON snapshot of the registry. Only the
//! persisted form of each asset is written, so fetch state and summaries
//! never reach disk.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::asset::Asset;
use crate::error::{Result, WalletError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    /// Milliseconds since the Unix epoch
    pub date: i64,

    pub network: String,

    /// `major.minor` of the crate that wrote the backup
    #[serde(rename = "v")]
    pub schema_version: String,

    /// Assets keyed by id, in registration order
    #[serde(default)]
    pub assets: IndexMap<String, Asset>,

    /// Opaque user data, passed through untouched
    #[serde(default)]
    pub customs: Map<String, Value>,
}

/// Two-component crate version written into new backups
pub fn schema_version() -> String {
    let mut parts = env!("CARGO_PKG_VERSION").split('.');
    let major = parts.next().unwrap_or("0");
    let minor = parts.next().unwrap_or("0");
    format!("{}.{}", major, minor)
}

fn major(version: &str) -> &str {
    version.split('.').next().unwrap_or("")
}

impl Backup {
    /// Write the backup as pretty JSON, readable only by the owner
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;

        // Create with restrictive permissions on Unix
        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)?;
            // An existing file keeps its mode on open
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
            file.write_all(json.as_bytes())?;
        }

        #[cfg(not(unix))]
        {
            fs::write(path, json)?;
        }

        tracing::debug!(path = %path.display(), assets = self.assets.len(), "backup saved");
        Ok(())
    }

    /// Load a backup written by a compatible version
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let backup: Backup = serde_json::from_str(&contents)?;

        let current = schema_version();
        if major(&backup.schema_version) != major(&current) {
            return Err(WalletError::UnsupportedBackupVersion(backup.schema_version));
        }

        tracing::debug!(path = %path.display(), assets = backup.assets.len(), "backup loaded");
        Ok(backup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{Secret, SeedRecord};
    use crate::builder::{build_backup_at, PartialBackup};
    use serde_json::json;
    use tempfile::tempdir;

    fn sample() -> Backup {
        let mut asset = Asset::new(
            "BTC",
            vec!["1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2".to_string()],
            Secret::Seed(SeedRecord {
                ciphertext: "v1$64,1,1$salt$00$00".to_string(),
                hash: "ab".repeat(32),
            }),
        )
        .unwrap();
        asset.set_id("BTC-1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2".to_string());
        asset.summary_mut().insert("txs".to_string(), json!(9));

        let mut assets = IndexMap::new();
        assets.insert(asset.id().to_string(), asset);

        build_backup_at(
            PartialBackup {
                assets: Some(assets),
                ..Default::default()
            },
            "bitcoin",
            1_700_000_000_000,
        )
    }

    #[test]
    fn test_schema_version_is_two_components() {
        let version = schema_version();
        assert_eq!(version.split('.').count(), 2);
        assert!(env!("CARGO_PKG_VERSION").starts_with(&version));
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["date"], json!(1_700_000_000_000i64));
        assert_eq!(value["network"], json!("bitcoin"));
        assert_eq!(value["v"], json!(schema_version()));
        assert!(value["customs"].as_object().unwrap().is_empty());

        let asset = &value["assets"]["BTC-1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2"];
        assert_eq!(asset["symbol"], json!("BTC"));
        assert!(asset.get("summary").is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("backup.json");

        let backup = sample();
        backup.save(&path).unwrap();
        let loaded = Backup::load(&path).unwrap();

        assert_eq!(loaded.date, backup.date);
        assert_eq!(loaded.assets.len(), 1);
        let asset = loaded.assets.values().next().unwrap();
        assert_eq!(asset.seed_hash(), Some("ab".repeat(32).as_str()));
        // Transient summary was not persisted
        assert!(asset.summary().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_save_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("backup.json");
        sample().save(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_tightens_existing_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("backup.json");
        fs::write(&path, "stale contents that are longer than nothing").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        sample().save(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(Backup::load(&path).is_ok());
    }

    #[test]
    fn test_save_and_load_keeps_asset_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("backup.json");

        let mut assets = IndexMap::new();
        for (symbol, address) in [("ETH", "z"), ("BTC", "y"), ("BTC", "a")] {
            let mut asset = Asset::new(symbol, vec![address.to_string()], Secret::None).unwrap();
            asset.set_id(format!("{}-{}", symbol, address));
            assets.insert(asset.id().to_string(), asset);
        }
        let backup = build_backup_at(
            PartialBackup {
                assets: Some(assets),
                ..Default::default()
            },
            "bitcoin",
            0,
        );
        backup.save(&path).unwrap();

        let loaded = Backup::load(&path).unwrap();
        let ids: Vec<&str> = loaded.assets.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["ETH-z", "BTC-y", "BTC-a"]);
    }

    #[test]
    fn test_load_rejects_other_major() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("backup.json");

        let mut backup = sample();
        backup.schema_version = "99.0".to_string();
        backup.save(&path).unwrap();

        assert!(matches!(
            Backup::load(&path),
            Err(WalletError::UnsupportedBackupVersion(v)) if v == "99.0"
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            Backup::load(&dir.path().join("nope.json")),
            Err(WalletError::Io(_))
        ));
    }

    #[test]
    fn test_load_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("backup.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            Backup::load(&path),
            Err(WalletError::Serialization(_))
        ));
    }
}
