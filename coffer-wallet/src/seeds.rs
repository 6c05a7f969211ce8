//! Seed reuse detection
//!
//! Groups assets by the fingerprint of the seed they were created from, so a
//! seed already backing one currency can be offered for another, and so a
//! second asset of the same currency from the same seed can be flagged.
//!
//! Everything here reads assets and mutates nothing. Groups are recomputed on
//! every call.

use std::collections::HashMap;

use crate::asset::Asset;

/// Assets created from one seed, in input order
#[derive(Debug, Clone)]
pub struct SeedGroup<'a> {
    pub hash: &'a str,
    pub assets: Vec<&'a Asset>,
}

impl<'a> SeedGroup<'a> {
    pub fn asset_ids(&self) -> Vec<&'a str> {
        self.assets.iter().map(|asset| asset.id()).collect()
    }

    pub fn contains_symbol(&self, symbol: &str) -> bool {
        self.assets.iter().any(|asset| asset.symbol() == symbol)
    }
}

/// Group seed-backed assets by seed hash, groups in first-appearance order
pub fn group_by_seed<'a, I>(assets: I) -> Vec<SeedGroup<'a>>
where
    I: IntoIterator<Item = &'a Asset>,
{
    let mut groups: Vec<SeedGroup<'a>> = Vec::new();
    let mut slots: HashMap<&'a str, usize> = HashMap::new();

    for asset in assets {
        let Some(hash) = asset.seed_hash() else {
            continue;
        };

        match slots.get(hash) {
            Some(&slot) => groups[slot].assets.push(asset),
            None => {
                slots.insert(hash, groups.len());
                groups.push(SeedGroup {
                    hash,
                    assets: vec![asset],
                });
            }
        }
    }

    groups
}

/// Seeds that could back a new `symbol` asset: groups with no `symbol` member
pub fn find_reusable_seeds_for<'a, I>(symbol: &str, assets: I) -> Vec<SeedGroup<'a>>
where
    I: IntoIterator<Item = &'a Asset>,
{
    group_by_seed(assets)
        .into_iter()
        .filter(|group| !group.contains_symbol(symbol))
        .collect()
}

/// Assets of `symbol` already created from the seed with `seed_hash`
pub fn find_seed_conflicts<'a, I>(symbol: &str, seed_hash: &str, assets: I) -> Vec<&'a Asset>
where
    I: IntoIterator<Item = &'a Asset>,
{
    let conflicts: Vec<&'a Asset> = assets
        .into_iter()
        .filter(|asset| asset.symbol() == symbol && asset.seed_hash() == Some(seed_hash))
        .collect();

    if !conflicts.is_empty() {
        tracing::warn!(
            symbol,
            existing = conflicts.len(),
            "seed already used for this currency"
        );
    }

    conflicts
}

/// Symbols of `assets` in first-seen order
pub fn distinct_symbols<'a, I>(assets: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a Asset>,
{
    let mut symbols: Vec<&'a str> = Vec::new();
    for asset in assets {
        if !symbols.contains(&asset.symbol()) {
            symbols.push(asset.symbol());
        }
    }
    symbols
}
