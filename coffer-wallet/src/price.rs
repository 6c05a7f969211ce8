//! Price conversion into the display currency.
//!
//! Prices come from an external feed as a read-only snapshot. Conversion is
//! pure and never fails: unknown symbols and missing amounts count as zero.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::asset::Asset;
use crate::error::Result;

/// Symbol -> unit price in the display currency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTable {
    prices: HashMap<String, f64>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object such as `{"BTC": 30000, "ETH": 2000}`
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn insert(&mut self, symbol: impl Into<String>, price: f64) {
        self.prices.insert(symbol.into(), price);
    }

    /// Price of `symbol`, when known and finite
    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.prices.get(symbol).copied().filter(|p| p.is_finite())
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for PriceTable {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        Self {
            prices: iter.into_iter().map(|(s, p)| (s.into(), p)).collect(),
        }
    }
}

/// Value of `amount` units of `symbol`
pub fn convert(symbol: &str, amount: Option<f64>, prices: &PriceTable) -> f64 {
    let amount = match amount {
        Some(amount) if amount.is_finite() => amount,
        _ => return 0.0,
    };

    match prices.get(symbol) {
        Some(price) => price * amount,
        None => 0.0,
    }
}

/// Summed value of every asset balance
pub fn portfolio_value<'a, I>(assets: I, prices: &PriceTable) -> f64
where
    I: IntoIterator<Item = &'a Asset>,
{
    assets
        .into_iter()
        .map(|asset| convert(asset.symbol(), Some(asset.balance()), prices))
        .sum()
}
