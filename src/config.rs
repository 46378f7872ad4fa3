//! Pool and session settings, loadable from TOML

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SwapConfig {
    /// Name of the liquidity share token
    pub share_name: String,
    /// Ticker of the liquidity share token
    pub share_symbol: String,
    pub share_decimals: u8,
    /// Amount of each pool token a session mints for an unfunded account
    pub faucet_amount: u64,
    /// Allowance a session grants the pool when funding an account
    pub approve_amount: u64,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            share_name: "SimpleSwap Liquidity".to_string(),
            share_symbol: "SSLP".to_string(),
            share_decimals: 18,
            faucet_amount: 100_000_000,
            approve_amount: 100_000_000,
        }
    }
}

impl SwapConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).context("Failed to parse swap config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&data)
            .with_context(|| format!("Invalid config in: {}", path.display()))
    }
}
