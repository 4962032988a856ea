//! Market data provider configuration.
//!
//! Supported sources:
//! - Mock (seeded in-memory series, for demos and tests)
//! - Alpaca (stock daily bars over HTTP)
//! - Csv (one `{TICKER}.csv` file per ticker on local disk)

use super::{parse_or, string_or};
use anyhow::Result;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketDataMode {
    Mock,
    Alpaca,
    Csv,
}

impl FromStr for MarketDataMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(MarketDataMode::Mock),
            "alpaca" => Ok(MarketDataMode::Alpaca),
            "csv" => Ok(MarketDataMode::Csv),
            _ => anyhow::bail!(
                "Invalid MARKET_DATA_MODE: {}. Must be 'mock', 'alpaca', or 'csv'",
                s
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MarketDataEnvConfig {
    pub mode: MarketDataMode,
    pub alpaca_api_key: String,
    pub alpaca_secret_key: String,
    pub alpaca_data_url: String,
    pub alpaca_feed: String,
    pub csv_dir: PathBuf,
    /// Calendar days of history requested per fetch. 400 days covers 200 trading sessions
    /// with room for holidays.
    pub lookback_days: i64,
    pub timeout_secs: u64,
}

impl MarketDataEnvConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookback_days: i64 = parse_or(lookup, "LOOKBACK_DAYS", 400)?;
        if lookback_days <= 0 {
            anyhow::bail!("LOOKBACK_DAYS must be positive, got {}", lookback_days);
        }

        Ok(Self {
            mode: parse_or(lookup, "MARKET_DATA_MODE", MarketDataMode::Mock)?,
            alpaca_api_key: string_or(lookup, "ALPACA_API_KEY", ""),
            alpaca_secret_key: string_or(lookup, "ALPACA_SECRET_KEY", ""),
            alpaca_data_url: string_or(lookup, "ALPACA_DATA_URL", "https://data.alpaca.markets"),
            alpaca_feed: string_or(lookup, "ALPACA_FEED", "iex"),
            csv_dir: PathBuf::from(string_or(lookup, "MARKET_DATA_CSV_DIR", "data/bars")),
            lookback_days,
            timeout_secs: parse_or(lookup, "MARKET_DATA_TIMEOUT_SECS", 30)?,
        })
    }

    pub fn lookback(&self) -> chrono::Duration {
        chrono::Duration::days(self.lookback_days)
    }
}
