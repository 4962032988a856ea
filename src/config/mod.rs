//! Configuration module for Marketlens.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Server, Market Data, Models, and Observability.

mod market_data_config;
mod model_config;
mod observability_config;
mod server_config;

pub use market_data_config::{MarketDataEnvConfig, MarketDataMode};
pub use model_config::ModelEnvConfig;
pub use observability_config::ObservabilityEnvConfig;
pub use server_config::ServerEnvConfig;

use anyhow::{Context, Result};
use std::env;
use std::fmt::Display;
use std::str::FromStr;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerEnvConfig,
    pub market_data: MarketDataEnvConfig,
    pub models: ModelEnvConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            server: ServerEnvConfig::from_lookup(&lookup).context("Failed to load server config")?,
            market_data: MarketDataEnvConfig::from_lookup(&lookup)
                .context("Failed to load market data config")?,
            models: ModelEnvConfig::from_lookup(&lookup).context("Failed to load model config")?,
            observability: ObservabilityEnvConfig::from_lookup(&lookup)
                .context("Failed to load observability config")?,
        })
    }
}

/// Reads `key` through `lookup` and parses it, falling back to `default` when unset.
pub(crate) fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}={:?}: {}", key, raw, e)),
        None => Ok(default),
    }
}

pub(crate) fn string_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}
