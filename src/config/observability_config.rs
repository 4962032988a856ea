//! Observability configuration parsing from environment variables.
//!
//! This module handles loading monitoring and metrics configuration.

use super::parse_or;
use anyhow::Result;

/// Observability environment configuration
#[derive(Debug, Clone)]
pub struct ObservabilityEnvConfig {
    pub enabled: bool,
    pub interval_seconds: u64,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 60,
        }
    }
}

impl ObservabilityEnvConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            enabled: parse_or(lookup, "OBSERVABILITY_ENABLED", defaults.enabled)?,
            interval_seconds: parse_or(lookup, "OBSERVABILITY_INTERVAL", defaults.interval_seconds)?
                .max(1),
        })
    }
}
