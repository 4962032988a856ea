//! Gateway listener configuration.

use super::parse_or;
use anyhow::Result;

#[derive(Debug, Clone)]
pub struct ServerEnvConfig {
    pub bind_address: String,
    pub port: u16,
    /// Capacity of each session's outbound message queue.
    pub outbound_buffer: usize,
}

impl Default for ServerEnvConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 5000,
            outbound_buffer: 32,
        }
    }
}

impl ServerEnvConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            bind_address: lookup("GATEWAY_BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port: parse_or(lookup, "GATEWAY_PORT", defaults.port)?,
            outbound_buffer: parse_or(lookup, "GATEWAY_OUTBOUND_BUFFER", defaults.outbound_buffer)?
                .max(1),
        })
    }

    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
