//! HTTP server configuration.

use serde::{Deserialize, Serialize};

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8888
}

const fn default_concurrency() -> usize {
    8
}

const MAX_CONCURRENCY: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Concurrent object-store requests per batch.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            concurrency: default_concurrency(),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `concurrency` clamped to `1..=32`.
    #[must_use]
    pub fn fanout(&self) -> usize {
        self.concurrency.clamp(1, MAX_CONCURRENCY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8888");
        assert_eq!(config.fanout(), 8);
    }

    #[test]
    fn fanout_is_clamped() {
        let zero = ServerConfig {
            concurrency: 0,
            ..Default::default()
        };
        let huge = ServerConfig {
            concurrency: 500,
            ..Default::default()
        };
        assert_eq!(zero.fanout(), 1);
        assert_eq!(huge.fanout(), 32);
    }
}
