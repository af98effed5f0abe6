//! # guest-config
//!
//! Layered configuration loading for the guest list services using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`WEDDING_*` prefix, `__` as separator)
//! 2. `wedding.toml` in the working directory
//! 3. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! `WEDDING_S3__BUCKET` -> `s3.bucket`, `WEDDING_SERVER__PORT` -> `server.port`,
//! `WEDDING_GUEST_LIST__PASSWORD` -> `guest_list.password`.
//!
//! # Usage
//!
//! ```no_run
//! use guest_config::GuestConfig;
//!
//! let config = GuestConfig::load_with_dotenv().expect("config");
//! config.warn_missing();
//! println!("bucket: {}", config.s3.bucket);
//! ```

mod error;
mod guest_list;
mod s3;
mod server;

pub use error::ConfigError;
pub use guest_list::GuestListConfig;
pub use s3::S3Config;
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-local config file name.
pub const CONFIG_FILE: &str = "wedding.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GuestConfig {
    #[serde(default)]
    pub s3: S3Config,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub guest_list: GuestListConfig,
}

impl GuestConfig {
    /// Load configuration from `wedding.toml` and environment variables.
    ///
    /// Does NOT read `.env`; use [`Self::load_with_dotenv`] for that.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load `.env` from the working directory, then [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Load with an explicit config file instead of `wedding.toml`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::figment_with_file(path)
            .extract()
            .map_err(ConfigError::from)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer extra providers.
    pub fn figment() -> Figment {
        Self::figment_with_file(&PathBuf::from(CONFIG_FILE))
    }

    fn figment_with_file(path: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if path.exists() {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed("WEDDING_").split("__"))
    }

    /// Log one warning per unset required variable.
    ///
    /// Missing values are not fatal at startup; a missing bucket surfaces as
    /// a 500 on each guest list request.
    pub fn warn_missing(&self) {
        for name in self.missing_variables() {
            tracing::warn!(variable = name, "missing environment variable");
        }
    }

    /// Names of unset required variables across all sections.
    #[must_use]
    pub fn missing_variables(&self) -> Vec<&'static str> {
        let mut missing = self.s3.missing_fields();
        if !self.guest_list.is_configured() {
            missing.push("WEDDING_GUEST_LIST__PASSWORD");
        }
        missing
    }

    /// Fail unless a bucket is configured.
    pub fn require_bucket(&self) -> Result<&S3Config, ConfigError> {
        if self.s3.has_bucket() {
            Ok(&self.s3)
        } else {
            Err(ConfigError::NotConfigured {
                section: "s3".into(),
                missing: "WEDDING_S3__BUCKET".into(),
            })
        }
    }
}
