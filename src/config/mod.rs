//! Layered configuration loading for the `eion-server` binary.
//!
//! Settings are read from an optional TOML file and overlaid with
//! `EION_`-prefixed environment variables (`EION_POSTGRES__HOST`, etc.),
//! following `mylm-core`'s `config`-crate-based layering convention. The
//! resulting [`AppConfig`] carries exactly the sections `spec.md` §6 lists
//! as recognized options, plus an `extractor` section the wire contract
//! needs but the section list omits (how else would the server know which
//! subprocess to invoke).

mod settings;

pub use settings::{
    AppConfig, AuthConfig, EmbeddingProvider, EmbeddingSettings, ExtractorSettings, GraphSettings,
    HttpSettings, LogFormat, LogLevel, LoggerSettings, PostgresSettings,
};

use std::path::Path;

use config::{Config, ConfigError as RawConfigError, Environment, File};
use thiserror::Error;

/// Errors that can occur while assembling [`AppConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The underlying `config` crate failed to load or deserialize a source.
    #[error("configuration error: {0}")]
    Load(#[from] RawConfigError),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

impl AppConfig {
    /// Loads configuration from `path` (if it exists) overlaid with
    /// `EION_`-prefixed environment variables.
    ///
    /// A double underscore separates section from key in the environment
    /// form, e.g. `EION_POSTGRES__MAX_OPEN_CONNECTIONS=20` sets
    /// `postgres.max_open_connections`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if the file is malformed or a value
    /// fails to deserialize into [`AppConfig`]'s shape.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let raw = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("EION").separator("__"))
            .build()?;
        Ok(raw.try_deserialize()?)
    }
}
