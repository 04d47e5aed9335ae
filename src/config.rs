//! Application configuration.
//!
//! Values are layered: built-in defaults, then an optional `blogcrate.toml`
//! (or any format the `config` crate recognises under that base name) in the
//! working directory, then `BLOGCRATE_*` environment variables, e.g.
//! `BLOGCRATE_DATABASE_URL=postgres://localhost/blog`.

use ::config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "blogcrate";
pub const ENV_PREFIX: &str = "BLOGCRATE";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
    /// Used in alert header names, e.g. `X-blogApp-alert`.
    pub application_name: String,
    pub default_page_size: u64,
    pub max_page_size: u64,
    /// Filter directive used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Create missing tables on start-up.
    pub bootstrap_schema: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            bind_address: "0.0.0.0:8080".to_string(),
            application_name: "blogApp".to_string(),
            default_page_size: 20,
            max_page_size: 1000,
            log_level: "info".to_string(),
            bootstrap_schema: true,
        }
    }
}

impl AppConfig {
    /// Load from defaults, `blogcrate.*` and `BLOGCRATE_*` variables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a source cannot be read or a value has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Environment::with_prefix(ENV_PREFIX))
    }

    /// Load with an explicit environment source.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a source cannot be read or a value has the wrong type.
    pub fn load_from(environment: Environment) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let defaults = Self::default();
        Config::builder()
            .set_default("database_url", defaults.database_url)?
            .set_default("bind_address", defaults.bind_address)?
            .set_default("application_name", defaults.application_name)?
            .set_default("default_page_size", i64::try_from(defaults.default_page_size).unwrap_or(20))?
            .set_default("max_page_size", i64::try_from(defaults.max_page_size).unwrap_or(1000))?
            .set_default("log_level", defaults.log_level)?
            .set_default("bootstrap_schema", defaults.bootstrap_schema)
    }
}
