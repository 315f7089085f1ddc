use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{Config, StockConfig};

/// Prefix of the environment variables that override file values,
/// e.g. `GBCE__EXCHANGE__DEFAULT_WINDOW_MINUTES=5`.
pub const ENV_PREFIX: &str = "GBCE";

/// Loads the exchange configuration from a TOML file.
///
/// Values from `GBCE__*` environment variables take precedence over the file.
/// The result is validated before it is returned.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let builder = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(path = %path.display(), stocks = config.stocks.len(), "Loaded configuration");
    Ok(config)
}
