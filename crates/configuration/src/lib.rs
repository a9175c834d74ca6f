use crate::error::ConfigError;

// Declare the modules that make up this crate.
#[cfg(feature = "clap")]
pub mod cli;
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    GameConfig, GameSettings, MarketSettings, ScoringSettings, SimulationSettings, StockListing,
};

/// Prefix of environment variables that override file settings,
/// e.g. `LEAGUE__SIMULATION__INTERVAL_SECS=5`.
const ENV_PREFIX: &str = "LEAGUE";

/// Loads the application configuration from the `config.toml` file.
///
/// The file is optional; missing sections fall back to their defaults. Environment
/// variables are layered on top, then the result is validated.
pub fn load_config() -> Result<GameConfig, ConfigError> {
    load_config_from("config.toml")
}

/// Same as [`load_config`] but reading an explicit file path.
pub fn load_config_from(path: &str) -> Result<GameConfig, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    finish(builder)
}

/// Parses configuration from an in-memory TOML document. No environment overrides apply.
pub fn parse_config(toml: &str) -> Result<GameConfig, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    finish(builder)
}

fn finish(builder: config::Config) -> Result<GameConfig, ConfigError> {
    // Attempt to deserialize the entire configuration into our `GameConfig` struct
    let config = builder.try_deserialize::<GameConfig>()?;
    config.validate()?;

    tracing::debug!(
        stocks = config.market.stocks.len(),
        interval_secs = config.simulation.interval_secs,
        "Configuration loaded."
    );
    Ok(config)
}
