use crate::registry::RegistrationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] configuration::error::ConfigError),

    #[error("Market error: {0}")]
    Market(#[from] market::MarketError),

    /// Displays as the combined per-user message, e.g.
    /// `User1: Captain must be from selected stocks; User3: ...`.
    #[error("{0}")]
    Registration(#[from] RegistrationError),
}
