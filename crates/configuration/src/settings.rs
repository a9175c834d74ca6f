use crate::error::ConfigError;
use core_types::Symbol;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

/// The root configuration structure for the entire application.
///
/// Every section has defaults, so an empty `config.toml` (or none at all) yields the
/// classic nine-stock NSE game.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GameConfig {
    pub market: MarketSettings,
    pub simulation: SimulationSettings,
    pub scoring: ScoringSettings,
    pub game: GameSettings,
}

/// The fixed instrument universe of a session.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketSettings {
    /// Listed stocks in display order.
    pub stocks: Vec<StockListing>,
}

/// A single listed stock and its opening reference price.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StockListing {
    pub symbol: Symbol,
    pub opening_price: Decimal,
}

/// Parameters for the background price simulator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Seconds to wait between two ticks.
    pub interval_secs: u64,
    /// Bound of the symmetric uniform price move per tick, as a fraction.
    /// 0.02 means every tick moves each price by at most ±2%.
    pub max_move_pct: Decimal,
    /// Optional RNG seed for reproducible sessions.
    pub seed: Option<u64>,
}

/// Parameters for the scoring pass.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    pub captain_multiplier: Decimal,
    pub vice_captain_multiplier: Decimal,
    /// How many score-history entries are retained per user.
    pub history_len: usize,
}

/// Shape of a game: how many players and how many picks each.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub user_slots: usize,
    pub picks_per_user: usize,
}

// --- Default Implementations ---
// These mirror the constants the game was first played with.

impl Default for MarketSettings {
    fn default() -> Self {
        let listing = |symbol: &str, opening_price: Decimal| StockListing {
            symbol: Symbol::new(symbol).expect("static symbols are non-empty"),
            opening_price,
        };
        Self {
            stocks: vec![
                listing("RELIANCE", dec!(2800)),
                listing("TCS", dec!(3800)),
                listing("INFY", dec!(1450)),
                listing("HDFCBANK", dec!(1650)),
                listing("ICICIBANK", dec!(1100)),
                listing("ADANIENT", dec!(3000)),
                listing("HINDUNILVR", dec!(2550)),
                listing("MARUTI", dec!(11600)),
                listing("TITAN", dec!(3550)),
            ],
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            interval_secs: 3,
            max_move_pct: dec!(0.02),
            seed: None,
        }
    }
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            captain_multiplier: dec!(2.0),
            vice_captain_multiplier: dec!(1.5),
            history_len: 10,
        }
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            user_slots: 3,
            picks_per_user: 3,
        }
    }
}

impl SimulationSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl GameConfig {
    /// Checks the cross-field invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |msg: String| -> Result<(), ConfigError> { Err(ConfigError::ValidationError(msg)) };

        if self.market.stocks.is_empty() {
            return fail("market.stocks must list at least one stock".to_string());
        }
        let mut seen = HashSet::new();
        for stock in &self.market.stocks {
            if stock.opening_price <= Decimal::ZERO {
                return fail(format!(
                    "opening price of {} must be positive, got {}",
                    stock.symbol, stock.opening_price
                ));
            }
            if !seen.insert(&stock.symbol) {
                return fail(format!("stock {} is listed more than once", stock.symbol));
            }
        }

        if self.simulation.interval_secs == 0 {
            return fail("simulation.interval_secs must be greater than 0".to_string());
        }
        // A bound of 1 or more would allow a move of -100% and a zero price.
        if self.simulation.max_move_pct <= Decimal::ZERO || self.simulation.max_move_pct >= Decimal::ONE {
            return fail("simulation.max_move_pct must be between 0 and 1".to_string());
        }

        if self.scoring.captain_multiplier <= Decimal::ZERO
            || self.scoring.vice_captain_multiplier <= Decimal::ZERO
        {
            return fail("scoring multipliers must be positive".to_string());
        }
        if self.scoring.history_len == 0 {
            return fail("scoring.history_len must be at least 1".to_string());
        }

        if self.game.user_slots == 0 || self.game.picks_per_user == 0 {
            return fail("game.user_slots and game.picks_per_user must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::default();
        config.validate().unwrap();
        assert_eq!(config.market.stocks.len(), 9);
        assert_eq!(config.market.stocks[0].symbol.as_str(), "RELIANCE");
        assert_eq!(config.simulation.interval(), Duration::from_secs(3));
        assert_eq!(config.scoring.history_len, 10);
    }

    #[test]
    fn rejects_non_positive_opening_price() {
        let mut config = GameConfig::default();
        config.market.stocks[1].opening_price = Decimal::ZERO;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("TCS"));
    }

    #[test]
    fn rejects_duplicate_listing() {
        let mut config = GameConfig::default();
        let first = config.market.stocks[0].clone();
        config.market.stocks.push(first);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_degenerate_move_bound() {
        let mut config = GameConfig::default();
        config.simulation.max_move_pct = dec!(1);
        assert!(config.validate().is_err());
        config.simulation.max_move_pct = dec!(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_history() {
        let mut config = GameConfig::default();
        config.scoring.history_len = 0;
        assert!(config.validate().is_err());
    }
}
