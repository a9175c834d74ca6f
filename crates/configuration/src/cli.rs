//! Command-line overrides for the configuration, enabled with the `clap` feature.

use crate::settings::GameConfig;
use rust_decimal::Decimal;

/// Flags that take precedence over `config.toml` and the environment.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigOverrides {
    /// Path to the configuration file.
    #[arg(long, default_value = "config.toml")]
    pub config: String,

    /// Seconds between two simulated price ticks.
    #[arg(long)]
    pub tick_secs: Option<u64>,

    /// Maximum price move per tick as a fraction (0.02 = ±2%).
    #[arg(long)]
    pub max_move: Option<Decimal>,

    /// Seed for the price simulator's random generator.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl ConfigOverrides {
    /// Writes every flag that was given into `config`. Call `validate` afterwards.
    pub fn apply(&self, config: &mut GameConfig) {
        if let Some(secs) = self.tick_secs {
            config.simulation.interval_secs = secs;
        }
        if let Some(max_move) = self.max_move {
            config.simulation.max_move_pct = max_move;
        }
        if self.seed.is_some() {
            config.simulation.seed = self.seed;
        }
    }
}
