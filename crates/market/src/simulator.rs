use crate::error::MarketError;
use crate::state::MarketState;
use configuration::SimulationSettings;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, MissedTickBehavior, interval};

/// Any shared state that embeds the session's market.
///
/// The simulator locks the whole host, so a tick is atomic with respect to everything
/// else guarded by the same lock (user picks, scores, reports).
pub trait MarketHost: Send + 'static {
    fn market_mut(&mut self) -> &mut MarketState;
}

impl MarketHost for MarketState {
    fn market_mut(&mut self) -> &mut MarketState {
        self
    }
}

/// The background price mover.
///
/// This component is designed to run in its own task for the lifetime of the process.
/// Every cycle it takes the shared lock, moves every live price once, releases the lock
/// and waits for the next cycle.
pub struct PriceSimulator<S: MarketHost> {
    /// The shared state holding the market.
    state: Arc<Mutex<S>>,
    /// Time between two ticks.
    period: Duration,
    /// Bound of the symmetric uniform move, as a fraction.
    max_move: Decimal,
    rng: StdRng,
}

impl<S: MarketHost> PriceSimulator<S> {
    /// Creates a new `PriceSimulator` from the `[simulation]` settings.
    ///
    /// A configured seed makes the sequence of moves reproducible.
    pub fn new(state: Arc<Mutex<S>>, settings: &SimulationSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            state,
            period: settings.interval(),
            max_move: settings.max_move_pct,
            rng,
        }
    }

    /// Runs exactly one tick under the shared lock.
    pub async fn step(&mut self) -> Result<(), MarketError> {
        let mut guard = self.state.lock().await;
        guard.market_mut().tick(&mut self.rng, self.max_move)
    }

    /// Enters the perpetual simulation loop. Never returns.
    pub async fn start(mut self) {
        tracing::info!(
            period_secs = self.period.as_secs(),
            max_move = %self.max_move,
            "Price simulator started."
        );
        let mut timer = interval(self.period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            // The first tick is immediate.
            timer.tick().await;

            // A failed tick is skipped; the next cycle starts from the untouched prices.
            match self.step().await {
                Ok(()) => tracing::debug!("Prices ticked."),
                Err(e) => tracing::warn!(error = %e, "Skipping price tick."),
            }
        }
    }
}
