//! # Stock League Engine
//!
//! The orchestrator of a fantasy stock league session. It owns the one piece of shared
//! state (market, registered users, phase) behind a single `tokio::sync::Mutex` and
//! exposes the three foreground operations a presentation layer needs:
//!
//! - `register_picks`: validates and installs every user's picks atomically.
//! - `get_report`: rescores everyone and returns a typed `Report`.
//! - `reset_game`: forgets every user while the market keeps moving.
//!
//! The background `PriceSimulator` shares the same lock, so a tick never interleaves
//! with a registration, a reset or a report.

use chrono::Utc;
use configuration::{GameConfig, GameSettings, SimulationSettings};
use core_types::{GamePhase, PickSlot};
use market::{MarketHost, MarketState, PriceQuote, PriceSimulator};
use report::Report;
use scoring::{ScoringEngine, UserStanding};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub mod error;
pub mod registry;
pub mod reporter;

pub use error::EngineError;
pub use registry::{PickRegistry, PickViolation, RegistrationError, Violation};
pub use reporter::ReportBuilder;

/// Status line shown after a successful registration.
pub const PICKS_SET_MESSAGE: &str = "✅ Picks and captains set! Click refresh to see logs and scores...";

/// Everything guarded by the game lock.
///
/// Only the engine's own operations reach into it; callers see copies.
#[derive(Debug, Clone)]
pub struct GameState {
    market: MarketState,
    registry: PickRegistry,
    phase: GamePhase,
}

impl GameState {
    pub fn new(market: MarketState) -> Self {
        Self {
            market,
            registry: PickRegistry::new(),
            phase: GamePhase::AwaitingPicks,
        }
    }
}

impl MarketHost for GameState {
    fn market_mut(&mut self) -> &mut MarketState {
        &mut self.market
    }
}

/// The public façade over one game session.
///
/// Cheap to clone; every clone drives the same session.
#[derive(Clone)]
pub struct GameEngine {
    state: Arc<Mutex<GameState>>,
    scoring: ScoringEngine,
    simulation: SimulationSettings,
    limits: GameSettings,
}

impl GameEngine {
    /// Builds a session. The configuration is validated first, so a bad interval or
    /// move bound fails here rather than inside the simulator task.
    pub fn new(config: &GameConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let market = MarketState::from_settings(&config.market)?;
        info!(symbols = config.market.stocks.len(), "Market opened.");

        Ok(Self {
            state: Arc::new(Mutex::new(GameState::new(market))),
            scoring: ScoringEngine::new(&config.scoring),
            simulation: config.simulation.clone(),
            limits: config.game.clone(),
        })
    }

    /// Starts the background price simulator on the current runtime.
    ///
    /// The task runs until the runtime shuts down or the handle is aborted.
    pub fn spawn_simulator(&self) -> JoinHandle<()> {
        let simulator = PriceSimulator::new(Arc::clone(&self.state), &self.simulation);
        tokio::spawn(simulator.start())
    }

    /// Validates all slots and, if every user is valid, replaces the registered users.
    ///
    /// Slot `i` becomes `User{i+1}`. On error nothing changes and the error displays
    /// every violation joined by `"; "`.
    pub async fn register_picks(&self, slots: Vec<PickSlot>) -> Result<(), EngineError> {
        let mut state = self.state.lock().await;
        let GameState {
            market,
            registry,
            phase,
        } = &mut *state;

        if let Err(e) = registry.register_all(&slots, market, &self.limits, &self.scoring) {
            warn!(error = %e, "Rejected pick registration.");
            return Err(e.into());
        }
        *phase = GamePhase::Live;

        info!(users = registry.len(), "Picks and captains registered.");
        Ok(())
    }

    /// Rescores every user and snapshots the market and leaderboard.
    ///
    /// Each call appends one history entry per user and advances the price baseline.
    pub async fn get_report(&self) -> Report {
        let mut state = self.state.lock().await;
        let report = ReportBuilder::new(&self.scoring).build(&mut state, Utc::now());
        debug!(lines = report.lines.len(), phase = ?report.phase, "Report built.");
        report
    }

    /// Rescores every user without building a report.
    pub async fn rescore_all(&self) {
        let mut state = self.state.lock().await;
        let GameState {
            market, registry, ..
        } = &mut *state;
        self.scoring
            .rescore_all(registry.standings_mut(), &*market, Utc::now());
    }

    /// Forgets all users, their scores and histories. Prices are left as they are.
    pub async fn reset_game(&self) {
        let mut state = self.state.lock().await;
        let dropped = state.registry.len();
        state.registry.clear();
        state.phase = GamePhase::AwaitingPicks;
        info!(users = dropped, "Game reset.");
    }

    pub async fn phase(&self) -> GamePhase {
        self.state.lock().await.phase
    }

    /// A copy of every registered user's standing, in registration order.
    pub async fn standings(&self) -> Vec<UserStanding> {
        self.state.lock().await.registry.standings().to_vec()
    }

    pub async fn market_snapshot(&self) -> Vec<PriceQuote> {
        self.state.lock().await.market.snapshot()
    }
}

/// The one-line status a UI shows after a registration attempt.
pub fn status_message(outcome: &Result<(), EngineError>) -> String {
    match outcome {
        Ok(()) => PICKS_SET_MESSAGE.to_string(),
        Err(e) => format!("❌ Error: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::{MarketSettings, StockListing};
    use core_types::{Role, Symbol};
    use report::ReportLine;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn sym(s: &str) -> Symbol {
        Symbol::new(s).unwrap()
    }

    fn engine() -> GameEngine {
        GameEngine::new(&GameConfig::default()).unwrap()
    }

    /// Three stocks opening at 100, for easy arithmetic.
    fn flat_engine() -> GameEngine {
        let mut config = GameConfig::default();
        config.market = MarketSettings {
            stocks: ["AAA", "BBB", "CCC"]
                .into_iter()
                .map(|s| StockListing {
                    symbol: sym(s),
                    opening_price: dec!(100),
                })
                .collect(),
        };
        GameEngine::new(&config).unwrap()
    }

    fn slots(raw: &[&str]) -> Vec<PickSlot> {
        raw.iter().map(|s| s.parse().unwrap()).collect()
    }

    async fn pin(engine: &GameEngine, symbol: &str, price: Decimal) {
        let mut state = engine.state.lock().await;
        state.market.set_live(&sym(symbol), price).unwrap();
    }

    #[test]
    fn invalid_configuration_is_rejected_up_front() {
        let mut config = GameConfig::default();
        config.simulation.interval_secs = 0;
        assert!(matches!(GameEngine::new(&config), Err(EngineError::Config(_))));

        let mut config = GameConfig::default();
        config.simulation.max_move_pct = dec!(1.5);
        assert!(matches!(GameEngine::new(&config), Err(EngineError::Config(_))));
    }

    #[tokio::test]
    async fn registration_moves_the_game_live() {
        let engine = engine();
        assert_eq!(engine.phase().await, GamePhase::AwaitingPicks);

        engine
            .register_picks(slots(&["TCS,INFY,TITAN:TCS:INFY"]))
            .await
            .unwrap();
        assert_eq!(engine.phase().await, GamePhase::Live);
        assert_eq!(engine.standings().await.len(), 1);
    }

    #[tokio::test]
    async fn rejected_registration_changes_nothing() {
        let engine = engine();
        engine.register_picks(slots(&["TCS,INFY:TCS"])).await.unwrap();
        engine.get_report().await;
        let before = engine.standings().await;

        let outcome = engine
            .register_picks(slots(&["MARUTI", "TCS,INFY,TITAN:TCS:TCS"]))
            .await;
        assert!(matches!(outcome, Err(EngineError::Registration(_))));
        assert_eq!(
            status_message(&outcome),
            "❌ Error: User2: Captain and Vice Captain must be different"
        );
        assert_eq!(engine.standings().await, before);
        assert_eq!(engine.phase().await, GamePhase::Live);
    }

    #[tokio::test]
    async fn reregistration_starts_from_scratch() {
        let engine = engine();
        engine.register_picks(slots(&["TCS"])).await.unwrap();
        engine.get_report().await;
        engine.get_report().await;

        engine.register_picks(slots(&["INFY", "TITAN"])).await.unwrap();
        let standings = engine.standings().await;
        assert_eq!(standings.len(), 2);
        assert!(standings.iter().all(|s| s.history.is_empty() && s.score.is_zero()));
    }

    #[tokio::test]
    async fn reset_keeps_prices() {
        let engine = engine();
        engine.register_picks(slots(&["TCS:TCS"])).await.unwrap();
        pin(&engine, "TCS", dec!(4000)).await;

        engine.reset_game().await;
        assert_eq!(engine.phase().await, GamePhase::AwaitingPicks);
        assert!(engine.standings().await.is_empty());

        let report = engine.get_report().await;
        assert!(!report.has_leaderboard());
        let tcs = report
            .price_rows()
            .find(|r| r.symbol.as_str() == "TCS")
            .unwrap();
        assert_eq!(tcs.current, dec!(4000));
    }

    #[tokio::test]
    async fn rescore_all_appends_history() {
        let engine = engine();
        engine.register_picks(slots(&["TCS", "INFY"])).await.unwrap();
        engine.rescore_all().await;
        engine.rescore_all().await;
        for standing in engine.standings().await {
            assert_eq!(standing.history.len(), 2);
        }
    }

    #[tokio::test]
    async fn roles_scale_a_ten_percent_gain() {
        let engine = flat_engine();
        engine
            .register_picks(slots(&["AAA:AAA", "AAA::AAA", "AAA"]))
            .await
            .unwrap();
        pin(&engine, "AAA", dec!(110)).await;

        let report = engine.get_report().await;
        let breakdowns: Vec<_> = report
            .lines
            .iter()
            .filter_map(|l| match l {
                ReportLine::Breakdown(line) => Some((line.role, line.final_points)),
                _ => None,
            })
            .collect();

        assert_eq!(
            breakdowns,
            vec![
                (Role::Captain, dec!(200)),
                (Role::ViceCaptain, dec!(150)),
                (Role::Regular, dec!(100)),
            ]
        );
    }

    #[tokio::test]
    async fn leaderboard_ranks_ties_in_registration_order() {
        let engine = flat_engine();
        engine
            .register_picks(slots(&["AAA", "BBB", "CCC"]))
            .await
            .unwrap();
        pin(&engine, "AAA", dec!(105)).await;
        pin(&engine, "BBB", dec!(107.5)).await;
        pin(&engine, "CCC", dec!(107.5)).await;

        let report = engine.get_report().await;
        let order: Vec<_> = report
            .leader_rows()
            .map(|r| (r.user_id.to_string(), r.total))
            .collect();
        assert_eq!(
            order,
            vec![
                ("User2".to_string(), dec!(75)),
                ("User3".to_string(), dec!(75)),
                ("User1".to_string(), dec!(50)),
            ]
        );
    }

    #[tokio::test]
    async fn history_keeps_the_last_ten_passes() {
        let engine = flat_engine();
        engine.register_picks(slots(&["AAA,BBB:BBB"])).await.unwrap();

        for step in 1..=11 {
            pin(&engine, "AAA", Decimal::from(100 + step)).await;
            engine.get_report().await;
        }

        let standing = engine.standings().await.remove(0);
        assert_eq!(standing.history.len(), 10);
        // The first pass (AAA at 101) was evicted.
        let first = standing.history.entries().next().unwrap();
        assert_eq!(first.score, dec!(20));
        assert_eq!(first.delta, dec!(10));
        assert_eq!(standing.score, dec!(110));
    }

    #[test]
    fn success_status_matches_the_ui_text() {
        assert_eq!(status_message(&Ok(())), PICKS_SET_MESSAGE);
    }
}
