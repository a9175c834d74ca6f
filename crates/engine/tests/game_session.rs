use configuration::GameConfig;
use core_types::{GamePhase, PickSlot, Symbol};
use engine::{EngineError, GameEngine};
use report::{Report, ReportLine};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::time::Duration;

fn slots(raw: &[&str]) -> Vec<PickSlot> {
    raw.iter().map(|s| s.parse().unwrap()).collect()
}

fn seeded_engine(seed: u64) -> GameEngine {
    let mut config = GameConfig::default();
    config.simulation.seed = Some(seed);
    GameEngine::new(&config).unwrap()
}

fn current_prices(report: &Report) -> HashMap<Symbol, Decimal> {
    report
        .price_rows()
        .map(|row| (row.symbol.clone(), row.current))
        .collect()
}

#[test]
fn zero_interval_is_rejected_before_the_simulator_exists() {
    let mut config = GameConfig::default();
    config.simulation.interval_secs = 0;

    let err = GameEngine::new(&config).err().unwrap();
    assert!(matches!(err, EngineError::Config(_)));
    assert!(err.to_string().contains("interval_secs"));
}

#[tokio::test]
async fn invalid_registration_is_atomic() {
    let engine = seeded_engine(1);
    engine.register_picks(slots(&["TCS:TCS"])).await.unwrap();

    let err = engine
        .register_picks(slots(&["INFY", "TCS,INFY:TITAN", "TCS,TCS"]))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Registration(_)));
    assert_eq!(
        err.to_string(),
        "User2: Captain must be from selected stocks; User3: Duplicate stock TCS"
    );

    let standings = engine.standings().await;
    assert_eq!(standings.len(), 1);
    assert_eq!(standings[0].pick.captain, Some(Symbol::new("TCS").unwrap()));
}

#[tokio::test]
async fn history_is_capped_at_ten_reports() {
    let engine = seeded_engine(2);
    engine.register_picks(slots(&["TCS,INFY"])).await.unwrap();

    for _ in 0..11 {
        engine.get_report().await;
    }

    let standing = engine.standings().await.remove(0);
    assert_eq!(standing.history.len(), 10);
    // Prices never moved, so every retained entry is flat.
    assert!(standing.history.entries().all(|e| e.delta.is_zero()));
}

#[tokio::test(start_paused = true)]
async fn reset_clears_users_but_not_prices() {
    let engine = seeded_engine(3);
    engine.register_picks(slots(&["TCS", "INFY"])).await.unwrap();

    let handle = engine.spawn_simulator();
    tokio::time::sleep(Duration::from_secs(10)).await;
    handle.abort();
    let before_reset = engine.market_snapshot().await;

    engine.reset_game().await;

    let report = engine.get_report().await;
    assert_eq!(report.phase, GamePhase::AwaitingPicks);
    assert!(!report.has_leaderboard());
    assert!(engine.standings().await.is_empty());
    let prices = current_prices(&report);
    assert_eq!(prices.len(), before_reset.len());
    for quote in before_reset {
        assert_eq!(prices[&quote.symbol], quote.live);
    }
}

#[tokio::test(start_paused = true)]
async fn simulator_keeps_prices_positive() {
    let engine = seeded_engine(7);
    let opening = engine.market_snapshot().await;

    let handle = engine.spawn_simulator();
    tokio::time::sleep(Duration::from_secs(31)).await;

    let quotes = engine.market_snapshot().await;
    assert_eq!(quotes.len(), opening.len());
    assert!(quotes.iter().all(|q| q.live > Decimal::ZERO));
    assert!(quotes.iter().zip(&opening).any(|(now, then)| now.live != then.live));

    handle.abort();
}

#[tokio::test(start_paused = true)]
async fn reports_taken_while_ticking_are_consistent_snapshots() {
    let engine = seeded_engine(11);
    engine
        .register_picks(slots(&["RELIANCE,TCS,INFY:TCS:INFY", "HDFCBANK,TITAN,TCS:TITAN"]))
        .await
        .unwrap();

    let mut previous: HashMap<Symbol, Decimal> = engine
        .market_snapshot()
        .await
        .into_iter()
        .map(|q| (q.symbol, q.live))
        .collect();
    let opening = previous.clone();

    let handle = engine.spawn_simulator();
    for _ in 0..5 {
        tokio::time::sleep(Duration::from_secs(4)).await;
        let report = engine.get_report().await;

        let day_pct: HashMap<_, _> = report
            .price_rows()
            .map(|row| (row.symbol.clone(), row.day_pct))
            .collect();
        for line in &report.lines {
            if let ReportLine::Breakdown(line) = line {
                assert_eq!(line.pct_change, day_pct[&line.symbol]);
            }
        }

        for row in report.price_rows() {
            assert_eq!(row.previous, previous[&row.symbol]);
        }
        previous = current_prices(&report);
    }
    handle.abort();

    assert!(previous.iter().any(|(symbol, price)| opening[symbol] != *price));
}
