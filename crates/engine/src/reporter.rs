use crate::GameState;
use chrono::{DateTime, Utc};
use report::{LeaderRow, Medal, PriceRow, Report, ReportLine, Section, TrailRow};
use scoring::{ScoringEngine, UserStanding, percent_change, points_for};

/// Turns the shared game state into a `Report`.
///
/// Building is not read-only: every user is rescored (one history entry each) and the
/// price baseline advances, so two consecutive reports compare against each other.
pub struct ReportBuilder<'a> {
    scoring: &'a ScoringEngine,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(scoring: &'a ScoringEngine) -> Self {
        Self { scoring }
    }

    /// Must be called with the game lock held for the whole pass.
    pub fn build(&self, state: &mut GameState, at: DateTime<Utc>) -> Report {
        let GameState {
            market,
            registry,
            phase,
        } = state;

        self.scoring.rescore_all(registry.standings_mut(), &*market, at);

        let mut report = Report::new(at, *phase);
        report.push(ReportLine::Heading(Section::StockUpdates));
        for quote in market.snapshot() {
            let day_pct = percent_change(quote.opening, quote.live);
            report.push(ReportLine::Price(PriceRow {
                direction: quote.direction(),
                day_points: points_for(day_pct),
                day_pct,
                symbol: quote.symbol,
                previous: quote.previous,
                current: quote.live,
            }));
        }
        market.advance_baseline();

        if registry.is_empty() {
            return report;
        }

        report.push(ReportLine::Heading(Section::Leaderboard));
        for (index, standing) in ranked(registry.standings()).into_iter().enumerate() {
            push_user(&mut report, index + 1, standing);
        }
        report
    }
}

/// Highest score first. `sort_by` is stable, so ties keep registration order.
fn ranked(standings: &[UserStanding]) -> Vec<&UserStanding> {
    let mut order: Vec<_> = standings.iter().collect();
    order.sort_by(|a, b| b.score.cmp(&a.score));
    order
}

fn push_user(report: &mut Report, rank: usize, standing: &UserStanding) {
    report.push(ReportLine::Leader(LeaderRow {
        rank,
        medal: Medal::for_rank(rank),
        user_id: standing.pick.user_id.clone(),
        total: standing.score,
        captain: standing.pick.captain.clone(),
        vice_captain: standing.pick.vice_captain.clone(),
    }));

    for line in &standing.card.lines {
        report.push(ReportLine::Breakdown(line.clone()));
    }

    for (entry, trend) in standing.history.trail() {
        report.push(ReportLine::Trail(TrailRow {
            timestamp: entry.timestamp,
            score: entry.score,
            delta: entry.delta,
            trend,
        }));
    }

    report.push(ReportLine::Spacer);
}
