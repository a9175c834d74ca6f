use crate::card::{ScoreCard, ScoreLine};
use crate::history::ScoreHistory;
use chrono::{DateTime, Utc};
use configuration::ScoringSettings;
use core_types::{Role, Symbol, UserPick};
use market::MarketState;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Read access to the two prices scoring needs for a symbol.
pub trait PriceLookup {
    /// Returns `(opening, live)`, or `None` if the symbol is not priced.
    fn quote(&self, symbol: &Symbol) -> Option<(Decimal, Decimal)>;
}

impl PriceLookup for MarketState {
    fn quote(&self, symbol: &Symbol) -> Option<(Decimal, Decimal)> {
        self.opening(symbol).zip(self.live(symbol))
    }
}

/// `(live - opening) / opening * 100`. A non-positive opening yields zero.
pub fn percent_change(opening: Decimal, live: Decimal) -> Decimal {
    if opening <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (live - opening) / opening * dec!(100)
}

/// Ten points per percent, rounded to two places.
pub fn points_for(pct_change: Decimal) -> Decimal {
    (pct_change * dec!(10)).round_dp(2)
}

/// Everything the game tracks for one registered user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStanding {
    pub pick: UserPick,
    pub score: Decimal,
    /// The breakdown of the latest pass; empty until the first pass.
    pub card: ScoreCard,
    pub history: ScoreHistory,
}

/// The scoring calculator.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    captain_multiplier: Decimal,
    vice_captain_multiplier: Decimal,
    history_len: usize,
}

impl ScoringEngine {
    pub fn new(settings: &ScoringSettings) -> Self {
        Self {
            captain_multiplier: settings.captain_multiplier,
            vice_captain_multiplier: settings.vice_captain_multiplier,
            history_len: settings.history_len,
        }
    }

    pub fn multiplier(&self, role: Role) -> Decimal {
        match role {
            Role::Captain => self.captain_multiplier,
            Role::ViceCaptain => self.vice_captain_multiplier,
            Role::Regular => Decimal::ONE,
        }
    }

    /// A fresh standing for a newly registered user: zero score, no card, no history.
    pub fn standing(&self, pick: UserPick) -> UserStanding {
        UserStanding {
            pick,
            score: Decimal::ZERO,
            card: ScoreCard::default(),
            history: ScoreHistory::new(self.history_len),
        }
    }

    /// Scores a pick against the given prices.
    pub fn score_pick(&self, pick: &UserPick, prices: &impl PriceLookup) -> ScoreCard {
        let mut lines = Vec::with_capacity(pick.symbols.len());
        let mut sum = Decimal::ZERO;

        for symbol in &pick.symbols {
            let Some((opening, live)) = prices.quote(symbol) else {
                tracing::warn!(user = %pick.user_id, %symbol, "No price for picked symbol; it scores nothing.");
                continue;
            };

            let role = pick.role_of(symbol);
            let multiplier = self.multiplier(role);
            let pct_change = percent_change(opening, live);
            let base_points = points_for(pct_change);
            let final_points = (base_points * multiplier).round_dp(2);

            sum += final_points;
            lines.push(ScoreLine {
                symbol: symbol.clone(),
                role,
                pct_change,
                base_points,
                multiplier,
                final_points,
            });
        }

        ScoreCard {
            lines,
            total: sum.round_dp(2),
        }
    }

    /// Recomputes one user in full and appends the result to their history.
    pub fn rescore(&self, standing: &mut UserStanding, prices: &impl PriceLookup, at: DateTime<Utc>) {
        let card = self.score_pick(&standing.pick, prices);
        let delta = standing.history.record(at, card.total);

        tracing::debug!(user = %standing.pick.user_id, total = %card.total, %delta, "User rescored.");
        standing.score = card.total;
        standing.card = card;
    }

    /// Rescores every user with the same timestamp.
    pub fn rescore_all(&self, standings: &mut [UserStanding], prices: &impl PriceLookup, at: DateTime<Utc>) {
        for standing in standings.iter_mut() {
            self.rescore(standing, prices, at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::UserId;

    fn sym(s: &str) -> Symbol {
        Symbol::new(s).unwrap()
    }

    fn engine() -> ScoringEngine {
        ScoringEngine::new(&ScoringSettings::default())
    }

    /// AAA 100 -> 110, BBB 200 -> 190, CCC 50 -> 50.
    fn market() -> MarketState {
        let mut market = MarketState::new([
            (sym("AAA"), dec!(100)),
            (sym("BBB"), dec!(200)),
            (sym("CCC"), dec!(50)),
        ])
        .unwrap();
        market.set_live(&sym("AAA"), dec!(110)).unwrap();
        market.set_live(&sym("BBB"), dec!(190)).unwrap();
        market
    }

    fn pick(captain: Option<&str>, vice: Option<&str>) -> UserPick {
        UserPick {
            user_id: UserId::for_slot(0),
            symbols: vec![sym("AAA"), sym("BBB"), sym("CCC")],
            captain: captain.map(sym),
            vice_captain: vice.map(sym),
        }
    }

    #[test]
    fn formulas() {
        assert_eq!(percent_change(dec!(100), dec!(110)), dec!(10));
        assert_eq!(points_for(dec!(10)), dec!(100));
        assert_eq!(points_for(percent_change(dec!(3), dec!(4))), dec!(333.33));
        assert_eq!(percent_change(Decimal::ZERO, dec!(5)), Decimal::ZERO);
    }

    #[test]
    fn captain_doubles_points() {
        let card = engine().score_pick(&pick(Some("AAA"), None), &market());
        let line = &card.lines[0];
        assert_eq!(line.pct_change, dec!(10));
        assert_eq!(line.base_points, dec!(100));
        assert_eq!(line.multiplier, dec!(2.0));
        assert_eq!(line.final_points, dec!(200));
        assert!(line.is_boosted());
    }

    #[test]
    fn vice_captain_earns_one_and_a_half() {
        let card = engine().score_pick(&pick(None, Some("AAA")), &market());
        assert_eq!(card.lines[0].final_points, dec!(150));
        assert_eq!(card.lines[0].role, Role::ViceCaptain);
    }

    #[test]
    fn no_role_scores_base_points() {
        let card = engine().score_pick(&pick(None, None), &market());
        assert_eq!(card.lines[0].final_points, dec!(100));
        assert!(!card.lines[0].is_boosted());
    }

    #[test]
    fn multipliers_apply_to_losses_too() {
        // BBB lost 5% -> -50 base points, doubled as captain.
        let card = engine().score_pick(&pick(Some("BBB"), Some("AAA")), &market());
        assert_eq!(card.lines[1].final_points, dec!(-100));
        // 150 (vice AAA) - 100 (captain BBB) + 0 (CCC flat)
        assert_eq!(card.total, dec!(50));
    }

    #[test]
    fn unknown_symbol_contributes_nothing() {
        let mut p = pick(Some("ZZZ"), None);
        p.symbols = vec![sym("AAA"), sym("ZZZ")];
        let card = engine().score_pick(&p, &market());
        assert_eq!(card.lines.len(), 1);
        assert_eq!(card.total, dec!(100));
    }

    #[test]
    fn short_pick_sums_what_is_present() {
        let mut p = pick(None, None);
        p.symbols.truncate(1);
        assert_eq!(engine().score_pick(&p, &market()).total, dec!(100));

        p.symbols.clear();
        assert_eq!(engine().score_pick(&p, &market()).total, Decimal::ZERO);
    }

    #[test]
    fn rescoring_unchanged_prices_is_idempotent() {
        let engine = engine();
        let market = market();
        let mut standing = engine.standing(pick(Some("AAA"), Some("BBB")));

        engine.rescore(&mut standing, &market, Utc::now());
        let first_card = standing.card.clone();
        engine.rescore(&mut standing, &market, Utc::now());

        assert_eq!(standing.card, first_card);
        assert_eq!(standing.history.len(), 2);
        assert_eq!(standing.history.latest().unwrap().delta, Decimal::ZERO);
    }

    #[test]
    fn rescore_all_tracks_each_user() {
        let engine = engine();
        let mut market = market();
        let mut standings = vec![
            engine.standing(pick(Some("AAA"), None)),
            engine.standing(pick(None, None)),
        ];

        engine.rescore_all(&mut standings, &market, Utc::now());
        assert_eq!(standings[0].score, dec!(150));
        assert_eq!(standings[1].score, dec!(50));

        market.set_live(&sym("AAA"), dec!(100)).unwrap();
        engine.rescore_all(&mut standings, &market, Utc::now());
        assert_eq!(standings[0].score, dec!(-50));
        assert_eq!(standings[0].history.latest().unwrap().delta, dec!(-200));
        assert_eq!(standings[1].history.latest().unwrap().delta, dec!(-100));
    }
}
