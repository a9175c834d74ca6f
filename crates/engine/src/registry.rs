use configuration::GameSettings;
use core_types::{PickSlot, Symbol, UserId, UserPick};
use market::MarketState;
use scoring::{ScoringEngine, UserStanding};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// A single reason a pick slot was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("Captain must be from selected stocks")]
    CaptainNotSelected,

    #[error("Vice Captain must be from selected stocks")]
    ViceCaptainNotSelected,

    #[error("Captain and Vice Captain must be different")]
    SameCaptainAndVice,

    #[error("Unknown stock {0}")]
    UnknownSymbol(Symbol),

    #[error("Duplicate stock {0}")]
    DuplicateSymbol(Symbol),

    #[error("At most {max} stocks may be selected")]
    TooManyPicks { max: usize },

    #[error("Too many users: at most {max}")]
    TooManyUsers { max: usize },
}

/// A violation, attributed to a user where it concerns one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickViolation {
    pub user: Option<UserId>,
    pub violation: Violation,
}

impl fmt::Display for PickViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.user {
            Some(user) => write!(f, "{}: {}", user, self.violation),
            None => write!(f, "{}", self.violation),
        }
    }
}

/// A rejected registration. Carries every violation found across all slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationError {
    pub violations: Vec<PickViolation>,
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for RegistrationError {}

/// The registered users and their standings, in registration order.
#[derive(Debug, Clone, Default)]
pub struct PickRegistry {
    standings: Vec<UserStanding>,
}

impl PickRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates every slot and, only if all are valid, replaces the whole registry.
    ///
    /// On error nothing is modified.
    pub fn register_all(
        &mut self,
        slots: &[PickSlot],
        market: &MarketState,
        limits: &GameSettings,
        scoring: &ScoringEngine,
    ) -> Result<(), RegistrationError> {
        let picks = validate(slots, market, limits)?;
        self.standings = picks.into_iter().map(|pick| scoring.standing(pick)).collect();
        Ok(())
    }

    /// Drops every user together with their scores and history.
    pub fn clear(&mut self) {
        self.standings.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.standings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.standings.len()
    }

    pub fn standings(&self) -> &[UserStanding] {
        &self.standings
    }

    pub fn standings_mut(&mut self) -> &mut [UserStanding] {
        &mut self.standings
    }
}

/// Checks all slots against the market and the game limits, collecting every violation.
///
/// Only the upper bound on picks is enforced: a slot may name fewer than
/// `picks_per_user` symbols, or none at all, and is scored over what it has.
/// Unknown and repeated symbols are always rejected.
pub fn validate(
    slots: &[PickSlot],
    market: &MarketState,
    limits: &GameSettings,
) -> Result<Vec<UserPick>, RegistrationError> {
    let mut violations = Vec::new();

    if slots.len() > limits.user_slots {
        violations.push(PickViolation {
            user: None,
            violation: Violation::TooManyUsers {
                max: limits.user_slots,
            },
        });
    }

    let mut picks = Vec::with_capacity(slots.len());
    for (index, slot) in slots.iter().enumerate() {
        let user = UserId::for_slot(index);
        for violation in check_slot(slot, market, limits) {
            violations.push(PickViolation {
                user: Some(user.clone()),
                violation,
            });
        }
        picks.push(UserPick {
            user_id: user,
            symbols: slot.symbols.clone(),
            captain: slot.captain.clone(),
            vice_captain: slot.vice_captain.clone(),
        });
    }

    if violations.is_empty() {
        Ok(picks)
    } else {
        Err(RegistrationError { violations })
    }
}

fn check_slot(slot: &PickSlot, market: &MarketState, limits: &GameSettings) -> Vec<Violation> {
    let mut found = Vec::new();

    if slot.symbols.len() > limits.picks_per_user {
        found.push(Violation::TooManyPicks {
            max: limits.picks_per_user,
        });
    }

    let mut seen = HashSet::new();
    for symbol in &slot.symbols {
        if !market.contains(symbol) {
            found.push(Violation::UnknownSymbol(symbol.clone()));
        }
        if !seen.insert(symbol) {
            found.push(Violation::DuplicateSymbol(symbol.clone()));
        }
    }

    let selected = |s: &Symbol| slot.symbols.contains(s);
    if slot.captain.as_ref().is_some_and(|c| !selected(c)) {
        found.push(Violation::CaptainNotSelected);
    }
    if slot.vice_captain.as_ref().is_some_and(|v| !selected(v)) {
        found.push(Violation::ViceCaptainNotSelected);
    }
    if let (Some(captain), Some(vice)) = (&slot.captain, &slot.vice_captain) {
        if captain == vice {
            found.push(Violation::SameCaptainAndVice);
        }
    }
    found
}
