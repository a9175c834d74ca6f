use crate::error::ReportError;
use chrono::{DateTime, Utc};
use core_types::{GamePhase, Symbol, UserId};
use market::TickDirection;
use rust_decimal::Decimal;
use scoring::{ScoreLine, Trend};
use serde::{Deserialize, Serialize};

/// The headed blocks of a report, in the order they appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Section {
    StockUpdates,
    Leaderboard,
}

/// One symbol's line in the price table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub symbol: Symbol,
    /// Price as of the previous report.
    pub previous: Decimal,
    pub current: Decimal,
    pub direction: TickDirection,
    /// Move since the open, in percent.
    pub day_pct: Decimal,
    pub day_points: Decimal,
}

/// Podium marker for the top three ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    /// Medal for a one-based rank, if it is on the podium.
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }
}

/// A user's headline on the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderRow {
    /// One-based position.
    pub rank: usize,
    pub medal: Option<Medal>,
    pub user_id: UserId,
    pub total: Decimal,
    pub captain: Option<Symbol>,
    pub vice_captain: Option<Symbol>,
}

/// One entry of a user's score trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailRow {
    pub timestamp: DateTime<Utc>,
    pub score: Decimal,
    pub delta: Decimal,
    pub trend: Trend,
}

/// A single typed line of a report.
///
/// Serialized as `{"type": "...", "payload": {...}}` so a client can switch on `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ReportLine {
    /// Start of a headed block.
    Heading(Section),
    Price(PriceRow),
    Leader(LeaderRow),
    /// A per-symbol breakdown belonging to the preceding `Leader` line.
    Breakdown(ScoreLine),
    /// A score-trail entry belonging to the preceding `Leader` line.
    Trail(TrailRow),
    /// Ends one user's block.
    Spacer,
}

/// An immutable snapshot of the market and leaderboard at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub phase: GamePhase,
    pub lines: Vec<ReportLine>,
}

impl Report {
    pub fn new(generated_at: DateTime<Utc>, phase: GamePhase) -> Self {
        Self {
            generated_at,
            phase,
            lines: Vec::new(),
        }
    }

    pub fn push(&mut self, line: ReportLine) {
        self.lines.push(line);
    }

    pub fn price_rows(&self) -> impl Iterator<Item = &PriceRow> {
        self.lines.iter().filter_map(|line| match line {
            ReportLine::Price(row) => Some(row),
            _ => None,
        })
    }

    pub fn leader_rows(&self) -> impl Iterator<Item = &LeaderRow> {
        self.lines.iter().filter_map(|line| match line {
            ReportLine::Leader(row) => Some(row),
            _ => None,
        })
    }

    pub fn has_leaderboard(&self) -> bool {
        self.lines
            .iter()
            .any(|line| matches!(line, ReportLine::Heading(Section::Leaderboard)))
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
