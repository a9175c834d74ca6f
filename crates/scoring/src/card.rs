use core_types::{Role, Symbol};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The scoring breakdown of one picked symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreLine {
    pub symbol: Symbol,
    pub role: Role,
    /// Move since the open, in percent.
    pub pct_change: Decimal,
    /// Points before the role multiplier.
    pub base_points: Decimal,
    pub multiplier: Decimal,
    pub final_points: Decimal,
}

impl ScoreLine {
    /// True when a captain or vice-captain multiplier actually raised the points.
    pub fn is_boosted(&self) -> bool {
        self.role.is_designated() && self.multiplier > Decimal::ONE
    }
}

/// The outcome of scoring one user's picks against the market.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub lines: Vec<ScoreLine>,
    pub total: Decimal,
}
