//! Plain-text rendering of a `Report`, laid out for a monospace log panel.

use crate::lines::{LeaderRow, Medal, PriceRow, Report, ReportLine, Section, TrailRow};
use chrono::{DateTime, Local, Utc};
use core_types::Role;
use market::TickDirection;
use rust_decimal::Decimal;
use scoring::{ScoreLine, Trend};

const RULE_WIDTH: usize = 80;

/// Rounds before formatting so the precision specifier only ever pads.
fn dp(value: Decimal, places: u32) -> Decimal {
    value.round_dp(places)
}

fn clock(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

fn medal(medal: Option<Medal>) -> &'static str {
    match medal {
        Some(Medal::Gold) => "🥇",
        Some(Medal::Silver) => "🥈",
        Some(Medal::Bronze) => "🥉",
        None => "  ",
    }
}

fn badge(role: Role) -> &'static str {
    match role {
        Role::Captain => " 👑(C)",
        Role::ViceCaptain => " 🅲(VC)",
        Role::Regular => "",
    }
}

impl Report {
    /// Renders the report as newline-separated text.
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(|line| render_line(line, self.generated_at))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn render_line(line: &ReportLine, generated_at: DateTime<Utc>) -> String {
    match line {
        ReportLine::Heading(section) => heading(*section, generated_at),
        ReportLine::Price(row) => price_row(row),
        ReportLine::Leader(row) => leader_row(row),
        ReportLine::Breakdown(line) => format!("     └─ {}", breakdown(line)),
        ReportLine::Trail(row) => trail_row(row),
        ReportLine::Spacer => String::new(),
    }
}

fn heading(section: Section, generated_at: DateTime<Utc>) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let title = match section {
        Section::StockUpdates => format!("📊 STOCK UPDATES - {}", clock(generated_at)),
        // The leaderboard follows the price table after a blank line.
        Section::Leaderboard => "🏆 USER SCORES BREAKDOWN".to_string(),
    };
    let lead = if section == Section::Leaderboard { "\n" } else { "" };
    format!("{lead}{rule}\n{title}\n{rule}")
}

pub fn price_row(row: &PriceRow) -> String {
    let (arrow, light) = match row.direction {
        TickDirection::Up => ("▲", "🟢"),
        TickDirection::Down => ("▼", "🔴"),
    };
    format!(
        "{:12} | ₹{:8.2} → ₹{:8.2} {} {} | Day: {:+6.2}% → {:+6.1} pts",
        row.symbol,
        dp(row.previous, 2),
        dp(row.current, 2),
        arrow,
        light,
        dp(row.day_pct, 2),
        dp(row.day_points, 1),
    )
}

pub fn leader_row(row: &LeaderRow) -> String {
    let mut out = format!("{} {:8} | Total: {:+8.1} pts", medal(row.medal), row.user_id, dp(row.total, 1));
    if row.captain.is_some() || row.vice_captain.is_some() {
        let name = |s: &Option<core_types::Symbol>| {
            s.as_ref().map_or_else(|| "None".to_string(), |s| s.to_string())
        };
        out.push_str(&format!(" | 👑{} 🅲{}", name(&row.captain), name(&row.vice_captain)));
    }
    out
}

/// One symbol's contribution, e.g. `TCS: +1.25% → +12.5 × 2 = +25.0 pts 👑(C)`.
pub fn breakdown(line: &ScoreLine) -> String {
    if line.is_boosted() {
        format!(
            "{}: {:+.2}% → {:+.1} × {} = {:+.1} pts{}",
            line.symbol,
            dp(line.pct_change, 2),
            dp(line.base_points, 1),
            line.multiplier.normalize(),
            dp(line.final_points, 1),
            badge(line.role),
        )
    } else {
        format!(
            "{}: {:+.2}% → {:+.1} pts",
            line.symbol,
            dp(line.pct_change, 2),
            dp(line.final_points, 1),
        )
    }
}

pub fn trail_row(row: &TrailRow) -> String {
    let head = format!("        {}: {:+7.1} pts", clock(row.timestamp), dp(row.score, 1));
    match row.trend {
        Trend::Initial => format!("{head} (initial)"),
        trend => {
            let indicator = match trend {
                Trend::Up => "📈",
                Trend::Down => "📉",
                _ => "➡️",
            };
            format!("{head} ({:+5.1}) {indicator}", dp(row.delta, 1))
        }
    }
}
