//! # Scoring
//!
//! Turns a user's picks and the current market into points.
//!
//! ## Architectural Principles
//!
//! - **Stateless Calculation:** `ScoringEngine` holds only the multipliers. A score card
//!   is a pure function of the opening price, the live price and the pick, so scoring
//!   twice against unchanged prices yields identical cards.
//! - **Graceful Degradation:** a symbol the market cannot price contributes nothing
//!   instead of failing the pass.
//!
//! ## Public API
//!
//! - `ScoringEngine`: computes `ScoreCard`s and drives a full rescore.
//! - `UserStanding`: everything the game tracks for one registered user.
//! - `ScoreHistory`: the bounded per-user trail of past totals.
//! - `percent_change` / `points_for`: the shared point formulas.

// Declare the modules that constitute this crate.
pub mod card;
pub mod engine;
pub mod history;

// Re-export the key components to create a clean, public-facing API.
pub use card::{ScoreCard, ScoreLine};
pub use engine::{PriceLookup, ScoringEngine, UserStanding, percent_change, points_for};
pub use history::{HistoryEntry, ScoreHistory, Trend};
