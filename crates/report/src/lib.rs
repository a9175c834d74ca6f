//! # Report
//!
//! The point-in-time payload handed to presentation layers after every refresh.
//!
//! A `Report` is an ordered list of typed lines (price rows, leaderboard rows, score
//! breakdowns and trail entries). Building it is the engine's job; this crate only
//! defines the vocabulary and turns a finished report into text or JSON.

// Declare the modules that make up this crate.
pub mod error;
pub mod lines;
pub mod render;

// Re-export the core types to provide a clean public API.
pub use error::ReportError;
pub use lines::{LeaderRow, Medal, PriceRow, Report, ReportLine, Section, TrailRow};
