//! # Market
//!
//! The simulated stock market of a game session: a fixed set of listed symbols with
//! their opening, live and previous prices, and the background task that keeps the
//! live prices moving.
//!
//! ## Architectural Principles
//!
//! - **State vs. Driver Decoupling:** `MarketState` is a plain synchronous state
//!   machine with no knowledge of locks or time. The `PriceSimulator` owns the timer
//!   and the random generator and only ever touches the market through the shared
//!   lock it was handed.
//! - **Fail-fast construction:** a market cannot be built with a non-positive opening
//!   price, so every later percentage computation can divide by it safely.
//!
//! ## Public API
//!
//! - `MarketState`: the per-session price book.
//! - `PriceQuote` / `TickDirection`: a consistent read of one symbol.
//! - `PriceSimulator` / `MarketHost`: the perpetual price-moving task.
//! - `MarketError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod simulator;
pub mod state;

// Re-export the key components to provide a clean, public-facing API.
pub use error::MarketError;
pub use simulator::{MarketHost, PriceSimulator};
pub use state::{MarketState, PriceQuote, TickDirection};
