use crate::error::MarketError;
use configuration::MarketSettings;
use core_types::Symbol;
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Direction of the last observed move, as shown next to a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickDirection {
    Up,
    Down,
}

/// A consistent read of a single symbol's three prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub symbol: Symbol,
    pub opening: Decimal,
    pub previous: Decimal,
    pub live: Decimal,
}

impl PriceQuote {
    /// Up only on a strict rise; an unchanged price reads as Down.
    pub fn direction(&self) -> TickDirection {
        if self.live > self.previous {
            TickDirection::Up
        } else {
            TickDirection::Down
        }
    }
}

#[derive(Debug, Clone)]
struct Listing {
    symbol: Symbol,
    opening: Decimal,
    previous: Decimal,
    live: Decimal,
}

/// The price book of one session.
///
/// The symbol set is fixed at construction and every operation walks all of it in
/// listing order. Opening prices never change; live prices only change through `tick`;
/// previous prices only change through `advance_baseline`.
#[derive(Debug, Clone)]
pub struct MarketState {
    listings: Vec<Listing>,
    index: HashMap<Symbol, usize>,
}

impl MarketState {
    /// Creates a market where live and previous prices start at the opening price.
    pub fn new(
        opening_prices: impl IntoIterator<Item = (Symbol, Decimal)>,
    ) -> Result<Self, MarketError> {
        let mut listings = Vec::new();
        let mut index = HashMap::new();

        for (symbol, opening) in opening_prices {
            if opening <= Decimal::ZERO {
                return Err(MarketError::NonPositiveOpening {
                    symbol,
                    price: opening,
                });
            }
            if index.insert(symbol.clone(), listings.len()).is_some() {
                return Err(MarketError::DuplicateSymbol(symbol));
            }
            listings.push(Listing {
                symbol,
                opening,
                previous: opening,
                live: opening,
            });
        }

        if listings.is_empty() {
            return Err(MarketError::NoSymbols);
        }
        Ok(Self { listings, index })
    }

    /// Builds the market from the `[market]` section of the configuration.
    pub fn from_settings(settings: &MarketSettings) -> Result<Self, MarketError> {
        Self::new(
            settings
                .stocks
                .iter()
                .map(|stock| (stock.symbol.clone(), stock.opening_price)),
        )
    }

    /// Applies one independent random move in `[-max_move, +max_move]` to every symbol.
    ///
    /// The new prices are computed first and committed together: if any symbol fails,
    /// the whole tick is discarded and the market is left untouched.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, max_move: Decimal) -> Result<(), MarketError> {
        let bound = max_move
            .to_f64()
            .filter(|b| *b > 0.0 && *b < 1.0)
            .ok_or(MarketError::InvalidBound(max_move))?;

        let mut next = Vec::with_capacity(self.listings.len());
        for listing in &self.listings {
            let change = rng.gen_range(-bound..=bound);
            let change = Decimal::from_f64(change).ok_or(MarketError::Unrepresentable(change))?;
            next.push(apply_move(&listing.symbol, listing.live, change)?);
        }

        for (listing, price) in self.listings.iter_mut().zip(next) {
            listing.live = price;
        }
        Ok(())
    }

    /// Returns every symbol's opening, previous and live price, in listing order.
    pub fn snapshot(&self) -> Vec<PriceQuote> {
        self.listings
            .iter()
            .map(|l| PriceQuote {
                symbol: l.symbol.clone(),
                opening: l.opening,
                previous: l.previous,
                live: l.live,
            })
            .collect()
    }

    /// Makes the current live prices the baseline for the next direction arrows.
    pub fn advance_baseline(&mut self) {
        for listing in &mut self.listings {
            listing.previous = listing.live;
        }
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.listings.iter().map(|l| &l.symbol)
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.index.contains_key(symbol)
    }

    pub fn opening(&self, symbol: &Symbol) -> Option<Decimal> {
        self.listing(symbol).map(|l| l.opening)
    }

    pub fn live(&self, symbol: &Symbol) -> Option<Decimal> {
        self.listing(symbol).map(|l| l.live)
    }

    /// Pins a live price. Only available to tests.
    #[cfg(any(test, feature = "test-util"))]
    pub fn set_live(&mut self, symbol: &Symbol, price: Decimal) -> Result<(), MarketError> {
        let idx = *self
            .index
            .get(symbol)
            .ok_or_else(|| MarketError::UnknownSymbol(symbol.clone()))?;
        self.listings[idx].live = price;
        Ok(())
    }

    fn listing(&self, symbol: &Symbol) -> Option<&Listing> {
        self.index.get(symbol).map(|&idx| &self.listings[idx])
    }
}

/// `new = round(old * (1 + change), 2)`, rejecting results that are not strictly positive.
fn apply_move(symbol: &Symbol, old: Decimal, change: Decimal) -> Result<Decimal, MarketError> {
    let price = old
        .checked_mul(Decimal::ONE + change)
        .ok_or_else(|| MarketError::Overflow(symbol.clone()))?
        .round_dp(2);

    if price <= Decimal::ZERO {
        return Err(MarketError::NonPositivePrice {
            symbol: symbol.clone(),
            price,
        });
    }
    Ok(price)
}
