use core_types::Symbol;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    #[error("The market must list at least one symbol")]
    NoSymbols,

    #[error("Symbol {0} is listed more than once")]
    DuplicateSymbol(Symbol),

    #[error("Opening price for {symbol} must be positive, got {price}")]
    NonPositiveOpening { symbol: Symbol, price: Decimal },

    #[error("Symbol {0} is not listed in this market")]
    UnknownSymbol(Symbol),

    #[error("Invalid price move bound {0}: must be between 0 and 1")]
    InvalidBound(Decimal),

    #[error("Could not represent price move {0} as a decimal")]
    Unrepresentable(f64),

    #[error("Price move for {symbol} produced a non-positive price {price}")]
    NonPositivePrice { symbol: Symbol, price: Decimal },

    #[error("Arithmetic overflow while moving the price of {0}")]
    Overflow(Symbol),
}
