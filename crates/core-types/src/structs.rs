use crate::enums::Role;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a tradable instrument (e.g., "RELIANCE").
///
/// Symbols are normalised to upper case so that `"tcs"` and `"TCS"` name the same stock.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidInput(
                "symbol".to_string(),
                "symbol must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` keeps width specifiers like `{:12}` working for table rendering.
        f.pad(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Symbol::new(&value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl FromStr for Symbol {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symbol::new(s)
    }
}

/// Identifier of a participant. Assigned from the slot position at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Builds the id for a zero-based slot index: slot 0 is `User1`.
    pub fn for_slot(index: usize) -> Self {
        Self(format!("User{}", index + 1))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// The raw input for one user slot, as collected by a presentation layer.
///
/// Nothing is validated here; the registry checks a slot against the market before
/// turning it into a `UserPick`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickSlot {
    pub symbols: Vec<Symbol>,
    pub captain: Option<Symbol>,
    pub vice_captain: Option<Symbol>,
}

impl PickSlot {
    pub fn new(symbols: Vec<Symbol>, captain: Option<Symbol>, vice_captain: Option<Symbol>) -> Self {
        Self {
            symbols,
            captain,
            vice_captain,
        }
    }
}

/// Parses the compact `SYM,SYM,SYM[:CAPTAIN[:VICE]]` form.
///
/// An empty captain or vice-captain field means "not set", so `A,B,C::B` only names a vice-captain.
impl FromStr for PickSlot {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let symbols = parts
            .next()
            .unwrap_or_default()
            .split(',')
            .filter(|raw| !raw.trim().is_empty())
            .map(Symbol::new)
            .collect::<Result<Vec<_>, _>>()?;

        let optional = |raw: Option<&str>| -> Result<Option<Symbol>, CoreError> {
            match raw.map(str::trim) {
                None | Some("") => Ok(None),
                Some(value) => Symbol::new(value).map(Some),
            }
        };
        let captain = optional(parts.next())?;
        let vice_captain = optional(parts.next())?;

        if parts.next().is_some() {
            return Err(CoreError::InvalidInput(
                "pick slot".to_string(),
                format!("expected SYMBOLS[:CAPTAIN[:VICE]], got '{}'", s),
            ));
        }

        Ok(Self::new(symbols, captain, vice_captain))
    }
}

/// A validated pick set for a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPick {
    pub user_id: UserId,
    pub symbols: Vec<Symbol>,
    pub captain: Option<Symbol>,
    pub vice_captain: Option<Symbol>,
}

impl UserPick {
    /// Resolves the role of a symbol. Captain wins if a symbol were somehow both.
    pub fn role_of(&self, symbol: &Symbol) -> Role {
        if self.captain.as_ref() == Some(symbol) {
            Role::Captain
        } else if self.vice_captain.as_ref() == Some(symbol) {
            Role::ViceCaptain
        } else {
            Role::Regular
        }
    }
}
