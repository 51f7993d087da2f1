//! Unit types that can be placed on the board.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raised when a unit type code is not one of `A`, `F` or `G`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid unit type '{0}' (expected A, F or G)")]
pub struct InvalidUnitType(pub String);

/// Kind of military unit.
///
/// Serialized with the one-letter codes used by scenario documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum UnitType {
    Army,
    Fleet,
    Garrison,
}

impl UnitType {
    pub const ALL: [Self; 3] = [Self::Army, Self::Fleet, Self::Garrison];

    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Army => 'A',
            Self::Fleet => 'F',
            Self::Garrison => 'G',
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Army => "Army",
            Self::Fleet => "Fleet",
            Self::Garrison => "Garrison",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<char> for UnitType {
    type Error = InvalidUnitType;

    fn try_from(code: char) -> Result<Self, Self::Error> {
        match code {
            'A' => Ok(Self::Army),
            'F' => Ok(Self::Fleet),
            'G' => Ok(Self::Garrison),
            other => Err(InvalidUnitType(other.to_string())),
        }
    }
}

impl FromStr for UnitType {
    type Err = InvalidUnitType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => Self::try_from(code),
            _ => Err(InvalidUnitType(s.to_string())),
        }
    }
}

impl TryFrom<String> for UnitType {
    type Error = InvalidUnitType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UnitType> for String {
    fn from(value: UnitType) -> Self {
        value.code().to_string()
    }
}
