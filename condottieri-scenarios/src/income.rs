//! Random income tables: ducats earned per die face.
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::{DIE_FACES, DIE_SIDES, INCOME_ENTRY_MAX, INCOME_LIST_PATTERN};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IncomeError {
    #[error("die face {0} is outside 1-6")]
    InvalidDie(u8),
    #[error("income list '{0}' must have 6 comma separated numbers")]
    MalformedIncomeList(String),
    #[error("doubling {0} ducats overflows")]
    DoubledIncomeOverflow(u32),
}

fn income_list_regex() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(INCOME_LIST_PATTERN).ok())
        .as_ref()
}

/// Six ducat amounts, one per die face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IncomeTable([u32; DIE_FACES]);

impl IncomeTable {
    #[must_use]
    pub const fn new(entries: [u32; DIE_FACES]) -> Self {
        Self(entries)
    }

    /// Parse a stored income list such as `"1, 2, 3, 4, 5, 6"`.
    ///
    /// Whitespace is ignored anywhere in the text.
    ///
    /// # Errors
    ///
    /// Returns [`IncomeError::MalformedIncomeList`] unless the text holds
    /// exactly six comma separated non-negative integers, each at most
    /// [`INCOME_ENTRY_MAX`].
    pub fn parse(text: &str) -> Result<Self, IncomeError> {
        let normalized: String = text.split_whitespace().collect();
        let malformed = || IncomeError::MalformedIncomeList(text.to_string());

        if !income_list_regex().is_some_and(|re| re.is_match(&normalized)) {
            return Err(malformed());
        }

        let mut entries = [0u32; DIE_FACES];
        for (slot, token) in entries.iter_mut().zip(normalized.split(',')) {
            *slot = token
                .parse()
                .ok()
                .filter(|ducats| *ducats <= INCOME_ENTRY_MAX)
                .ok_or_else(malformed)?;
        }
        Ok(Self(entries))
    }

    #[must_use]
    pub const fn entries(&self) -> &[u32; DIE_FACES] {
        &self.0
    }

    /// Ducats for a die face (1-6), doubled when `double` is set.
    ///
    /// # Errors
    ///
    /// Returns [`IncomeError::InvalidDie`] when `die` is outside 1-6 and
    /// [`IncomeError::DoubledIncomeOverflow`] when a table built with
    /// [`Self::new`] holds an entry too large to double.
    pub fn get_ducats(&self, die: u8, double: bool) -> Result<u32, IncomeError> {
        let index = usize::from(die)
            .checked_sub(1)
            .filter(|idx| *idx < DIE_FACES)
            .ok_or(IncomeError::InvalidDie(die))?;
        let ducats = self.0[index];
        if double {
            ducats
                .checked_mul(2)
                .ok_or(IncomeError::DoubledIncomeOverflow(ducats))
        } else {
            Ok(ducats)
        }
    }

    /// Roll a die and look up the income for the face rolled.
    ///
    /// Returns the face and the ducats earned.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_ducats`] for the face rolled.
    pub fn roll<R>(&self, rng: &mut R, double: bool) -> Result<(u8, u32), IncomeError>
    where
        R: Rng + ?Sized,
    {
        let die = rng.gen_range(1..=DIE_SIDES);
        Ok((die, self.get_ducats(die, double)?))
    }
}

impl fmt::Display for IncomeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, ducats) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{ducats}")?;
        }
        Ok(())
    }
}

impl FromStr for IncomeTable {
    type Err = IncomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for IncomeTable {
    type Error = IncomeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<IncomeTable> for String {
    fn from(value: IncomeTable) -> Self {
        value.to_string()
    }
}
