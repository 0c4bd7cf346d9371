//! Month-name resolution.
//!
//! Requests name the month they want by its English name in any casing
//! (`"march"`, `"March"`, `"MARCH"`). Resolution upper-cases the first
//! character, lower-cases the rest and looks the result up in
//! [`MONTH_NAMES`](crate::config::MONTH_NAMES). There is no fuzzy matching.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::MONTH_NAMES;
use crate::error::{InsightsError, Result};

/// A calendar month, 1 (January) through 12 (December).
///
/// Matching by `Month` ignores the year: March 2021 and March 2023 are the
/// same month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Month(u32);

impl Month {
    /// Build a month from its 1-based index.
    pub fn new(index: u32) -> Result<Self> {
        if (1..=12).contains(&index) {
            Ok(Self(index))
        } else {
            Err(InsightsError::InvalidMonth(index.to_string()))
        }
    }

    /// Resolve a raw request token.
    ///
    /// `None` and `""` fail with [`InsightsError::MissingMonth`]; anything
    /// that does not normalize to a month name fails with
    /// [`InsightsError::InvalidMonth`].
    pub fn resolve(token: Option<&str>) -> Result<Self> {
        match token {
            None | Some("") => Err(InsightsError::MissingMonth),
            Some(raw) => raw.parse(),
        }
    }

    /// The 1-based month index.
    pub fn index(self) -> u32 {
        self.0
    }

    /// The canonical English name, e.g. `"March"`.
    pub fn name(self) -> &'static str {
        MONTH_NAMES[(self.0 - 1) as usize]
    }
}

impl FromStr for Month {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = normalize(s);
        MONTH_NAMES
            .iter()
            .position(|name| *name == normalized)
            .map(|pos| Self(pos as u32 + 1))
            .ok_or_else(|| InsightsError::InvalidMonth(s.to_string()))
    }
}

impl TryFrom<u32> for Month {
    type Error = InsightsError;

    fn try_from(index: u32) -> Result<Self> {
        Self::new(index)
    }
}

impl From<Month> for u32 {
    fn from(month: Month) -> u32 {
        month.0
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn normalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.as_str().to_lowercase();
            first.to_uppercase().chain(rest.chars()).collect()
        }
        None => String::new(),
    }
}
