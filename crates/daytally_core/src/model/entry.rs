//! Entry domain model.
//!
//! # Responsibility
//! - Define the principal identity, the tracked value, and the per-day entry.
//! - Parse raw user-submitted values into validated `EntryValue`s.
//!
//! # Invariants
//! - `EntryValue` is an integer in `1..=9999`.
//! - At most one `Entry` exists per `(principal, date)`; the store enforces it.

use crate::model::date::DateKey;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque identity of the authenticated user.
///
/// Resolved by the authentication layer; the core never inspects it beyond
/// scoping storage access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(i64);

impl Principal {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> i64 {
        self.0
    }
}

impl Display for Principal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Smallest storable value.
pub const MIN_VALUE: i64 = 1;
/// Largest storable value.
pub const MAX_VALUE: i64 = 9999;

/// Rejection reasons for a submitted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueValidationError {
    /// Input could not be read as a number.
    NotANumber(String),
    /// Input is numeric but fractional or outside `1..=9999`.
    OutOfRange(String),
}

impl Display for ValueValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotANumber(raw) => write!(f, "value `{raw}` is not a number"),
            Self::OutOfRange(raw) => write!(
                f,
                "value `{raw}` must be a whole number between {MIN_VALUE} and {MAX_VALUE}"
            ),
        }
    }
}

impl Error for ValueValidationError {}

/// Validated daily value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct EntryValue(u16);

impl EntryValue {
    /// Validates an integer value.
    pub fn new(value: i64) -> Result<Self, ValueValidationError> {
        if !(MIN_VALUE..=MAX_VALUE).contains(&value) {
            return Err(ValueValidationError::OutOfRange(value.to_string()));
        }
        Ok(Self(value as u16))
    }

    /// Parses raw form input.
    ///
    /// Accepts any decimal number notation (`"5"`, `" 5 "`, `"5.0"`, `"5e0"`)
    /// as long as it denotes a whole number in range.
    ///
    /// # Errors
    /// - `NotANumber` when the trimmed text is empty, not numeric, or an
    ///   infinity spelling other than `Infinity` (`inf`, `infinity`, ...).
    /// - `OutOfRange` when the number is fractional, infinite, or outside
    ///   `1..=9999`.
    pub fn parse(raw: &str) -> Result<Self, ValueValidationError> {
        let trimmed = raw.trim();
        let number = match trimmed.parse::<f64>() {
            Ok(number) if !number.is_nan() && !is_lenient_infinity(trimmed) => number,
            _ => return Err(ValueValidationError::NotANumber(trimmed.to_string())),
        };

        if !number.is_finite()
            || number.fract() != 0.0
            || number < MIN_VALUE as f64
            || number > MAX_VALUE as f64
        {
            return Err(ValueValidationError::OutOfRange(trimmed.to_string()));
        }

        Self::new(number as i64)
    }

    pub fn get(&self) -> i64 {
        i64::from(self.0)
    }
}

/// Float parsing accepts `inf`/`infinity` in any case; only the exact
/// `Infinity` spelling (optionally signed) counts as a number.
fn is_lenient_infinity(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    (unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity"))
        && unsigned != "Infinity"
}

impl Display for EntryValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for EntryValue {
    type Error = ValueValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntryValue> for i64 {
    fn from(value: EntryValue) -> Self {
        value.get()
    }
}

/// One stored value for one principal on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub date: DateKey,
    pub principal: Principal,
    pub value: EntryValue,
}

impl Entry {
    pub fn new(principal: Principal, date: DateKey, value: EntryValue) -> Self {
        Self {
            date,
            principal,
            value,
        }
    }
}
