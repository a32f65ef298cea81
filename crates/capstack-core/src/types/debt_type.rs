//! Debt-type identifier.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::error::{CapstackError, CapstackResult};

/// Identifier of a debt tranche, such as `senior` or `mezzanine`.
///
/// Identifiers are non-blank strings compared exactly (case-sensitive).
///
/// # Example
///
/// ```rust
/// use capstack_core::types::DebtType;
///
/// let senior = DebtType::new("senior").unwrap();
/// assert_eq!(senior.as_str(), "senior");
/// assert!(DebtType::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DebtType(String);

impl DebtType {
    /// Creates an identifier, rejecting empty or whitespace-only names.
    pub fn new(id: impl Into<String>) -> CapstackResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CapstackError::InvalidDebtType { debt_type: id });
        }
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DebtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DebtType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for DebtType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for DebtType {
    type Err = CapstackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DebtType {
    type Error = CapstackError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DebtType> for String {
    fn from(value: DebtType) -> Self {
        value.0
    }
}
