//! Interest rate table keyed by debt type.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{CapstackError, CapstackResult};
use crate::types::DebtType;

/// Periodic interest rate per debt type, in declaration order.
///
/// Rates are decimals (0.05 = 5% per period). Declaration order is kept
/// because it fixes the position of each tranche in the optimizer's
/// candidate vector; it serializes as a JSON/YAML map in that same order.
///
/// # Example
///
/// ```rust
/// use capstack_core::types::RateTable;
///
/// let rates = RateTable::from_pairs([("senior", 0.05), ("mezzanine", 0.10)]).unwrap();
/// assert_eq!(rates.rate("mezzanine").unwrap(), 0.10);
/// let order: Vec<_> = rates.debt_types().map(|d| d.as_str()).collect();
/// assert_eq!(order, ["senior", "mezzanine"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    entries: Vec<(DebtType, f64)>,
}

impl RateTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(identifier, rate)` pairs in order.
    pub fn from_pairs<I, K>(pairs: I) -> CapstackResult<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut table = Self::new();
        for (debt_type, rate) in pairs {
            table.insert(debt_type, rate)?;
        }
        Ok(table)
    }

    /// Appends a tranche.
    ///
    /// # Errors
    ///
    /// - [`CapstackError::InvalidDebtType`] for a blank identifier
    /// - [`CapstackError::DuplicateDebtType`] if the identifier is present
    /// - [`CapstackError::InvalidRate`] for a negative or non-finite rate;
    ///   zero is accepted
    pub fn insert(&mut self, debt_type: impl Into<String>, rate: f64) -> CapstackResult<()> {
        let debt_type = DebtType::new(debt_type)?;
        if self.contains(debt_type.as_str()) {
            return Err(CapstackError::duplicate_debt_type(debt_type.as_str()));
        }
        if !rate.is_finite() || rate < 0.0 {
            return Err(CapstackError::InvalidRate {
                debt_type: debt_type.to_string(),
                rate,
            });
        }
        self.entries.push((debt_type, rate));
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_rate(mut self, debt_type: impl Into<String>, rate: f64) -> CapstackResult<Self> {
        self.insert(debt_type, rate)?;
        Ok(self)
    }

    /// Looks up a rate, failing for unknown identifiers.
    pub fn rate(&self, debt_type: &str) -> CapstackResult<f64> {
        self.get(debt_type)
            .ok_or_else(|| CapstackError::unknown_debt_type(debt_type))
    }

    /// Looks up a rate.
    pub fn get(&self, debt_type: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(d, _)| d.as_str() == debt_type)
            .map(|&(_, rate)| rate)
    }

    /// Returns true if the identifier has a rate.
    pub fn contains(&self, debt_type: &str) -> bool {
        self.get(debt_type).is_some()
    }

    /// Identifiers in declaration order.
    pub fn debt_types(&self) -> impl Iterator<Item = &DebtType> + '_ {
        self.entries.iter().map(|(d, _)| d)
    }

    /// `(identifier, rate)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&DebtType, f64)> + '_ {
        self.entries.iter().map(|(d, r)| (d, *r))
    }

    /// Number of tranches.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no tranche is declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for RateTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (debt_type, rate) in &self.entries {
            map.serialize_entry(debt_type.as_str(), rate)?;
        }
        map.end()
    }
}

struct RateTableVisitor;

impl<'de> Visitor<'de> for RateTableVisitor {
    type Value = RateTable;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map from debt type to interest rate")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut table = RateTable::new();
        while let Some((debt_type, rate)) = access.next_entry::<String, f64>()? {
            table
                .insert(debt_type, rate)
                .map_err(serde::de::Error::custom)?;
        }
        Ok(table)
    }
}

impl<'de> Deserialize<'de> for RateTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RateTableVisitor)
    }
}
