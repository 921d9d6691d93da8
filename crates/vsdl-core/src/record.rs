//! # Subject Records
//!
//! A [`Record`] is the ordered name→value mapping a custodial server holds
//! for one subject. Field names are opaque strings to everything downstream:
//! the commitment engine never interprets them, so no schema polymorphism is
//! needed — two subjects may carry entirely different field sets.
//!
//! ## Invariants
//!
//! - Field names are non-empty and unique within a record.
//! - Insertion order is preserved; commitment construction iterates fields
//!   in this order.
//! - A record is never mutated once handed to the delegation protocol; the
//!   server snapshots it at issuance.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A single named value inside a subject record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name, non-empty and unique within its record.
    pub name: String,
    /// Field value, an opaque string.
    pub value: String,
}

/// An ordered collection of uniquely-named fields.
///
/// The only constructor is [`Record::new`], which enforces the name
/// invariants; deserialization routes through it as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    fields: Vec<Field>,
}

impl Record {
    /// Build a record from `(name, value)` pairs, preserving order.
    pub fn new<N, V>(pairs: impl IntoIterator<Item = (N, V)>) -> Result<Self, ValidationError>
    where
        N: Into<String>,
        V: Into<String>,
    {
        let mut fields = Vec::new();
        let mut seen = BTreeSet::new();
        for (name, value) in pairs {
            let name = name.into();
            if name.is_empty() {
                return Err(ValidationError::EmptyFieldName);
            }
            if !seen.insert(name.clone()) {
                return Err(ValidationError::DuplicateFieldName(name));
            }
            fields.push(Field {
                name,
                value: value.into(),
            });
        }
        Ok(Self { fields })
    }

    /// Iterate fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Look up a field value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// The set of field names in this record.
    pub fn names(&self) -> BTreeSet<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wire {
            fields: Vec<Field>,
        }
        let wire = Wire::deserialize(deserializer)?;
        Record::new(wire.fields.into_iter().map(|f| (f.name, f.value)))
            .map_err(serde::de::Error::custom)
    }
}
