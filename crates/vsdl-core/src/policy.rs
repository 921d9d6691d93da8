//! # Disclosure Policies
//!
//! A [`Policy`] names a partition of a record's field names into a visible
//! set and a hidden set, plus the capability strings granted to the
//! delegate. The partition digest ([`Policy::partition_hash`]) is what binds
//! a delegation token to the exact visible/hidden split that was authorized.
//!
//! ## Determinism
//!
//! The digest input is one fixed canonical shape: a JSON object with the key
//! `visible` first and `hidden` second, each holding the sorted field names.
//! Both sets are `BTreeSet`s, so iteration order is the sorted order and the
//! digest is reproducible across processes. The full 64-character SHA-256
//! digest is kept; truncating it weakens the token binding.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ValidationError;
use crate::ident::PolicyId;
use crate::record::Record;

/// The full hex SHA-256 digest of a policy's canonical partition form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolicyHash(String);

impl PolicyHash {
    /// Access the 64-character hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PolicyHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named visible/hidden partition with delegate capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Policy {
    /// Catalog identifier.
    pub id: PolicyId,
    /// Human-readable label shown in catalog listings.
    pub label: String,
    /// Field names the delegate is authorized to see.
    pub visible: BTreeSet<String>,
    /// Field names withheld from the delegate.
    pub hidden: BTreeSet<String>,
    /// Capability strings granted alongside the disclosure.
    pub actions: Vec<String>,
}

/// The canonical digest input: `visible` before `hidden`, names sorted.
#[derive(Serialize)]
struct PartitionForm<'a> {
    visible: Vec<&'a str>,
    hidden: Vec<&'a str>,
}

impl Policy {
    /// Build a policy, enforcing that no field name appears in both sets.
    pub fn new(
        id: PolicyId,
        label: impl Into<String>,
        visible: impl IntoIterator<Item = String>,
        hidden: impl IntoIterator<Item = String>,
        actions: impl IntoIterator<Item = String>,
    ) -> Result<Self, ValidationError> {
        let visible: BTreeSet<String> = visible.into_iter().collect();
        let hidden: BTreeSet<String> = hidden.into_iter().collect();
        if let Some(name) = visible.intersection(&hidden).next() {
            return Err(ValidationError::OverlappingPartition {
                policy: id.to_string(),
                name: name.clone(),
            });
        }
        Ok(Self {
            id,
            label: label.into(),
            visible,
            hidden,
            actions: actions.into_iter().collect(),
        })
    }

    /// Compute the full SHA-256 digest of the canonical partition form.
    pub fn partition_hash(&self) -> PolicyHash {
        let form = PartitionForm {
            visible: self.visible.iter().map(String::as_str).collect(),
            hidden: self.hidden.iter().map(String::as_str).collect(),
        };
        // Serializing a struct with two Vec<&str> fields cannot fail.
        let canonical = serde_json::to_vec(&form).expect("partition form serializes");
        let digest = Sha256::digest(&canonical);
        PolicyHash(hex::encode(digest))
    }

    /// Visible field names that actually occur in `record`.
    pub fn visible_in(&self, record: &Record) -> BTreeSet<String> {
        let names = record.names();
        self.visible.intersection(&names).cloned().collect()
    }

    /// Hidden field names that actually occur in `record`.
    pub fn hidden_in(&self, record: &Record) -> BTreeSet<String> {
        let names = record.names();
        self.hidden.intersection(&names).cloned().collect()
    }

    /// Whether `visible ∪ hidden` covers every field of `record` exactly.
    ///
    /// A record field accounted for by neither set would let the partition
    /// equation hold while hiding that field from the audit, so dispensing
    /// against a non-covering policy is refused.
    pub fn covers(&self, record: &Record) -> bool {
        record
            .names()
            .iter()
            .all(|n| self.visible.contains(n) || self.hidden.contains(n))
    }
}

impl<'de> Deserialize<'de> for Policy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wire {
            id: PolicyId,
            label: String,
            visible: BTreeSet<String>,
            hidden: BTreeSet<String>,
            actions: Vec<String>,
        }
        let w = Wire::deserialize(deserializer)?;
        Policy::new(w.id, w.label, w.visible, w.hidden, w.actions)
            .map_err(serde::de::Error::custom)
    }
}
