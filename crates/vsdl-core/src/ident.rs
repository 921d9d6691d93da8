//! # Identifier Newtypes
//!
//! Domain-primitive newtypes for identifiers throughout the delegation
//! stack. Each identifier is a distinct type — you cannot pass a
//! [`RecordId`] where a [`PolicyId`] is expected.
//!
//! ## Validation
//!
//! [`RecordId`] and [`PolicyId`] are catalog keys: non-empty, at most 128
//! characters, drawn from `[A-Za-z0-9._-]`. [`TokenId`] is always 32
//! lowercase hex characters (a 128-bit value); fresh ones come from the OS
//! randomness source via [`TokenId::random`].

use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const MAX_IDENT_LEN: usize = 128;

/// Helper macro to implement `Deserialize` for string newtypes that must
/// validate their contents. Deserializes as a plain `String`, then routes
/// through the type's `new()` constructor so that invalid values are
/// rejected at deserialization time — not silently accepted.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

fn validate_catalog_ident(kind: &'static str, raw: &str) -> Result<(), ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::EmptyIdentifier { kind });
    }
    if raw.len() > MAX_IDENT_LEN {
        return Err(ValidationError::IdentifierTooLong {
            kind,
            max: MAX_IDENT_LEN,
            len: raw.len(),
        });
    }
    if let Some(ch) = raw
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(ValidationError::InvalidIdentifierChar { kind, ch });
    }
    Ok(())
}

/// Identifier of a subject record held by the custodial server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RecordId(String);

impl RecordId {
    /// Validate and wrap a record identifier.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        validate_catalog_ident("record", &raw)?;
        Ok(Self(raw))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RecordId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl_validating_deserialize!(RecordId);

/// Identifier of a policy in the policy catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PolicyId(String);

impl PolicyId {
    /// Validate and wrap a policy identifier.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        validate_catalog_ident("policy", &raw)?;
        Ok(Self(raw))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PolicyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PolicyId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl_validating_deserialize!(PolicyId);

/// Identifier of an issued delegation token (the JWT `jti` claim).
///
/// Always a 128-bit value rendered as 32 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TokenId(String);

impl TokenId {
    /// Validate and wrap an existing token identifier.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if raw.len() != 32 || !raw.chars().all(|c| c.is_ascii_hexdigit() && !c.is_uppercase()) {
            return Err(ValidationError::InvalidTokenId(raw));
        }
        Ok(Self(raw))
    }

    /// Allocate a fresh random token identifier from the OS randomness
    /// source. Randomness failure is surfaced, never papered over.
    pub fn random() -> Result<Self, ValidationError> {
        let mut bytes = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| ValidationError::Randomness(e.to_string()))?;
        Ok(Self(hex::encode(bytes)))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl_validating_deserialize!(TokenId);
