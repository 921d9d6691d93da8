//! # Server State
//!
//! All custodial-server state lives in one explicit [`ServerState`] value
//! injected into every operation and handler — no process globals. The
//! state holds the token-signing secret, the record store, the policy
//! catalog, and the map of issued delegations.
//!
//! Cheaply cloneable via `Arc` — all clones share the same data.
//!
//! ## Token map discipline
//!
//! Entries are inserted at issuance and never mutated afterwards; the
//! insert happens-before any dispense that finds the entry. Expired entries
//! are reclaimed by [`ServerState::purge_expired`], which issuance runs
//! opportunistically.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rand_core::{OsRng, RngCore};
use zeroize::Zeroize;

use vsdl_core::{Policy, PolicyId, Record, RecordId, TokenId};
use vsdl_crypto::{CryptoError, FieldCommitment, Point};

/// The HMAC secret that signs delegation tokens.
///
/// Never serialized, never printed: `Debug` is redacted and the bytes are
/// zeroed on drop.
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Generate a fresh 256-bit secret from the OS randomness source.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut bytes = vec![0u8; 32];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CryptoError::Randomness(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Load a secret from its hex encoding.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(s).map_err(|e| CryptoError::HexDecode(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Access the raw secret bytes for signing.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Drop for SigningSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningSecret(<private>)")
    }
}

/// Server configuration, read from the environment at construction time.
pub struct ServerConfig {
    /// Prefix for delegation URLs handed to owners.
    pub base_url: String,
    /// Token-signing secret.
    pub secret: SigningSecret,
}

impl ServerConfig {
    /// Build a configuration from `VSDL_BASE_URL` and
    /// `VSDL_TOKEN_SECRET_HEX`. When no secret is configured an ephemeral
    /// one is generated: every token dies with the process, which is fine
    /// for demos and wrong for anything else, so it is logged loudly.
    pub fn from_env() -> Result<Self, CryptoError> {
        let base_url = std::env::var("VSDL_BASE_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "http://localhost:8080".to_string());
        let secret = match std::env::var("VSDL_TOKEN_SECRET_HEX")
            .ok()
            .filter(|s| !s.is_empty())
        {
            Some(hex_secret) => SigningSecret::from_hex(&hex_secret)?,
            None => {
                tracing::warn!(
                    "VSDL_TOKEN_SECRET_HEX not set — generated an ephemeral signing secret; \
                     issued tokens will not survive a restart"
                );
                SigningSecret::generate()?
            }
        };
        Ok(Self { base_url, secret })
    }

    /// Configuration with an ephemeral secret, for demos and tests.
    pub fn ephemeral() -> Result<Self, CryptoError> {
        Ok(Self {
            base_url: "http://localhost:8080".to_string(),
            secret: SigningSecret::generate()?,
        })
    }
}

/// Everything the server retains about one issued delegation.
///
/// The snapshot is immutable for the token's lifetime; the blinding scalars
/// inside `fields` are the only place hidden-field randomness exists.
pub struct IssuedDelegation {
    /// The record as it stood at issuance.
    pub record: Record,
    /// The policy the token was issued under, snapshotted.
    pub policy: Policy,
    /// Per-field commitments with their blindings, keyed by field name.
    pub fields: BTreeMap<String, FieldCommitment>,
    /// The record commitment bound into the signed token.
    pub commitment: Point,
    /// When the delegation was issued.
    pub created_at: DateTime<Utc>,
    /// Absolute expiry, seconds since the Unix epoch.
    pub expires_at: i64,
}

/// Inner storage holding all stores.
struct Inner {
    secret: SigningSecret,
    base_url: String,
    records: DashMap<RecordId, Record>,
    policies: DashMap<PolicyId, Policy>,
    tokens: DashMap<TokenId, IssuedDelegation>,
}

/// Shared application state passed to all operations and route handlers.
#[derive(Clone)]
pub struct ServerState {
    inner: Arc<Inner>,
}

impl ServerState {
    /// Create a state with empty stores.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                secret: config.secret,
                base_url: config.base_url,
                records: DashMap::new(),
                policies: DashMap::new(),
                tokens: DashMap::new(),
            }),
        }
    }

    /// Create a state seeded with the reference record and policy catalog.
    pub fn with_seed_data(config: ServerConfig) -> Self {
        let state = Self::new(config);
        crate::seed::seed(&state);
        state
    }

    /// The token-signing secret bytes.
    pub fn secret(&self) -> &[u8] {
        self.inner.secret.as_bytes()
    }

    /// The delegation-URL prefix.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// The record store.
    pub fn records(&self) -> &DashMap<RecordId, Record> {
        &self.inner.records
    }

    /// The policy catalog.
    pub fn policies(&self) -> &DashMap<PolicyId, Policy> {
        &self.inner.policies
    }

    /// The map of issued delegations.
    pub fn tokens(&self) -> &DashMap<TokenId, IssuedDelegation> {
        &self.inner.tokens
    }

    /// Drop every delegation whose expiry has passed. Returns how many
    /// entries were reclaimed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now().timestamp();
        let before = self.inner.tokens.len();
        self.inner.tokens.retain(|_, issued| issued.expires_at > now);
        let purged = before - self.inner.tokens.len();
        if purged > 0 {
            tracing::debug!(purged, "reclaimed expired delegations");
        }
        purged
    }
}
