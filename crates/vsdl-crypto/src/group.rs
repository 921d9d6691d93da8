//! # Group Primitives over ristretto255
//!
//! Wraps the ristretto255 prime-order group behind two distinct types,
//! [`Scalar`] and [`Point`], so that scalars and group elements cannot be
//! mixed and raw curve types never leak into the rest of the workspace.
//!
//! ## The generator pair
//!
//! Commitments use two generators: `g`, the standard Ristretto basepoint,
//! and `h`, derived once by hashing a fixed domain-separated seed to 64
//! uniform bytes and mapping them to the curve with the Elligator-based
//! uniform map. Nobody — including the party that runs setup — learns
//! `log_g h`, which is what makes the commitments binding. Deriving `h` as
//! `g` times a hashed scalar would hand that discrete log to anyone who can
//! read the seed.
//!
//! ## Encodings
//!
//! Points encode to the 32-byte compressed Ristretto form, scalars to their
//! canonical 32-byte form; both travel as lowercase hex on the wire and
//! reject non-canonical input on decode. Scalar arithmetic and point
//! equality are constant-time; encoding is not.

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::traits::Identity;
use once_cell::sync::Lazy;
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::error::CryptoError;

/// Name of the group parameter, reported by diagnostics endpoints.
pub const GROUP_NAME: &str = "ristretto255";

/// Domain-separated seed for the second generator.
const H_SEED: &[u8] = b"VSDL_GENERATOR_H_SEED_V1";

static GENERATOR_H: Lazy<RistrettoPoint> = Lazy::new(|| {
    let digest = Sha512::digest(H_SEED);
    let mut wide = [0u8; 64];
    wide.copy_from_slice(&digest);
    let h = RistrettoPoint::from_uniform_bytes(&wide);
    wide.zeroize();
    h
});

/// An integer modulo the ristretto255 group order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scalar(curve25519_dalek::Scalar);

impl Scalar {
    /// The zero scalar.
    pub fn zero() -> Self {
        Self(curve25519_dalek::Scalar::ZERO)
    }

    /// Canonical 32-byte encoding.
    pub fn to_bytes(self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Lowercase hex of the canonical encoding.
    pub fn to_hex(self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Decode a canonical 32-byte scalar. Non-reduced input is rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::MalformedScalar(format!("expected 32 bytes, got {}", bytes.len())))?;
        Option::from(curve25519_dalek::Scalar::from_canonical_bytes(arr))
            .map(Self)
            .ok_or_else(|| CryptoError::MalformedScalar("not reduced mod the group order".into()))
    }

    /// Decode from lowercase hex.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(s).map_err(|e| CryptoError::HexDecode(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl std::ops::Add for Scalar {
    type Output = Scalar;

    fn add(self, rhs: Scalar) -> Scalar {
        Scalar(self.0 + rhs.0)
    }
}

impl std::iter::Sum for Scalar {
    fn sum<I: Iterator<Item = Scalar>>(iter: I) -> Scalar {
        iter.fold(Scalar::zero(), |acc, s| acc + s)
    }
}

impl Serialize for Scalar {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// An element of the ristretto255 group.
#[derive(Debug, Clone, Copy)]
pub struct Point(RistrettoPoint);

impl Point {
    /// The group identity (the sum of zero commitments).
    pub fn identity() -> Self {
        Self(RistrettoPoint::identity())
    }

    /// Constant-time equality.
    pub fn ct_eq(&self, other: &Point) -> bool {
        bool::from(self.0.ct_eq(&other.0))
    }

    /// Compressed 32-byte encoding.
    pub fn to_bytes(self) -> [u8; 32] {
        self.0.compress().to_bytes()
    }

    /// Lowercase hex of the compressed encoding.
    pub fn to_hex(self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Decode a compressed 32-byte group element. Non-canonical encodings
    /// are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let compressed = CompressedRistretto::from_slice(bytes)
            .map_err(|_| CryptoError::MalformedPoint(format!("expected 32 bytes, got {}", bytes.len())))?;
        compressed
            .decompress()
            .map(Self)
            .ok_or_else(|| CryptoError::MalformedPoint("not a canonical group element".into()))
    }

    /// Decode from lowercase hex.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(s).map_err(|e| CryptoError::HexDecode(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other)
    }
}

impl Eq for Point {}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point(self.0 + rhs.0)
    }
}

impl std::ops::Mul<Scalar> for Point {
    type Output = Point;

    fn mul(self, rhs: Scalar) -> Point {
        Point(self.0 * rhs.0)
    }
}

impl std::iter::Sum for Point {
    fn sum<I: Iterator<Item = Point>>(iter: I) -> Point {
        iter.fold(Point::identity(), |acc, p| acc + p)
    }
}

impl Serialize for Point {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Point {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// The standard basepoint `g`.
pub fn generator_g() -> Point {
    Point(RISTRETTO_BASEPOINT_POINT)
}

/// The second generator `h`, with `log_g h` unknown to every party.
pub fn generator_h() -> Point {
    Point(*GENERATOR_H)
}

/// Sample a uniform scalar from the OS randomness source.
///
/// Uses a 64-byte wide reduction so the result is unbiased. The
/// intermediate buffer is zeroed before returning: sampled scalars blind
/// hidden field values and must not linger on the stack.
pub fn random_scalar() -> Result<Scalar, CryptoError> {
    let mut wide = [0u8; 64];
    OsRng
        .try_fill_bytes(&mut wide)
        .map_err(|e| CryptoError::Randomness(e.to_string()))?;
    let scalar = curve25519_dalek::Scalar::from_bytes_mod_order_wide(&wide);
    wide.zeroize();
    Ok(Scalar(scalar))
}

/// Hash arbitrary bytes to a uniform scalar under a domain label.
///
/// SHA-512 over `label ∥ data`, reduced with the 64-byte wide reduction.
pub fn hash_to_scalar(label: &str, data: &[u8]) -> Scalar {
    let mut hasher = Sha512::new();
    hasher.update(label.as_bytes());
    hasher.update(data);
    let digest = hasher.finalize();
    let mut wide = [0u8; 64];
    wide.copy_from_slice(&digest);
    Scalar(curve25519_dalek::Scalar::from_bytes_mod_order_wide(&wide))
}
