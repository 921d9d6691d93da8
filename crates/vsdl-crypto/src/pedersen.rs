//! # Pedersen Commitments over Records
//!
//! Builds the commitment objects the delegation protocol exchanges: one
//! Pedersen commitment per record field, their sum as the whole-record
//! commitment, and the subset sums that let a verifier relate the visible
//! and hidden halves of a partition back to the record commitment.
//!
//! ## Field message encoding
//!
//! The committed message scalar for a field is the hash of
//! `len(name) ∥ name ∥ len(value) ∥ value` (64-bit little-endian lengths)
//! under a fixed domain label. Length prefixes make the encoding injective:
//! a value that happens to contain a separator sequence cannot collide with
//! a different `(name, value)` pair.
//!
//! ## Homomorphism
//!
//! `C_i = g·m_i + h·r_i`, so for any split of a record's fields into sets
//! `A` and `B`, the subset sums satisfy `C_A + C_B = C_record`. That
//! identity is the entire verification story: a delegate recomputes the
//! visible half from disclosed openings, receives the hidden half as a
//! single opaque point, and checks the sum.

use std::collections::BTreeMap;

use vsdl_core::Record;

use crate::error::CryptoError;
use crate::group::{generator_g, generator_h, hash_to_scalar, random_scalar, Point, Scalar};

/// Domain label for field message hashing.
const FIELD_DOMAIN: &str = "vsdl/field/v1";

/// A Pedersen commitment to one named field, together with the opening the
/// server keeps until dispensing.
///
/// The blinding scalar stays server-side; it is disclosed only for fields
/// the active policy marks visible.
#[derive(Debug, Clone)]
pub struct FieldCommitment {
    /// Field name.
    pub name: String,
    /// Field value.
    pub value: String,
    /// Blinding scalar `r`.
    pub blinding: Scalar,
    /// The commitment point `g·m + h·r`.
    pub point: Point,
}

impl FieldCommitment {
    /// Whether the stored `(name, value, blinding)` reproduces `point`.
    pub fn reproduces(&self) -> bool {
        commitment_point(&self.name, &self.value, self.blinding).ct_eq(&self.point)
    }
}

/// A committed record: the sum commitment plus per-field commitments keyed
/// by field name.
#[derive(Debug, Clone)]
pub struct CommittedRecord {
    /// `C_record = Σ C_i` over all fields, in record order.
    pub commitment: Point,
    /// Per-field commitments, keyed by field name.
    pub fields: BTreeMap<String, FieldCommitment>,
}

/// Hash a field's `(name, value)` pair to the committed message scalar.
pub fn field_message_scalar(name: &str, value: &str) -> Scalar {
    let mut buf = Vec::with_capacity(16 + name.len() + value.len());
    buf.extend_from_slice(&(name.len() as u64).to_le_bytes());
    buf.extend_from_slice(name.as_bytes());
    buf.extend_from_slice(&(value.len() as u64).to_le_bytes());
    buf.extend_from_slice(value.as_bytes());
    hash_to_scalar(FIELD_DOMAIN, &buf)
}

fn commitment_point(name: &str, value: &str, blinding: Scalar) -> Point {
    generator_g() * field_message_scalar(name, value) + generator_h() * blinding
}

/// Commit to a single field. When `blinding` is `None` a fresh scalar is
/// sampled from the OS randomness source.
pub fn commit_field(
    name: &str,
    value: &str,
    blinding: Option<Scalar>,
) -> Result<FieldCommitment, CryptoError> {
    let blinding = match blinding {
        Some(r) => r,
        None => random_scalar()?,
    };
    Ok(FieldCommitment {
        name: name.to_string(),
        value: value.to_string(),
        blinding,
        point: commitment_point(name, value, blinding),
    })
}

/// Commit to every field of a record with fresh blindings, in record order,
/// and sum the per-field commitments into the record commitment.
///
/// An empty record commits to the group identity.
pub fn commit_record(record: &Record) -> Result<CommittedRecord, CryptoError> {
    let mut fields = BTreeMap::new();
    let mut commitment = Point::identity();
    for field in record.fields() {
        let fc = commit_field(&field.name, &field.value, None)?;
        commitment = commitment + fc.point;
        fields.insert(field.name.clone(), fc);
    }
    Ok(CommittedRecord { commitment, fields })
}

/// Sum the commitments of the named fields. Names absent from the map are
/// skipped; an empty selection sums to the identity.
pub fn subset_commitment<'a>(
    fields: &BTreeMap<String, FieldCommitment>,
    names: impl IntoIterator<Item = &'a str>,
) -> Point {
    names
        .into_iter()
        .filter_map(|name| fields.get(name))
        .map(|fc| fc.point)
        .sum()
}

/// The partition equation: `C_record == C_hidden + C_visible`, compared in
/// constant time.
pub fn verify_partition(record: Point, hidden: Point, visible: Point) -> bool {
    record.ct_eq(&(hidden + visible))
}

/// Recompute the visible-subset commitment from disclosed openings.
///
/// Each opening contributes `g·H(name, value) + h·r`; no openings sum to
/// the identity.
pub fn recompute_from_openings<'a>(
    openings: impl IntoIterator<Item = (&'a str, &'a str, Scalar)>,
) -> Point {
    openings
        .into_iter()
        .map(|(name, value, blinding)| commitment_point(name, value, blinding))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_record() -> Record {
        Record::new([
            ("name", "Jane Haq"),
            ("nationalId", "35202-1234567-8"),
            ("dateOfBirth", "1987-04-12"),
            ("address", "14 Canal Road, Lahore"),
            ("income", "2400000"),
        ])
        .unwrap()
    }

    #[test]
    fn field_commitment_reproduces_from_opening() {
        let fc = commit_field("name", "Jane Haq", None).unwrap();
        assert!(fc.reproduces());

        let expected =
            generator_g() * field_message_scalar("name", "Jane Haq") + generator_h() * fc.blinding;
        assert_eq!(fc.point, expected);
    }

    #[test]
    fn explicit_blinding_is_honored() {
        let r = random_scalar().unwrap();
        let a = commit_field("k", "v", Some(r)).unwrap();
        let b = commit_field("k", "v", Some(r)).unwrap();
        assert_eq!(a.point, b.point);
    }

    #[test]
    fn fresh_blindings_hide_equal_values() {
        let a = commit_field("k", "v", None).unwrap();
        let b = commit_field("k", "v", None).unwrap();
        assert_ne!(a.point, b.point);
    }

    #[test]
    fn record_commitment_is_sum_of_field_commitments() {
        let committed = commit_record(&reference_record()).unwrap();
        let total: Point = committed.fields.values().map(|fc| fc.point).sum();
        assert_eq!(total, committed.commitment);
    }

    #[test]
    fn empty_record_commits_to_identity() {
        let record = Record::new(Vec::<(String, String)>::new()).unwrap();
        let committed = commit_record(&record).unwrap();
        assert_eq!(committed.commitment, Point::identity());
        assert!(committed.fields.is_empty());
    }

    #[test]
    fn committing_twice_differs() {
        let record = reference_record();
        let a = commit_record(&record).unwrap();
        let b = commit_record(&record).unwrap();
        assert_ne!(a.commitment, b.commitment);
    }

    #[test]
    fn any_partition_sums_to_record_commitment() {
        let committed = commit_record(&reference_record()).unwrap();
        let names: Vec<String> = committed.fields.keys().cloned().collect();
        // Try every split point of the sorted name list.
        for split in 0..=names.len() {
            let (a, b) = names.split_at(split);
            let ca = subset_commitment(&committed.fields, a.iter().map(String::as_str));
            let cb = subset_commitment(&committed.fields, b.iter().map(String::as_str));
            assert_eq!(ca + cb, committed.commitment, "split at {split}");
            assert!(verify_partition(committed.commitment, ca, cb));
        }
    }

    #[test]
    fn subset_commitment_skips_unknown_names() {
        let committed = commit_record(&reference_record()).unwrap();
        let with_unknown =
            subset_commitment(&committed.fields, ["name", "noSuchField"].into_iter());
        let without = subset_commitment(&committed.fields, ["name"].into_iter());
        assert_eq!(with_unknown, without);
    }

    #[test]
    fn empty_subset_is_identity() {
        let committed = commit_record(&reference_record()).unwrap();
        assert_eq!(
            subset_commitment(&committed.fields, std::iter::empty()),
            Point::identity()
        );
    }

    #[test]
    fn recompute_matches_subset_commitment() {
        let committed = commit_record(&reference_record()).unwrap();
        let visible = ["name", "address"];
        let openings: Vec<(&str, &str, Scalar)> = visible
            .iter()
            .map(|n| {
                let fc = &committed.fields[*n];
                (fc.name.as_str(), fc.value.as_str(), fc.blinding)
            })
            .collect();
        let recomputed = recompute_from_openings(openings);
        let direct = subset_commitment(&committed.fields, visible.into_iter());
        assert_eq!(recomputed, direct);
    }

    #[test]
    fn honest_partition_verifies() {
        let committed = commit_record(&reference_record()).unwrap();
        let visible = ["name", "nationalId"];
        let hidden = ["dateOfBirth", "address", "income"];
        let c_hidden = subset_commitment(&committed.fields, hidden.into_iter());
        let openings: Vec<(&str, &str, Scalar)> = visible
            .iter()
            .map(|n| {
                let fc = &committed.fields[*n];
                (fc.name.as_str(), fc.value.as_str(), fc.blinding)
            })
            .collect();
        let c_visible = recompute_from_openings(openings);
        assert!(verify_partition(committed.commitment, c_hidden, c_visible));
    }

    #[test]
    fn tampered_value_fails_partition() {
        let committed = commit_record(&reference_record()).unwrap();
        let c_hidden = subset_commitment(
            &committed.fields,
            ["dateOfBirth", "address", "income"].into_iter(),
        );
        let name_fc = &committed.fields["name"];
        let id_fc = &committed.fields["nationalId"];
        let c_visible = recompute_from_openings([
            ("name", "Someone Else", name_fc.blinding),
            (id_fc.name.as_str(), id_fc.value.as_str(), id_fc.blinding),
        ]);
        assert!(!verify_partition(committed.commitment, c_hidden, c_visible));
    }

    #[test]
    fn substituted_blinding_fails_partition() {
        let committed = commit_record(&reference_record()).unwrap();
        let c_hidden = subset_commitment(
            &committed.fields,
            ["dateOfBirth", "address", "income"].into_iter(),
        );
        let name_fc = &committed.fields["name"];
        let id_fc = &committed.fields["nationalId"];
        let wrong = random_scalar().unwrap();
        let c_visible = recompute_from_openings([
            (name_fc.name.as_str(), name_fc.value.as_str(), name_fc.blinding),
            (id_fc.name.as_str(), id_fc.value.as_str(), wrong),
        ]);
        assert!(!verify_partition(committed.commitment, c_hidden, c_visible));
    }

    #[test]
    fn omitted_opening_fails_partition() {
        let committed = commit_record(&reference_record()).unwrap();
        let c_hidden = subset_commitment(
            &committed.fields,
            ["dateOfBirth", "address", "income"].into_iter(),
        );
        let name_fc = &committed.fields["name"];
        let c_visible = recompute_from_openings([(
            name_fc.name.as_str(),
            name_fc.value.as_str(),
            name_fc.blinding,
        )]);
        assert!(!verify_partition(committed.commitment, c_hidden, c_visible));
    }

    #[test]
    fn separator_sequences_in_values_cannot_collide() {
        // Under naive `name || "||" || value` concatenation these two pairs
        // would hash identically; length prefixes keep them apart.
        let a = field_message_scalar("a", "||b");
        let b = field_message_scalar("a||", "b");
        assert_ne!(a, b);

        let c = field_message_scalar("x", "y||z");
        let d = field_message_scalar("x||y", "z");
        assert_ne!(c, d);
    }

    #[test]
    fn message_scalar_separates_name_and_value() {
        assert_ne!(
            field_message_scalar("ab", "c"),
            field_message_scalar("a", "bc")
        );
    }
}
