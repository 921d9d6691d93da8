//! # Seed Data
//!
//! The reference record and policy catalog the server starts with. Records
//! and policies are defined out-of-band in a real deployment; the seed
//! gives demos and tests a subject to delegate.

use vsdl_core::{Policy, PolicyId, Record, RecordId};

use crate::state::ServerState;

/// Field names of the reference record, also used to derive each policy's
/// hidden set as the complement of its visible set.
const RECORD_FIELDS: [(&str, &str); 10] = [
    ("name", "Jane Haq"),
    ("nationalId", "35202-1234567-8"),
    ("dateOfBirth", "1987-04-12"),
    ("address", "14 Canal Road, Lahore"),
    ("maritalStatus", "married"),
    ("bloodType", "B+"),
    ("income", "2400000"),
    ("taxBracket", "12.5%"),
    ("criminalRecord", "none"),
    ("medicalConditions", "asthma"),
];

fn complement(visible: &[&str]) -> Vec<String> {
    RECORD_FIELDS
        .iter()
        .map(|(name, _)| name.to_string())
        .filter(|name| !visible.contains(&name.as_str()))
        .collect()
}

fn policy(id: &str, label: &str, visible: &[&str], actions: &[&str]) -> Policy {
    Policy::new(
        PolicyId::new(id).expect("seed policy id is valid"),
        label,
        visible.iter().map(|s| s.to_string()),
        complement(visible),
        actions.iter().map(|s| s.to_string()),
    )
    .expect("seed partition sets are disjoint")
}

/// Populate `state` with the reference record and the policy catalog.
pub fn seed(state: &ServerState) {
    let record = Record::new(RECORD_FIELDS).expect("seed field names are unique");
    state
        .records()
        .insert(RecordId::new("citizen-001").expect("seed record id is valid"), record);

    for p in [
        policy(
            "id-renewal",
            "National ID renewal",
            &["name", "nationalId", "dateOfBirth", "address"],
            &["view", "print"],
        ),
        policy(
            "tax-filing",
            "Tax filing assistance",
            &["name", "nationalId", "income", "taxBracket"],
            &["view"],
        ),
        policy(
            "medical-proxy",
            "Medical proxy",
            &["name", "dateOfBirth", "bloodType", "medicalConditions"],
            &["view", "share-with-physician"],
        ),
    ] {
        state.policies().insert(p.id.clone(), p);
    }
}
