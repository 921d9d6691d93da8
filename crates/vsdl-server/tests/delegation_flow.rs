//! End-to-end delegation scenarios driven through the HTTP surface:
//! issue a token, redeem it, and verify the partition proof — plus the
//! tampering, expiry, and substitution cases a dishonest party would try.

use std::collections::BTreeSet;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use vsdl_core::{Policy, PolicyId, Record, RecordId};
use vsdl_crypto::Point;
use vsdl_server::{app, ServerConfig, ServerState};
use vsdl_token::{verify_disclosure, DisclosureFailure, PartitionProof};

fn seeded_state() -> ServerState {
    ServerState::with_seed_data(ServerConfig::ephemeral().unwrap())
}

async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, value)
}

async fn create_token(state: &ServerState, record: &str, policy: &str, ttl: u64) -> Value {
    let (status, body) = send(
        app(state.clone()),
        "POST",
        "/token/create",
        Some(json!({"recordId": record, "policyId": policy, "expiresIn": ttl})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create failed: {body}");
    body
}

#[tokio::test]
async fn id_renewal_flow_discloses_four_fields_and_verifies() {
    let state = seeded_state();
    let created = create_token(&state, "citizen-001", "id-renewal", 300).await;

    let token = created["token"].as_str().unwrap();
    let (status, dispensed) =
        send(app(state.clone()), "GET", &format!("/delegate/{token}"), None).await;
    assert_eq!(status, StatusCode::OK, "dispense failed: {dispensed}");

    let filtered = dispensed["filteredRecord"].as_object().unwrap();
    assert_eq!(filtered.len(), 4);
    assert_eq!(filtered["name"], "Jane Haq");
    assert_eq!(filtered["nationalId"], "35202-1234567-8");
    assert_eq!(filtered["dateOfBirth"], "1987-04-12");
    assert_eq!(filtered["address"], "14 Canal Road, Lahore");
    assert_eq!(dispensed["actions"], json!(["view", "print"]));
    assert_eq!(dispensed["proof"]["hiddenFieldCount"], 6);

    // Delegate-side verification against the commitment bound at issuance.
    let proof: PartitionProof = serde_json::from_value(dispensed["proof"].clone()).unwrap();
    let bound =
        Point::from_hex(created["cryptography"]["recordCommitment"].as_str().unwrap()).unwrap();
    let expected: BTreeSet<String> = filtered.keys().cloned().collect();
    let report = verify_disclosure(&proof, bound, &expected);
    assert!(report.valid, "failure: {:?}", report.failure);

    // The convenience endpoint agrees.
    let (status, verified) = send(
        app(state.clone()),
        "POST",
        "/verify",
        Some(json!({
            "visibleFields": dispensed["proof"]["openings"],
            "recordCommitment": dispensed["proof"]["recordCommitment"],
            "hiddenCommitment": dispensed["proof"]["hiddenCommitment"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verified["valid"], true);
    assert_eq!(
        verified["recomputedVisible"].as_str().unwrap(),
        report.recomputed_visible.to_hex()
    );
}

#[tokio::test]
async fn tampered_value_fails_verification() {
    let state = seeded_state();
    let created = create_token(&state, "citizen-001", "id-renewal", 300).await;
    let token = created["token"].as_str().unwrap();
    let (_, dispensed) =
        send(app(state.clone()), "GET", &format!("/delegate/{token}"), None).await;

    let mut openings = dispensed["proof"]["openings"].clone();
    for opening in openings.as_array_mut().unwrap() {
        if opening["name"] == "address" {
            opening["value"] = json!("Elsewhere");
        }
    }

    let (status, verified) = send(
        app(state.clone()),
        "POST",
        "/verify",
        Some(json!({
            "visibleFields": openings,
            "recordCommitment": dispensed["proof"]["recordCommitment"],
            "hiddenCommitment": dispensed["proof"]["hiddenCommitment"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verified["valid"], false);
}

#[tokio::test]
async fn substituted_randomness_fails_verification() {
    let state = seeded_state();
    let created = create_token(&state, "citizen-001", "id-renewal", 300).await;
    let token = created["token"].as_str().unwrap();
    let (_, dispensed) =
        send(app(state.clone()), "GET", &format!("/delegate/{token}"), None).await;

    let fresh = vsdl_crypto::random_scalar().unwrap();
    let mut openings = dispensed["proof"]["openings"].clone();
    for opening in openings.as_array_mut().unwrap() {
        if opening["name"] == "nationalId" {
            opening["r"] = json!(fresh.to_hex());
        }
    }

    let (status, verified) = send(
        app(state.clone()),
        "POST",
        "/verify",
        Some(json!({
            "visibleFields": openings,
            "recordCommitment": dispensed["proof"]["recordCommitment"],
            "hiddenCommitment": dispensed["proof"]["hiddenCommitment"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verified["valid"], false);
}

#[tokio::test]
async fn double_issue_keeps_policy_hash_but_nothing_else() {
    let state = seeded_state();
    let a = create_token(&state, "citizen-001", "id-renewal", 300).await;
    let b = create_token(&state, "citizen-001", "id-renewal", 300).await;

    assert_eq!(
        a["cryptography"]["policyHash"],
        b["cryptography"]["policyHash"]
    );
    assert_eq!(
        a["cryptography"]["policyHash"].as_str().unwrap().len(),
        64,
        "policy hash must be the full digest"
    );
    assert_ne!(a["tokenId"], b["tokenId"]);
    assert_ne!(
        a["cryptography"]["recordCommitment"],
        b["cryptography"]["recordCommitment"]
    );
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let state = seeded_state();
    let created = create_token(&state, "citizen-001", "id-renewal", 1).await;
    let token = created["token"].as_str().unwrap();

    tokio::time::sleep(Duration::from_secs(2)).await;

    let (status, body) =
        send(app(state.clone()), "GET", &format!("/delegate/{token}"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn spliced_cross_policy_token_is_unauthorized() {
    let state = seeded_state();
    let tax = create_token(&state, "citizen-001", "tax-filing", 300).await;
    let medical = create_token(&state, "citizen-001", "medical-proxy", 300).await;

    // Graft the medical-proxy claims onto the tax-filing signature.
    let tax_parts: Vec<&str> = tax["token"].as_str().unwrap().split('.').collect();
    let med_parts: Vec<&str> = medical["token"].as_str().unwrap().split('.').collect();
    let spliced = format!("{}.{}.{}", tax_parts[0], med_parts[1], tax_parts[2]);

    let (status, body) =
        send(app(state.clone()), "GET", &format!("/delegate/{spliced}"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn unknown_record_and_policy_are_distinct_404s() {
    let state = seeded_state();

    let (status, body) = send(
        app(state.clone()),
        "POST",
        "/token/create",
        Some(json!({"recordId": "citizen-999", "policyId": "id-renewal", "expiresIn": 60})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, body) = send(
        app(state.clone()),
        "POST",
        "/token/create",
        Some(json!({"recordId": "citizen-001", "policyId": "no-such", "expiresIn": 60})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "INVALID_POLICY");
}

#[tokio::test]
async fn malformed_bodies_are_unprocessable() {
    let state = seeded_state();

    let (status, body) = send(
        app(state.clone()),
        "POST",
        "/token/create",
        Some(json!({"recordId": "citizen-001"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "MALFORMED");

    let (status, _) = send(
        app(state.clone()),
        "POST",
        "/token/create",
        Some(json!({"recordId": "citizen-001", "policyId": "id-renewal", "expiresIn": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        app(state.clone()),
        "POST",
        "/verify",
        Some(json!({
            "visibleFields": [{"name": "a", "value": "b", "r": "nothex"}],
            "recordCommitment": "00",
            "hiddenCommitment": "00",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "MALFORMED");
}

#[tokio::test]
async fn uncovering_policy_surfaces_as_server_error() {
    let state = seeded_state();
    let record_id = RecordId::new("partial-subject").unwrap();
    state
        .records()
        .insert(record_id, Record::new([("a", "1"), ("b", "2")]).unwrap());
    let policy_id = PolicyId::new("partial-policy").unwrap();
    state.policies().insert(
        policy_id.clone(),
        Policy::new(policy_id, "Covers only a", ["a".to_string()], [], []).unwrap(),
    );

    let created = create_token(&state, "partial-subject", "partial-policy", 60).await;
    let token = created["token"].as_str().unwrap();
    let (status, body) =
        send(app(state.clone()), "GET", &format!("/delegate/{token}"), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "POLICY_RECORD_MISMATCH");
    // The unaccounted field names stay server-side.
    assert_eq!(
        body["error"]["message"],
        "the policy bound to this token is misconfigured"
    );
}

#[tokio::test]
async fn delegate_rejects_proof_for_a_different_token() {
    // A server could try answering with a proof built for another record
    // commitment; checking against the token-bound commitment catches it.
    let state = seeded_state();
    let first = create_token(&state, "citizen-001", "id-renewal", 300).await;
    let second = create_token(&state, "citizen-001", "id-renewal", 300).await;

    let token = second["token"].as_str().unwrap();
    let (_, dispensed) =
        send(app(state.clone()), "GET", &format!("/delegate/{token}"), None).await;
    let proof: PartitionProof = serde_json::from_value(dispensed["proof"].clone()).unwrap();

    // Delegate holds the FIRST token, so binds to the first commitment.
    let bound =
        Point::from_hex(first["cryptography"]["recordCommitment"].as_str().unwrap()).unwrap();
    let expected: BTreeSet<String> = dispensed["filteredRecord"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    let report = verify_disclosure(&proof, bound, &expected);
    assert!(!report.valid);
    assert_eq!(report.failure, Some(DisclosureFailure::CommitmentMismatch));
}

#[tokio::test]
async fn generators_and_policies_are_published() {
    let state = seeded_state();

    let (status, body) = send(app(state.clone()), "GET", "/generators", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["group"], "ristretto255");
    assert_eq!(body["g"].as_str().unwrap().len(), 64);
    assert_eq!(body["h"].as_str().unwrap().len(), 64);
    assert_ne!(body["g"], body["h"]);

    let (status, body) = send(app(state.clone()), "GET", "/policies", None).await;
    assert_eq!(status, StatusCode::OK);
    let policies = body["policies"].as_array().unwrap();
    assert_eq!(policies.len(), 3);
    let ids: Vec<&str> = policies.iter().map(|p| p["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["id-renewal", "medical-proxy", "tax-filing"]);
    for p in policies {
        assert_eq!(p["policyHash"].as_str().unwrap().len(), 64);
    }
}

#[tokio::test]
async fn health_probes_respond() {
    let state = seeded_state();
    let (status, _) = send(app(state.clone()), "GET", "/health/liveness", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(app(state.clone()), "GET", "/health/readiness", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let state = seeded_state();
    let (status, body) = send(app(state), "GET", "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/token/create"].is_object());
    assert!(body["paths"]["/delegate/{token}"].is_object());
}
