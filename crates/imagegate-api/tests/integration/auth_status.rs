//! Integration tests for the auth status endpoint.

use http::StatusCode;
use imagegate_auth::AuthDecision;

use crate::common::{DOMAIN, HEADER, TENANT, TestHarness, get, principal};

const STATUS: &str = "/api/auth/status";

#[tokio::test]
async fn test_no_header_is_unauthenticated() {
    let harness = TestHarness::new();
    let (status, body) = harness.send(get(STATUS, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({"authenticated": false, "user": null, "reason": "No auth data found"})
    );
}

#[tokio::test]
async fn test_allowed_domain_is_authenticated() {
    let harness = TestHarness::new();
    let email = format!("alice{DOMAIN}");
    let (status, body) = harness
        .send(get(STATUS, Some(&principal(Some(&email), None))))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["user"]["id"], "user-1");
    assert_eq!(body["user"]["email"], email.as_str());
    assert_eq!(body["user"]["provider"], "aad");
    assert!(body.get("reason").is_none());
}

#[tokio::test]
async fn test_other_domain_is_rejected() {
    let harness = TestHarness::new();
    let (status, body) = harness
        .send(get(STATUS, Some(&principal(Some("eve@example.com"), None))))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], false);
    assert!(body["user"].is_null());
    assert_eq!(body["reason"], "Invalid email domain");
}

#[tokio::test]
async fn test_capitalized_domain_is_rejected() {
    let harness = TestHarness::new();
    let (_, body) = harness
        .send(get(
            STATUS,
            Some(&principal(Some("alice@HERZOGDEMEURON.COM"), None)),
        ))
        .await;
    assert_eq!(body["authenticated"], false);
}

#[tokio::test]
async fn test_missing_email_claim_is_rejected() {
    let harness = TestHarness::new();
    let (_, body) = harness
        .send(get(STATUS, Some(&principal(None, Some(TENANT)))))
        .await;
    assert_eq!(body["authenticated"], false);
    assert!(body["user"].is_null());
}

#[tokio::test]
async fn test_malformed_header_is_unauthenticated() {
    let harness = TestHarness::new();
    for raw in ["%%%not-base64%%%", "bm90IGpzb24="] {
        let (status, body) = harness.send(get(STATUS, Some(raw))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["authenticated"], false);
        assert_eq!(body["reason"], "Invalid auth data");
    }
}

#[tokio::test]
async fn test_header_logging_does_not_change_decision() {
    let quiet = TestHarness::new();
    let verbose = TestHarness::with_config(|config| config.auth.log_headers = true);
    let header = principal(Some(&format!("alice{DOMAIN}")), None);

    let (_, a) = quiet.send(get(STATUS, Some(&header))).await;
    let (_, b) = verbose.send(get(STATUS, Some(&header))).await;
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_response_parses_as_decision() {
    let harness = TestHarness::new();
    let (_, body) = harness
        .send(get(
            STATUS,
            Some(&principal(Some(&format!("bob{DOMAIN}")), None)),
        ))
        .await;

    let decision: AuthDecision = serde_json::from_value(body).unwrap();
    assert!(decision.authenticated);
    assert_eq!(decision.user.unwrap().email, format!("bob{DOMAIN}"));
}

#[tokio::test]
async fn test_custom_header_and_path() {
    let harness = TestHarness::with_config(|config| {
        config.auth.principal_header = "X-Test-Principal".to_string();
        config.server.auth_status_path = "/whoami".to_string();
    });
    let request = http::Request::builder()
        .uri("/whoami")
        .header("x-test-principal", principal(Some(&format!("carol{DOMAIN}")), None))
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, body) = harness.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], true);

    // The default header is no longer read.
    let request = http::Request::builder()
        .uri("/whoami")
        .header(HEADER, principal(Some(&format!("carol{DOMAIN}")), None))
        .body(axum::body::Body::empty())
        .unwrap();
    let (_, body) = harness.send(request).await;
    assert_eq!(body["authenticated"], false);
}
