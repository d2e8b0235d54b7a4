//! Integration tests for the image listing endpoint.

use http::StatusCode;

use crate::common::{DOMAIN, TestHarness, get, principal};

#[tokio::test]
async fn test_list_images() {
    let harness = TestHarness::new();
    harness.create("one.png");
    harness.create("two.webp");
    harness.create("readme.md");

    let (status, body) = harness.send(get("/api/images", None)).await;
    assert_eq!(status, StatusCode::OK);

    let mut names: Vec<&str> = body["images"]
        .as_array()
        .unwrap()
        .iter()
        .map(|image| image["filename"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["one.png", "two.webp"]);
    assert_eq!(body["images"][0]["size"], 11);
}

#[tokio::test]
async fn test_enforced_listing_requires_identity() {
    let harness = TestHarness::with_config(|config| config.auth.enforce = true);
    harness.create("one.png");

    let (status, body) = harness.send(get("/api/images", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "No auth data found");

    let header = principal(Some(&format!("alice{DOMAIN}")), None);
    let (status, body) = harness.send(get("/api/images", Some(&header))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["images"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_enforced_listing_rejects_other_domain() {
    let harness = TestHarness::with_config(|config| config.auth.enforce = true);
    let header = principal(Some("eve@example.com"), None);
    let (status, _) = harness.send(get("/api/images", Some(&header))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
