//! Integration tests for the UI config endpoint.

use http::StatusCode;

use crate::common::{TestHarness, get};

#[tokio::test]
async fn test_ui_config_defaults() {
    let harness = TestHarness::new();
    let (status, body) = harness.send(get("/api/ui-config", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({
            "helpUrl": null,
            "loginUrl": "/.auth/login/aad",
            "logoutUrl": "/.auth/logout"
        })
    );
}

#[tokio::test]
async fn test_ui_config_help_url() {
    let harness = TestHarness::with_config(|config| {
        config.ui.help_url = Some("https://wiki.example.com/imagegen".to_string());
    });
    let (_, body) = harness.send(get("/api/ui-config", None)).await;
    assert_eq!(body["helpUrl"], "https://wiki.example.com/imagegen");
}
