//! Common test utilities and harness for Imagegate integration tests.

use std::path::{Path, PathBuf};

use axum::Router;
use axum::body::Body;
use http::{Request, Response, StatusCode};
use imagegate_api::{GateConfig, Server};
use imagegate_auth::{Claim, IdentityAssertion, PolicyMode};
use tower::ServiceExt;

/// Allowed suffix used throughout the tests.
pub const DOMAIN: &str = "@herzogdemeuron.com";
/// Tenant id used throughout the tests.
pub const TENANT: &str = "tenant-1";
/// Shared password used throughout the tests.
pub const PASSWORD: &str = "open-sesame";
/// Principal header name.
pub const HEADER: &str = "x-ms-client-principal";

/// Test harness: a router over a temporary output directory.
pub struct TestHarness {
    /// Keeps the output directory alive.
    pub dir: tempfile::TempDir,
    /// The router under test.
    pub router: Router,
}

impl TestHarness {
    /// Harness with the default policies (domain for status and gate) and no password.
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Harness with the config adjusted by `adjust`.
    pub fn with_config(adjust: impl FnOnce(&mut GateConfig)) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = GateConfig::default();
        config.storage.output_dir = dir.path().to_path_buf();
        adjust(&mut config);
        config.normalize();
        config.validate().expect("test config should validate");
        let router = Server::new(config).router();
        Self { dir, router }
    }

    /// Harness whose gate checks the tenant and accepts the shared password.
    pub fn tenant_gate_with_password() -> Self {
        Self::with_config(|config| {
            config.auth.tenant_id = Some(TENANT.to_string());
            config.auth.gate_policy = Some(PolicyMode::Tenant);
            config.auth.shared_password = Some(PASSWORD.to_string());
        })
    }

    /// Path to a file in the output directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a file into the output directory.
    pub fn create(&self, name: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, b"image bytes").expect("write test file");
        path
    }

    /// Send a request and return status plus parsed JSON body.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response: Response<Body> = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body should be JSON")
        };
        (status, body)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// A principal header value with the given email and tenant claims.
pub fn principal(email: Option<&str>, tenant: Option<&str>) -> String {
    let mut claims = Vec::new();
    if let Some(email) = email {
        claims.push(Claim::new("email", email));
    }
    if let Some(tenant) = tenant {
        claims.push(Claim::new("tid", tenant));
    }
    IdentityAssertion {
        user_id: "user-1".to_string(),
        user_details: email.unwrap_or("someone").to_string(),
        identity_provider: "aad".to_string(),
        user_roles: vec!["authenticated".to_string()],
        claims,
    }
    .encode()
}

/// `GET` with an optional principal header.
pub fn get(uri: &str, principal: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(principal) = principal {
        builder = builder.header(HEADER, principal);
    }
    builder.body(Body::empty()).unwrap()
}

/// `POST` a raw body with an optional principal header.
pub fn post(uri: &str, principal: Option<&str>, body: impl Into<Body>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(principal) = principal {
        builder = builder.header(HEADER, principal);
    }
    builder.body(body.into()).unwrap()
}

/// Whether a path exists.
pub fn exists(path: &Path) -> bool {
    path.exists()
}
