//! Tower identity middleware.
//!
//! `IdentityLayer` and `IdentityService` evaluate the principal header against
//! a [`Policy`] before forwarding requests. The accepted identity is stored in
//! request extensions for downstream handlers.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::response::IntoResponse;
use http::{Request, StatusCode};
use tower::{Layer, Service};

use crate::policy::log_outcome;
use crate::{AuthConfig, Policy};

#[derive(Debug)]
struct Settings {
    policy: Policy,
    header_name: String,
    enforce: bool,
}

/// Tower `Layer` that attaches (and optionally requires) a gateway identity.
#[derive(Clone)]
pub struct IdentityLayer {
    settings: Arc<Settings>,
}

impl IdentityLayer {
    /// Create a new identity layer.
    ///
    /// With `enforce` off, requests without an accepted identity still pass.
    pub fn new(policy: Policy, header_name: String, enforce: bool) -> Self {
        Self {
            settings: Arc::new(Settings {
                policy,
                header_name,
                enforce,
            }),
        }
    }

    /// Create a layer from the auth configuration, using the status policy.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.status_policy(),
            config.principal_header.clone(),
            config.enforce,
        )
    }
}

impl<S> Layer<S> for IdentityLayer {
    type Service = IdentityService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        IdentityService {
            inner,
            settings: self.settings.clone(),
        }
    }
}

/// Tower `Service` that evaluates the principal header before forwarding.
///
/// On success, inserts [`crate::AuthenticatedUser`] into request extensions.
#[derive(Clone)]
pub struct IdentityService<S> {
    inner: S,
    settings: Arc<Settings>,
}

impl<S> Service<Request<Body>> for IdentityService<S>
where
    S: Service<Request<Body>, Error = Infallible> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send,
{
    type Response = axum::response::Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let settings = self.settings.clone();

        Box::pin(async move {
            let result = log_outcome(
                settings
                    .policy
                    .authenticate_headers(req.headers(), &settings.header_name),
            );

            match result {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                }
                Err(auth_err) if settings.enforce => {
                    return Ok(unauthorized_response(auth_err.reason()));
                }
                Err(_) => {}
            }

            let resp = inner
                .call(req)
                .await
                .unwrap_or_else(|infallible| match infallible {});
            Ok(resp.into_response())
        })
    }
}

/// Build a 401 Unauthorized JSON response.
fn unauthorized_response(message: &str) -> axum::response::Response {
    let body = serde_json::json!({
        "error": {
            "category": "authentication",
            "message": message,
        }
    });

    (
        StatusCode::UNAUTHORIZED,
        [(http::header::CONTENT_TYPE, "application/json")],
        serde_json::to_string(&body).unwrap_or_default(),
    )
        .into_response()
}
