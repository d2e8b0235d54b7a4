//! Authorization gate for mutating routes.
//!
//! A request passes if the gateway vouches for it (SSO path) or, failing
//! that, if it carries the hash of the configured shared password. The
//! password path exists for non-browser clients and must stay available even
//! when SSO is the primary mechanism.

use http::HeaderMap;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::assertion::IdentityAssertion;
use crate::policy::log_outcome;
use crate::{AuthConfig, AuthError, AuthenticatedUser, Policy};

/// Hex-encoded SHA-256 of a password; the value clients send as `passwordHash`.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// How a request got through the gate, if it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// The principal header carried an identity the policy accepts.
    Sso(AuthenticatedUser),
    /// The request body carried the shared password hash.
    SharedSecret,
    /// Neither path succeeded.
    Denied,
}

impl GateOutcome {
    /// Whether the request may proceed.
    pub fn is_authorized(&self) -> bool {
        !matches!(self, GateOutcome::Denied)
    }
}

/// SSO-then-shared-secret authorization check.
#[derive(Debug, Clone)]
pub struct Gate {
    policy: Policy,
    header_name: String,
    password_digest: Option<String>,
}

impl Gate {
    /// Create a gate. An empty password disables the shared-secret path.
    pub fn new(policy: Policy, header_name: String, shared_password: Option<&str>) -> Self {
        Self {
            policy,
            header_name,
            password_digest: shared_password
                .filter(|p| !p.is_empty())
                .map(hash_password),
        }
    }

    /// Create a gate from the auth configuration, using the gate policy.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.gate_policy(),
            config.principal_header.clone(),
            config.shared_password.as_deref(),
        )
    }

    /// Whether the shared-secret path is enabled.
    pub fn has_shared_secret(&self) -> bool {
        self.password_digest.is_some()
    }

    /// Decide whether a request is authorized.
    ///
    /// The password hash is only consulted when the SSO path fails.
    pub fn authorize(&self, headers: &HeaderMap, password_hash: Option<&str>) -> GateOutcome {
        match log_outcome(self.sso(headers)) {
            Ok(user) => return GateOutcome::Sso(user),
            Err(e) => log::debug!("Gate SSO path failed: {e}"),
        }

        if self.shared_secret_matches(password_hash) {
            log::info!("Gate passed via shared secret");
            return GateOutcome::SharedSecret;
        }

        GateOutcome::Denied
    }

    /// Boolean form of [`Gate::authorize`].
    pub fn is_authorized(&self, headers: &HeaderMap, password_hash: Option<&str>) -> bool {
        self.authorize(headers, password_hash).is_authorized()
    }

    fn sso(&self, headers: &HeaderMap) -> Result<AuthenticatedUser, AuthError> {
        let raw = headers
            .get(self.header_name.as_str())
            .ok_or(AuthError::MissingHeader)?
            .to_str()
            .map_err(|e| AuthError::MalformedAssertion(e.to_string()))?;
        let assertion = IdentityAssertion::decode(raw)?;
        if assertion.user_id.trim().is_empty() {
            return Err(AuthError::MissingUserId);
        }
        self.policy.check(&assertion)
    }

    fn shared_secret_matches(&self, password_hash: Option<&str>) -> bool {
        let (Some(expected), Some(supplied)) = (self.password_digest.as_deref(), password_hash)
        else {
            return false;
        };
        let supplied = supplied.trim().to_ascii_lowercase();
        expected.as_bytes().ct_eq(supplied.as_bytes()).into()
    }
}
