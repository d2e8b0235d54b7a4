//! Email-domain and tenant allowlist policy.

use http::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::assertion::IdentityAssertion;
use crate::{AuthError, AuthenticatedUser};

/// Which predicates a [`Policy`] enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    /// Email claim must end with the allowed suffix.
    Domain,
    /// `tid` claim must equal the configured tenant id.
    Tenant,
    /// Both of the above.
    DomainAndTenant,
}

impl PolicyMode {
    fn checks_domain(self) -> bool {
        matches!(self, PolicyMode::Domain | PolicyMode::DomainAndTenant)
    }

    fn checks_tenant(self) -> bool {
        matches!(self, PolicyMode::Tenant | PolicyMode::DomainAndTenant)
    }
}

/// Prefix a bare domain with `@` so the suffix match is anchored on the
/// domain boundary (`evilexample.com` must not match `example.com`).
pub fn normalize_domain_suffix(domain: &str) -> String {
    let domain = domain.trim();
    if domain.is_empty() || domain.starts_with('@') {
        domain.to_string()
    } else {
        format!("@{domain}")
    }
}

/// Allowlist applied to a decoded identity.
///
/// Pure: the same header always yields the same decision.
#[derive(Debug, Clone)]
pub struct Policy {
    mode: PolicyMode,
    allowed_domain: String,
    tenant_id: Option<String>,
}

impl Policy {
    /// Create a policy.
    pub fn new(mode: PolicyMode, allowed_domain: String, tenant_id: Option<String>) -> Self {
        Self {
            mode,
            allowed_domain,
            tenant_id,
        }
    }

    /// The predicates this policy enforces.
    pub fn mode(&self) -> PolicyMode {
        self.mode
    }

    /// Apply the policy to a decoded identity.
    ///
    /// The domain comparison is a literal, case-sensitive suffix match.
    pub fn check(&self, assertion: &IdentityAssertion) -> Result<AuthenticatedUser, AuthError> {
        let email = assertion.email();

        if self.mode.checks_domain() && !email.ends_with(&self.allowed_domain) {
            return Err(AuthError::DomainRejected {
                email: email.to_string(),
                expected: self.allowed_domain.clone(),
            });
        }

        if self.mode.checks_tenant() {
            let tenant = assertion.tenant_id();
            let matches = match (self.tenant_id.as_deref(), tenant) {
                (Some(expected), Some(actual)) => expected == actual,
                _ => false,
            };
            if !matches {
                return Err(AuthError::TenantRejected {
                    tenant: tenant.map(str::to_string),
                });
            }
        }

        Ok(AuthenticatedUser::from_assertion(assertion))
    }

    /// Decode a raw header value and apply the policy.
    pub fn authenticate(&self, header: Option<&str>) -> Result<AuthenticatedUser, AuthError> {
        let raw = header.ok_or(AuthError::MissingHeader)?;
        let assertion = IdentityAssertion::decode(raw)?;
        self.check(&assertion)
    }

    /// Read the named header from a request and apply the policy.
    pub fn authenticate_headers(
        &self,
        headers: &HeaderMap,
        header_name: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let raw = match headers.get(header_name) {
            Some(value) => Some(
                value
                    .to_str()
                    .map_err(|e| AuthError::MalformedAssertion(e.to_string()))?,
            ),
            None => None,
        };
        self.authenticate(raw)
    }

    /// Decide sign-in state for a raw header value.
    pub fn evaluate(&self, header: Option<&str>) -> AuthDecision {
        log_outcome(self.authenticate(header)).into()
    }

    /// Decide sign-in state for a request's headers.
    pub fn evaluate_headers(&self, headers: &HeaderMap, header_name: &str) -> AuthDecision {
        log_outcome(self.authenticate_headers(headers, header_name)).into()
    }
}

pub(crate) fn log_outcome(
    result: Result<AuthenticatedUser, AuthError>,
) -> Result<AuthenticatedUser, AuthError> {
    match &result {
        Ok(user) => log::debug!("Accepted identity {} ({})", user.id, user.email),
        Err(e) if e.is_anonymous() => log::debug!("No identity on request"),
        Err(e) => log::warn!("Identity rejected: {e}"),
    }
    result
}

/// Sign-in state as returned to the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthDecision {
    /// Whether the request carries an accepted identity.
    pub authenticated: bool,
    /// The accepted identity; `null` when not authenticated.
    pub user: Option<AuthenticatedUser>,
    /// Why the identity was not accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AuthDecision {
    /// An accepted identity.
    pub fn allow(user: AuthenticatedUser) -> Self {
        Self {
            authenticated: true,
            user: Some(user),
            reason: None,
        }
    }

    /// A denial with a client-facing reason.
    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            authenticated: false,
            user: None,
            reason: Some(reason.into()),
        }
    }
}

impl From<Result<AuthenticatedUser, AuthError>> for AuthDecision {
    fn from(result: Result<AuthenticatedUser, AuthError>) -> Self {
        match result {
            Ok(user) => AuthDecision::allow(user),
            Err(e) => AuthDecision::deny(e.reason()),
        }
    }
}
