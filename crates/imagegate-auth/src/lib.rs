//! Principal-header authentication for Imagegate.
//!
//! The hosting platform's authentication gateway signs users in and injects a
//! base64-encoded identity assertion into every request it forwards. This
//! crate turns that header into an authorization decision.
//!
//! Provides:
//! - [`IdentityAssertion`]: Decoded principal header
//! - [`Policy`] / [`PolicyMode`]: Email-domain and tenant allowlist checks
//! - [`AuthDecision`]: Wire shape consumed by the front end
//! - [`Gate`]: SSO-or-shared-secret check for mutating routes
//! - [`IdentityLayer`] / [`IdentityService`]: Tower middleware over [`Policy`]
//! - [`AuthConfig`]: Configuration for all of the above
//! - [`AuthError`]: Auth-specific error types
//!
//! The header is trusted as-is. Nothing here verifies a signature; that is
//! the gateway's job and the reason this layer must only ever be deployed
//! behind it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod assertion;
mod error;
mod gate;
mod middleware;
mod policy;
mod user;

use serde::{Deserialize, Serialize};

pub use assertion::{Claim, DEFAULT_PRINCIPAL_HEADER, IdentityAssertion, decode_header};
pub use error::AuthError;
pub use gate::{Gate, GateOutcome, hash_password};
pub use middleware::{IdentityLayer, IdentityService};
pub use policy::{AuthDecision, Policy, PolicyMode, normalize_domain_suffix};
pub use user::{AuthenticatedUser, email_from_parts, user_from_parts};

/// Default email suffix accepted by the domain policy.
pub const DEFAULT_ALLOWED_DOMAIN: &str = "@herzogdemeuron.com";

/// Configuration for principal-header authentication.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Whether [`IdentityLayer`] rejects requests without a passing identity.
    /// When false, requests pass through and the identity is attached if present.
    pub enforce: bool,
    /// Name of the header the gateway injects.
    pub principal_header: String,
    /// Required email suffix, e.g. `@herzogdemeuron.com`. Compared case-sensitively.
    pub allowed_domain: String,
    /// Expected value of the `tid` claim, for tenant policies.
    pub tenant_id: Option<String>,
    /// Policy applied by the auth status endpoint and [`IdentityLayer`].
    pub status_policy: PolicyMode,
    /// Policy applied by [`Gate`]. `None` selects `tenant` when a tenant id is
    /// configured and `domain` otherwise.
    pub gate_policy: Option<PolicyMode>,
    /// Fallback password for clients without an SSO identity.
    pub shared_password: Option<String>,
    /// Log observed request header names on the auth status endpoint.
    pub log_headers: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enforce: false,
            principal_header: DEFAULT_PRINCIPAL_HEADER.to_string(),
            allowed_domain: DEFAULT_ALLOWED_DOMAIN.to_string(),
            tenant_id: None,
            status_policy: PolicyMode::Domain,
            gate_policy: None,
            shared_password: None,
            log_headers: false,
        }
    }
}

impl AuthConfig {
    /// The policy mode the gate actually runs with.
    pub fn effective_gate_policy(&self) -> PolicyMode {
        self.gate_policy.unwrap_or(if self.tenant_id.is_some() {
            PolicyMode::Tenant
        } else {
            PolicyMode::Domain
        })
    }

    /// Build the policy used for sign-in status and the identity middleware.
    pub fn status_policy(&self) -> Policy {
        Policy::new(
            self.status_policy,
            self.allowed_domain.clone(),
            self.tenant_id.clone(),
        )
    }

    /// Build the policy used by the authorization gate.
    pub fn gate_policy(&self) -> Policy {
        Policy::new(
            self.effective_gate_policy(),
            self.allowed_domain.clone(),
            self.tenant_id.clone(),
        )
    }
}
