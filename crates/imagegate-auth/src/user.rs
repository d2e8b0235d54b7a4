//! Authenticated user identity and extraction helpers.

use serde::{Deserialize, Serialize};

use crate::IdentityAssertion;

/// A user whose identity passed the policy.
///
/// Serialized as the `user` object of the auth status response, and stored
/// in HTTP request extensions by [`crate::IdentityLayer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// The gateway's user id.
    pub id: String,
    /// Display or login name.
    pub name: String,
    /// The email claim, empty if the policy did not require one.
    pub email: String,
    /// Upstream identity provider.
    pub provider: String,
}

impl AuthenticatedUser {
    pub(crate) fn from_assertion(assertion: &IdentityAssertion) -> Self {
        Self {
            id: assertion.user_id.clone(),
            name: assertion.user_details.clone(),
            email: assertion.email().to_string(),
            provider: assertion.identity_provider.clone(),
        }
    }
}

/// Extract the `AuthenticatedUser` from HTTP request `Parts`, if present.
pub fn user_from_parts(parts: &http::request::Parts) -> Option<&AuthenticatedUser> {
    parts.extensions.get::<AuthenticatedUser>()
}

/// Extract the user's email from HTTP request `Parts`.
///
/// Returns `"anonymous"` if no authenticated user is present.
pub fn email_from_parts(parts: &http::request::Parts) -> &str {
    parts
        .extensions
        .get::<AuthenticatedUser>()
        .map(|u| u.email.as_str())
        .unwrap_or("anonymous")
}
