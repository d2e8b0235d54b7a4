//! Auth-specific error types.

/// Reasons an identity is not accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum AuthError {
    /// The gateway did not inject a principal header.
    #[error("missing principal header")]
    MissingHeader,

    /// The header is not valid base64, or the payload is not a valid assertion.
    #[error("malformed identity assertion: {0}")]
    MalformedAssertion(String),

    /// The assertion carries an empty `userId`.
    #[error("identity assertion has no user id")]
    MissingUserId,

    /// The email claim does not end with the allowed suffix.
    #[error("invalid email domain: got '{email}', expected suffix '{expected}'")]
    DomainRejected { email: String, expected: String },

    /// The `tid` claim is absent or differs from the configured tenant.
    #[error("invalid tenant: got {tenant:?}")]
    TenantRejected { tenant: Option<String> },
}

impl AuthError {
    /// Fixed, client-facing reason string for [`crate::AuthDecision::reason`].
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "No auth data found",
            AuthError::MalformedAssertion(_) | AuthError::MissingUserId => "Invalid auth data",
            AuthError::DomainRejected { .. } => "Invalid email domain",
            AuthError::TenantRejected { .. } => "Invalid tenant",
        }
    }

    /// Whether the request carried an identity at all.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, AuthError::MissingHeader)
    }
}
