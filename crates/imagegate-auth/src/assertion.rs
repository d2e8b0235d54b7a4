//! Decoding of the gateway's principal header.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Deserializer, Serialize};

use crate::AuthError;

/// Header the gateway uses to forward the signed-in principal.
pub const DEFAULT_PRINCIPAL_HEADER: &str = "x-ms-client-principal";

/// Claim type carrying the user's email address.
pub(crate) const EMAIL_CLAIM: &str = "email";

/// Claim type carrying the issuing directory's tenant id.
pub(crate) const TENANT_CLAIM: &str = "tid";

// Standard alphabet; the gateway pads, hand-built headers often don't.
const PRINCIPAL_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A single `(type, value)` claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Claim type, e.g. `email` or `tid`.
    #[serde(rename = "typ", alias = "type")]
    pub typ: String,
    /// Claim value.
    #[serde(rename = "val", alias = "value")]
    pub value: String,
}

impl Claim {
    /// Create a claim.
    pub fn new(typ: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            typ: typ.into(),
            value: value.into(),
        }
    }
}

/// The identity the gateway asserts for the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityAssertion {
    /// Opaque user identifier.
    pub user_id: String,
    /// Display or login name; often the email address.
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_details: String,
    /// Upstream identity provider tag, e.g. `aad`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub identity_provider: String,
    /// Platform roles assigned to the user.
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_roles: Vec<String>,
    /// Claims in the order the gateway sent them. Types may repeat.
    #[serde(default, deserialize_with = "null_as_default")]
    pub claims: Vec<Claim>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl IdentityAssertion {
    /// Decode a raw header value: base64, then JSON.
    pub fn decode(raw: &str) -> Result<Self, AuthError> {
        let bytes = PRINCIPAL_ENGINE
            .decode(raw.trim())
            .map_err(|e| AuthError::MalformedAssertion(format!("base64: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| AuthError::MalformedAssertion(format!("json: {e}")))
    }

    /// Encode as a header value the gateway would send.
    pub fn encode(&self) -> String {
        // Serializing plain strings and vectors cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        PRINCIPAL_ENGINE.encode(json)
    }

    /// Value of the first claim of the given type.
    pub fn claim(&self, typ: &str) -> Option<&str> {
        self.claims
            .iter()
            .find(|c| c.typ == typ)
            .map(|c| c.value.as_str())
    }

    /// The email claim, or the empty string when there is none.
    pub fn email(&self) -> &str {
        self.claim(EMAIL_CLAIM).unwrap_or("")
    }

    /// The tenant id claim.
    pub fn tenant_id(&self) -> Option<&str> {
        self.claim(TENANT_CLAIM)
    }
}

/// Decode an optional header value, treating every failure as "no identity".
///
/// An absent header returns `None` without attempting to decode.
pub fn decode_header(value: Option<&str>) -> Option<IdentityAssertion> {
    let raw = value?;
    match IdentityAssertion::decode(raw) {
        Ok(assertion) => Some(assertion),
        Err(e) => {
            log::debug!("Discarding principal header: {e}");
            None
        }
    }
}
