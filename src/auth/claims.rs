//! Unverified claim decoding for the request gate.
//!
//! The gate only looks at the payload segment of the bearer token; the
//! signature is never checked here. Signature verification belongs to the
//! credential service that issued the token, which this server consumes as a
//! black box.
//!
//! Role and verification claims have shipped under several field names over
//! the platform's lifetime, so lookups walk a fixed priority list and take
//! the first field present.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Field names that may carry the role claim, in lookup order.
const ROLE_FIELDS: &[&str] = &["role", "user_role", "userRole"];

/// Field names that may carry the verification flag, in lookup order.
const VERIFIED_FIELDS: &[&str] = &["is_verified", "isVerified"];

/// A user's role on the platform.
///
/// A role value the platform does not recognize is kept as `Other` rather
/// than collapsed into `User`: route rules treat unknown roles as
/// unauthorized, while a missing role claim falls back to `User`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Admin,
    BusinessOwner,
    User,
    Other(String),
}

impl Role {
    pub fn parse(value: &str) -> Role {
        match value {
            "admin" => Role::Admin,
            "business_owner" => Role::BusinessOwner,
            "user" => Role::User,
            other => Role::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::BusinessOwner => "business_owner",
            Role::User => "user",
            Role::Other(value) => value,
        }
    }

    /// Landing page for this role after authentication.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Admin => crate::routes::ADMIN_DASHBOARD,
            _ => crate::routes::OWNER_DASHBOARD,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Role::parse(&value))
    }
}

/// Claims decoded from a bearer token's payload segment, without signature
/// verification.
#[derive(Debug, Clone)]
pub struct ClaimSet {
    payload: Value,
}

impl ClaimSet {
    /// Decode the payload segment of a three-segment dot-delimited token.
    pub fn decode(token: &str) -> Result<ClaimSet, DecodeError> {
        let mut segments = token.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(DecodeError::Structure);
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(DecodeError::Encoding)?;
        let payload: Value = serde_json::from_slice(&bytes).map_err(DecodeError::Payload)?;
        if !payload.is_object() {
            return Err(DecodeError::Structure);
        }

        Ok(ClaimSet { payload })
    }

    /// First claim present from the given priority list.
    fn first_present(&self, fields: &[&str]) -> Option<&Value> {
        fields.iter().find_map(|field| self.payload.get(*field))
    }

    /// Resolve the role claim. Falls back to `User` when no role field is
    /// present at all; an unrecognized value is preserved as `Role::Other`.
    pub fn role(&self) -> Role {
        match self.first_present(ROLE_FIELDS).and_then(Value::as_str) {
            Some(value) => Role::parse(value),
            None => Role::User,
        }
    }

    /// Resolve the verification flag. Absent or non-boolean values count as
    /// verified, matching the platform's historical behavior.
    pub fn is_verified(&self) -> bool {
        match self.first_present(VERIFIED_FIELDS) {
            Some(value) => value.as_bool().unwrap_or(true),
            None => true,
        }
    }

    /// Expiration timestamp in seconds since epoch, if one is present and
    /// numeric.
    pub fn expires_at(&self) -> Option<u64> {
        self.payload
            .get("exp")
            .and_then(Value::as_f64)
            .map(|secs| secs as u64)
    }

    /// Whether the claims expired strictly before `now`. A token without a
    /// usable `exp` claim never counts as expired.
    pub fn is_expired(&self, now: u64) -> bool {
        match self.expires_at() {
            Some(exp) => exp < now,
            None => false,
        }
    }
}

/// Errors from decoding a token payload.
#[derive(Debug)]
pub enum DecodeError {
    /// Not a three-segment token, or the payload is not a JSON object
    Structure,
    /// Payload segment is not valid base64
    Encoding(base64::DecodeError),
    /// Payload bytes are not valid JSON
    Payload(serde_json::Error),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Structure => write!(f, "Malformed token structure"),
            DecodeError::Encoding(e) => write!(f, "Malformed payload encoding: {}", e),
            DecodeError::Payload(e) => write!(f, "Malformed payload JSON: {}", e),
        }
    }
}

impl std::error::Error for DecodeError {}
