//! Bearer token issuance and validation (HS256 JWT).
//!
//! # Invariants
//! - Claims are a fixed typed structure: `sub` (user id), `iat`, `exp`.
//! - `exp` and `sub` are required; expiry is checked with zero leeway.
//! - An empty subject is rejected.

use crate::auth::AuthError;
use crate::model::user::UserId;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 72;

/// Registered claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id of the token holder.
    pub sub: UserId,
    /// Issued-at, Unix seconds.
    #[serde(default)]
    pub iat: i64,
    /// Expiry, Unix seconds.
    pub exp: i64,
}

/// Issues and validates bearer tokens signed with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl Debug for TokenService {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_hours", &self.ttl.num_hours())
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Uses the default 72 hour lifetime.
    pub fn with_default_ttl(secret: &[u8]) -> Self {
        Self::new(secret, Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token for `user_id`, valid from now for the configured ttl.
    pub fn issue(&self, user_id: &str) -> Result<String, AuthError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issues a token as if the current time were `issued_at`.
    pub fn issue_at(&self, user_id: &str, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        if user_id.is_empty() {
            return Err(AuthError::InvalidSubject);
        }
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| AuthError::Signing(err.to_string()))
    }

    /// Validates signature and expiry and returns the subject user id.
    pub fn validate(&self, token: &str) -> Result<UserId, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|err| map_jwt_error(err.kind()))?;
        if data.claims.sub.is_empty() {
            return Err(AuthError::InvalidSubject);
        }
        Ok(data.claims.sub)
    }
}

fn map_jwt_error(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::ExpiredSignature => AuthError::Expired,
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        ErrorKind::MissingRequiredClaim(claim) if claim == "sub" => AuthError::InvalidSubject,
        ErrorKind::MissingRequiredClaim(claim) => AuthError::MissingClaim(claim.clone()),
        // Payload is JSON but does not fit `Claims`, e.g. a numeric `sub`.
        ErrorKind::Json(_) => AuthError::InvalidClaims,
        _ => AuthError::MalformedToken,
    }
}
