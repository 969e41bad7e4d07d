//! Authentication primitives: password hashing and bearer tokens.
//!
//! # Responsibility
//! - Hash and verify passwords (argon2id).
//! - Issue and validate signed bearer tokens carrying a user id.
//!
//! # Invariants
//! - Token validation failures of any kind surface as `AuthError`, never as
//!   a panic or a silently accepted identity.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod password;
pub mod token;

/// Authentication failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No credential was presented.
    MissingToken,
    /// `Authorization` header does not follow `Bearer <token>`.
    MalformedHeader,
    /// Token is not a decodable JWT.
    MalformedToken,
    InvalidSignature,
    Expired,
    /// A required registered claim is absent.
    MissingClaim(String),
    /// Subject claim is missing or empty.
    InvalidSubject,
    /// Claims payload does not match the expected typed structure.
    InvalidClaims,
    /// Unknown username or wrong password; deliberately not distinguished.
    InvalidCredentials,
    /// Token could not be signed.
    Signing(String),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingToken => write!(f, "missing bearer token"),
            Self::MalformedHeader => write!(f, "malformed authorization header"),
            Self::MalformedToken => write!(f, "malformed token"),
            Self::InvalidSignature => write!(f, "token signature mismatch"),
            Self::Expired => write!(f, "token expired"),
            Self::MissingClaim(claim) => write!(f, "token is missing required claim `{claim}`"),
            Self::InvalidSubject => write!(f, "token subject is missing or empty"),
            Self::InvalidClaims => write!(f, "token claims are malformed"),
            Self::InvalidCredentials => write!(f, "invalid username or password"),
            Self::Signing(message) => write!(f, "failed to sign token: {message}"),
        }
    }
}

impl Error for AuthError {}
