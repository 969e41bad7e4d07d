//! Helpers for request boundaries (CLI, HTTP adapters).
//!
//! # Responsibility
//! - Extract bearer tokens from `Authorization` header values.
//! - Classify core errors into transport-level kinds and status codes.
//!
//! # Invariants
//! - Storage failures always classify as `Storage` (500), never as
//!   `NotFound`, even when they come from a lookup path.

use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::db::DbError;
use crate::repo::RepoError;
use crate::service::account_service::AccountError;
use crate::service::memo_service::MemoServiceError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

const BEARER_PREFIX: &str = "Bearer ";

/// Transport-independent failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Auth,
    NotFound,
    Duplicate,
    Storage,
}

impl ErrorKind {
    /// HTTP status code for this class.
    pub fn status_code(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::Auth => 401,
            Self::NotFound => 404,
            Self::Duplicate => 409,
            Self::Storage => 500,
        }
    }
}

/// Maps an error onto its boundary class.
pub trait Classify {
    fn kind(&self) -> ErrorKind;
}

impl Classify for AuthError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Signing(_) => ErrorKind::Storage,
            _ => ErrorKind::Auth,
        }
    }
}

impl Classify for DbError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Storage
    }
}

impl Classify for RepoError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Duplicate { .. } => ErrorKind::Duplicate,
            _ => ErrorKind::Storage,
        }
    }
}

impl Classify for MemoServiceError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl Classify for AccountError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Duplicate(_) => ErrorKind::Duplicate,
            Self::Auth(err) => err.kind(),
            Self::Hash(_) | Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl Classify for ConfigError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Storage
    }
}

/// Error envelope written by boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: ErrorKind,
    pub status: u16,
}

impl ErrorBody {
    pub fn from_error<E: Classify + Display>(err: &E) -> Self {
        let kind = err.kind();
        Self {
            error: err.to_string(),
            kind,
            status: kind.status_code(),
        }
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` value.
///
/// # Errors
/// - `MissingToken` when the header is absent or empty.
/// - `MalformedHeader` when the scheme is not `Bearer` or the token is
///   blank.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = match header {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthError::MissingToken),
    };
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MalformedHeader)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token)
}
