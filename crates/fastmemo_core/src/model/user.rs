//! User account model.
//!
//! # Invariants
//! - `username` is unique across all users.
//! - `password_hash` is an opaque PHC string and never leaves the core in
//!   serialized form; callers get [`PublicUser`] instead.

use serde::{Deserialize, Serialize};

/// Opaque user identifier, also used as memo owner id and token subject.
pub type UserId = String;

/// Persisted user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

impl User {
    /// Returns the caller-safe projection of this account.
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            username: self.username.clone(),
        }
    }
}

/// User view returned from registration; carries no credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: UserId,
    pub username: String,
}
