//! Identifier generation shared by users and memos.

use uuid::Uuid;

/// Generates a fresh globally unique identifier.
///
/// Format: 32 lowercase hex characters (128 random bits from UUID v4,
/// without hyphens).
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}
