//! Memo model: stored row shape, presentation record and request inputs.
//!
//! # Responsibility
//! - Separate the persisted shape (`MemoRow`, relations encoded as one text
//!   field) from the caller-facing shape (`Memo`, relations as a list).
//! - Express partial updates with explicit per-field presence.
//!
//! # Invariants
//! - `title` is non-empty for every stored memo.
//! - `owner_id` is fixed at creation.

use crate::model::user::UserId;
use crate::relation;
use serde::{Deserialize, Serialize};

/// Opaque memo identifier.
pub type MemoId = String;

/// Memo as stored: the relation list is kept in its encoded text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoRow {
    pub id: MemoId,
    pub owner_id: UserId,
    pub title: String,
    pub content: String,
    /// Comma-joined related memo ids, see [`crate::relation`].
    pub related_memo_ids: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

impl MemoRow {
    /// Decodes the relation field into the caller-facing record.
    pub fn into_memo(self) -> Memo {
        let related_memo_ids = relation::decode(&self.related_memo_ids);
        Memo {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            content: self.content,
            related_memo_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Memo as returned to callers, with relations decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    pub id: MemoId,
    pub owner_id: UserId,
    pub title: String,
    pub content: String,
    pub related_memo_ids: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for memo creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMemo {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub related_memo_ids: Vec<String>,
}

/// Partial update input.
///
/// `None` means "leave unchanged". `Some(vec![])` for relations means
/// "clear relations", which is different from omitting the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_memo_ids: Option<Vec<String>>,
}

impl MemoPatch {
    /// Returns whether no field was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.related_memo_ids.is_none()
    }
}

/// Acknowledgment returned by a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    pub id: MemoId,
    pub message: String,
}

impl DeleteAck {
    pub fn new(id: MemoId) -> Self {
        let message = format!("memo {id} deleted");
        Self { id, message }
    }
}
