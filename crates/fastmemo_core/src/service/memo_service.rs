//! Memo use-case service.
//!
//! # Responsibility
//! - Provide owner-scoped create/list/search/get/update/delete APIs.
//! - Encode relation lists for storage and decode them for callers.
//!
//! # Invariants
//! - Every operation except create resolves the target through
//!   `find_for_owner` before acting; a memo owned by someone else is
//!   reported exactly like a missing one.
//! - Update applies only supplied fields and skips the write when nothing
//!   changes.
//! - Concurrent updates of one memo are last-writer-wins; there is no
//!   version check.

use crate::model::memo::{DeleteAck, Memo, MemoId, MemoPatch, MemoRow, NewMemo};
use crate::model::{id, now_epoch_ms};
use crate::relation;
use crate::repo::memo_repo::{MemoListQuery, MemoRepository};
use crate::repo::RepoError;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for memo use-cases.
#[derive(Debug)]
pub enum MemoServiceError {
    /// Caller input violates a documented constraint.
    Validation(String),
    /// Memo is absent or owned by another user.
    NotFound(MemoId),
    /// Persistence-layer failure.
    Storage(RepoError),
}

impl Display for MemoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "{message}"),
            Self::NotFound(id) => write!(f, "memo not found: {id}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MemoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for MemoServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

pub type MemoServiceResult<T> = Result<T, MemoServiceError>;

/// Memo service facade over repository implementations.
pub struct MemoService<R: MemoRepository> {
    repo: R,
}

impl<R: MemoRepository> MemoService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a memo owned by `owner_id`.
    ///
    /// # Errors
    /// - `Validation` when `title` is empty.
    pub fn create_memo(&self, owner_id: &str, input: NewMemo) -> MemoServiceResult<Memo> {
        validate_title(&input.title)?;

        let now = now_epoch_ms();
        let row = MemoRow {
            id: id::new_id(),
            owner_id: owner_id.to_string(),
            title: input.title,
            content: input.content,
            related_memo_ids: relation::encode(&input.related_memo_ids),
            created_at: now,
            updated_at: now,
        };
        self.repo.insert_memo(&row)?;

        info!(
            "event=memo_create module=service status=ok memo_id={} related_count={}",
            row.id,
            input.related_memo_ids.len()
        );
        Ok(row.into_memo())
    }

    /// Lists memos of `owner_id`, newest first, optionally filtered.
    ///
    /// `keyword` matches title or content as a case-insensitive substring.
    ///
    /// # Errors
    /// - `Validation` when `keyword` is present but blank.
    pub fn list_memos(&self, owner_id: &str, keyword: Option<&str>) -> MemoServiceResult<Vec<Memo>> {
        if let Some(keyword) = keyword {
            if keyword.trim().is_empty() {
                return Err(MemoServiceError::Validation(
                    "search keyword must not be empty".to_string(),
                ));
            }
        }

        let query = MemoListQuery {
            owner_id: owner_id.to_string(),
            keyword: keyword.map(str::to_string),
        };
        let rows = self.repo.list_for_owner(&query)?;
        debug!(
            "event=memo_list module=service status=ok filtered={} count={}",
            query.keyword.is_some(),
            rows.len()
        );
        Ok(rows.into_iter().map(MemoRow::into_memo).collect())
    }

    /// Explicit keyword search; a blank keyword is a validation error.
    pub fn search_memos(&self, owner_id: &str, keyword: &str) -> MemoServiceResult<Vec<Memo>> {
        self.list_memos(owner_id, Some(keyword))
    }

    /// Gets one memo owned by `owner_id`.
    pub fn get_memo(&self, owner_id: &str, memo_id: &str) -> MemoServiceResult<Memo> {
        self.find_owned(owner_id, memo_id).map(MemoRow::into_memo)
    }

    /// Applies a partial update to a memo owned by `owner_id`.
    ///
    /// # Errors
    /// - `NotFound` when the memo is absent or owned by someone else.
    /// - `Validation` when a supplied title is empty; nothing is written.
    pub fn update_memo(
        &self,
        owner_id: &str,
        memo_id: &str,
        patch: MemoPatch,
    ) -> MemoServiceResult<Memo> {
        let current = self.find_owned(owner_id, memo_id)?;
        if let Some(title) = patch.title.as_deref() {
            validate_title(title)?;
        }

        let mut next = current.clone();
        let mut changed = false;
        if let Some(title) = patch.title {
            if title != next.title {
                next.title = title;
                changed = true;
            }
        }
        if let Some(content) = patch.content {
            if content != next.content {
                next.content = content;
                changed = true;
            }
        }
        if let Some(related) = patch.related_memo_ids {
            let encoded = relation::encode(&related);
            if encoded != next.related_memo_ids {
                next.related_memo_ids = encoded;
                changed = true;
            }
        }

        if !changed {
            debug!(
                "event=memo_update module=service status=skipped memo_id={}",
                current.id
            );
            return Ok(current.into_memo());
        }

        next.updated_at = now_epoch_ms();
        self.repo.update_memo(&next)?;
        info!(
            "event=memo_update module=service status=ok memo_id={}",
            next.id
        );
        Ok(next.into_memo())
    }

    /// Permanently deletes a memo owned by `owner_id`.
    pub fn delete_memo(&self, owner_id: &str, memo_id: &str) -> MemoServiceResult<DeleteAck> {
        let owned = self.find_owned(owner_id, memo_id)?;
        self.repo.delete_memo(&owned.id)?;
        info!(
            "event=memo_delete module=service status=ok memo_id={}",
            owned.id
        );
        Ok(DeleteAck::new(owned.id))
    }

    fn find_owned(&self, owner_id: &str, memo_id: &str) -> MemoServiceResult<MemoRow> {
        self.repo
            .find_for_owner(owner_id, memo_id)?
            .ok_or_else(|| MemoServiceError::NotFound(memo_id.to_string()))
    }
}

fn validate_title(title: &str) -> MemoServiceResult<()> {
    if title.is_empty() {
        return Err(MemoServiceError::Validation(
            "title must not be empty".to_string(),
        ));
    }
    Ok(())
}
