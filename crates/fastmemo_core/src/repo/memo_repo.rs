//! Memo store: owner-scoped persistence contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist memos with their relation list in encoded text form.
//! - Provide owner-scoped lookup, listing and keyword filtering.
//!
//! # Invariants
//! - Every read and the update statement carry `owner_id = ?`; only the
//!   delete statement is keyed by id alone, and callers must confirm
//!   ownership through `find_for_owner` first.
//! - Listing is ordered by `created_at DESC, rowid DESC` (latest insert
//!   wins ties).
//! - Keyword matching is a case-insensitive substring match on title or
//!   content; LIKE wildcards in the keyword match literally.

use crate::model::memo::MemoRow;
use crate::repo::{ensure_table_ready, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const MEMO_SELECT_SQL: &str = "SELECT
    id,
    owner_id,
    title,
    content,
    related_memo_ids,
    created_at,
    updated_at
FROM memos";

/// Query options for owner-scoped memo listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoListQuery {
    pub owner_id: String,
    /// Optional substring filter over title and content.
    pub keyword: Option<String>,
}

/// Repository interface for memo persistence.
pub trait MemoRepository {
    fn insert_memo(&self, row: &MemoRow) -> RepoResult<()>;
    /// Gets one memo only when it belongs to `owner_id`.
    fn find_for_owner(&self, owner_id: &str, id: &str) -> RepoResult<Option<MemoRow>>;
    fn list_for_owner(&self, query: &MemoListQuery) -> RepoResult<Vec<MemoRow>>;
    /// Writes mutable fields of an existing row owned by `row.owner_id`.
    fn update_memo(&self, row: &MemoRow) -> RepoResult<()>;
    /// Removes one memo by id. Ownership must be checked beforehand.
    fn delete_memo(&self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed memo repository.
pub struct SqliteMemoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemoRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "memos",
            &[
                "id",
                "owner_id",
                "title",
                "content",
                "related_memo_ids",
                "created_at",
                "updated_at",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl MemoRepository for SqliteMemoRepository<'_> {
    fn insert_memo(&self, row: &MemoRow) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO memos (
                id,
                owner_id,
                title,
                content,
                related_memo_ids,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                row.id.as_str(),
                row.owner_id.as_str(),
                row.title.as_str(),
                row.content.as_str(),
                row.related_memo_ids.as_str(),
                row.created_at,
                row.updated_at,
            ],
        )?;
        Ok(())
    }

    fn find_for_owner(&self, owner_id: &str, id: &str) -> RepoResult<Option<MemoRow>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MEMO_SELECT_SQL}
             WHERE id = ?1
               AND owner_id = ?2;"
        ))?;
        let row = stmt
            .query_row(params![id, owner_id], |row| Ok(read_memo_row(row)))
            .optional()?;
        row.transpose()
    }

    fn list_for_owner(&self, query: &MemoListQuery) -> RepoResult<Vec<MemoRow>> {
        let mut sql = format!("{MEMO_SELECT_SQL} WHERE owner_id = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(query.owner_id.clone())];

        if let Some(keyword) = query.keyword.as_deref() {
            sql.push_str(r" AND (title LIKE ? ESCAPE '\' OR content LIKE ? ESCAPE '\')");
            let pattern = format!("%{}%", escape_like(keyword));
            bind_values.push(Value::Text(pattern.clone()));
            bind_values.push(Value::Text(pattern));
        }

        sql.push_str(" ORDER BY created_at DESC, rowid DESC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut memos = Vec::new();
        while let Some(row) = rows.next()? {
            memos.push(read_memo_row(row)?);
        }
        Ok(memos)
    }

    fn update_memo(&self, row: &MemoRow) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE memos
             SET
                title = ?1,
                content = ?2,
                related_memo_ids = ?3,
                updated_at = ?4
             WHERE id = ?5
               AND owner_id = ?6;",
            params![
                row.title.as_str(),
                row.content.as_str(),
                row.related_memo_ids.as_str(),
                row.updated_at,
                row.id.as_str(),
                row.owner_id.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(row.id.clone()));
        }
        Ok(())
    }

    fn delete_memo(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM memos WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

/// Escapes `\`, `%` and `_` so the keyword matches literally under
/// `LIKE ... ESCAPE '\'`.
pub fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for ch in keyword.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn read_memo_row(row: &Row<'_>) -> RepoResult<MemoRow> {
    let memo = MemoRow {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        related_memo_ids: row.get("related_memo_ids")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    if memo.title.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty title in memos.title for id `{}`",
            memo.id
        )));
    }
    Ok(memo)
}
