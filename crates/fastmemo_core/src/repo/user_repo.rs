//! Credential store: user persistence contracts and SQLite implementation.
//!
//! # Invariants
//! - Username uniqueness is enforced by the `users.username` UNIQUE index;
//!   a collision surfaces as `RepoError::Duplicate`, never as a raw
//!   constraint error.
//! - Lookups return `Ok(None)` for absent rows.

use crate::model::user::User;
use crate::repo::{ensure_table_ready, is_unique_violation, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT
    id,
    username,
    password_hash,
    created_at,
    updated_at
FROM users";

/// Repository interface for user accounts.
pub trait UserRepository {
    /// Inserts a new user. Fails with `Duplicate` on username collision.
    fn create_user(&self, user: &User) -> RepoResult<()>;
    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;
    fn find_by_id(&self, id: &str) -> RepoResult<Option<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "users",
            &["id", "username", "password_hash", "created_at", "updated_at"],
        )?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<()> {
        let inserted = self.conn.execute(
            "INSERT INTO users (
                id,
                username,
                password_hash,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                user.id.as_str(),
                user.username.as_str(),
                user.password_hash.as_str(),
                user.created_at,
                user.updated_at,
            ],
        );

        match inserted {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(RepoError::Duplicate {
                field: "username",
                value: user.username.clone(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE username = ?1;"),
                [username],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        password_hash: row.get("password_hash")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
