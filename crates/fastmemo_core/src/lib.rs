//! Core domain logic for fast memos.
//! This crate is the single source of truth for ownership and memo
//! invariants; request boundaries only translate in and out of it.

pub mod auth;
pub mod boundary;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod relation;
pub mod repo;
pub mod service;

pub use auth::token::{Claims, TokenService, DEFAULT_TOKEN_TTL_HOURS};
pub use auth::AuthError;
pub use boundary::{bearer_token, Classify, ErrorBody, ErrorKind};
pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::memo::{DeleteAck, Memo, MemoId, MemoPatch, MemoRow, NewMemo};
pub use model::user::{PublicUser, User, UserId};
pub use repo::memo_repo::{MemoListQuery, MemoRepository, SqliteMemoRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::account_service::{AccountError, AccountService, LoginToken};
pub use service::memo_service::{MemoService, MemoServiceError, MemoServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
