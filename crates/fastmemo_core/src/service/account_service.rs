//! Account use-case service: registration, login and token checks.
//!
//! # Invariants
//! - Passwords are stored only as argon2id hashes.
//! - Login never reveals whether the username or the password was wrong.

use crate::auth::password::{hash_password, verify_password, PasswordHashError};
use crate::auth::token::TokenService;
use crate::auth::AuthError;
use crate::boundary::bearer_token;
use crate::model::user::{PublicUser, User, UserId};
use crate::model::{id, now_epoch_ms};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const USERNAME_MIN_CHARS: usize = 3;
pub const PASSWORD_MIN_CHARS: usize = 6;

/// Service error for account use-cases.
#[derive(Debug)]
pub enum AccountError {
    Validation(String),
    /// Username already registered.
    Duplicate(String),
    Auth(AuthError),
    Hash(PasswordHashError),
    Storage(RepoError),
}

impl Display for AccountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "{message}"),
            Self::Duplicate(username) => write!(f, "username `{username}` is already taken"),
            Self::Auth(err) => write!(f, "{err}"),
            Self::Hash(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AccountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Auth(err) => Some(err),
            Self::Hash(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AccountError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Duplicate { value, .. } => Self::Duplicate(value),
            other => Self::Storage(other),
        }
    }
}

impl From<AuthError> for AccountError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<PasswordHashError> for AccountError {
    fn from(value: PasswordHashError) -> Self {
        Self::Hash(value)
    }
}

/// Successful login payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginToken {
    pub token: String,
}

/// Account service over a user repository and a token service.
pub struct AccountService<U: UserRepository> {
    users: U,
    tokens: TokenService,
}

impl<U: UserRepository> AccountService<U> {
    pub fn new(users: U, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// Registers a new user.
    ///
    /// # Errors
    /// - `Validation` when the username has fewer than 3 characters or the
    ///   password fewer than 6.
    /// - `Duplicate` when the username is already registered.
    pub fn register(&self, username: &str, password: &str) -> Result<PublicUser, AccountError> {
        if username.chars().count() < USERNAME_MIN_CHARS {
            return Err(AccountError::Validation(format!(
                "username must be at least {USERNAME_MIN_CHARS} characters long"
            )));
        }
        if password.chars().count() < PASSWORD_MIN_CHARS {
            return Err(AccountError::Validation(format!(
                "password must be at least {PASSWORD_MIN_CHARS} characters long"
            )));
        }

        let now = now_epoch_ms();
        let user = User {
            id: id::new_id(),
            username: username.to_string(),
            password_hash: hash_password(password)?,
            created_at: now,
            updated_at: now,
        };
        self.users.create_user(&user)?;

        info!(
            "event=user_register module=service status=ok user_id={}",
            user.id
        );
        Ok(user.to_public())
    }

    /// Verifies credentials and issues a bearer token.
    pub fn login(&self, username: &str, password: &str) -> Result<LoginToken, AccountError> {
        let Some(user) = self.users.find_by_username(username)? else {
            warn!("event=user_login module=service status=error error_code=invalid_credentials");
            return Err(AuthError::InvalidCredentials.into());
        };
        if !verify_password(password, &user.password_hash) {
            warn!(
                "event=user_login module=service status=error user_id={} error_code=invalid_credentials",
                user.id
            );
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self.tokens.issue(&user.id)?;
        info!(
            "event=user_login module=service status=ok user_id={}",
            user.id
        );
        Ok(LoginToken { token })
    }

    /// Validates a raw bearer token and returns the caller's user id.
    pub fn authenticate(&self, token: &str) -> Result<UserId, AuthError> {
        self.tokens.validate(token)
    }

    /// Validates an `Authorization` header value (`Bearer <token>`).
    pub fn authenticate_header(&self, header: Option<&str>) -> Result<UserId, AuthError> {
        self.authenticate(bearer_token(header)?)
    }
}
