//! Unified application error model plus the typed backend errors raised by
//! directories and authenticators. Backend errors never reach the caller directly;
//! they are classified into candidate actions (see `identity::classifier`).

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

use crate::identity::Signal;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    Auth { code: String, message: String },
    NotFound { code: String, message: String },
    Conflict { code: String, message: String },
    Config { code: String, message: String },
    Internal { code: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::Auth { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Conflict { code, .. }
            | AppError::Config { code, .. }
            | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Auth { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Conflict { message, .. }
            | AppError::Config { message, .. }
            | AppError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn auth<S: Into<String>>(code: S, msg: S) -> Self { AppError::Auth { code: code.into(), message: msg.into() } }
    pub fn not_found<S: Into<String>>(code: S, msg: S) -> Self { AppError::NotFound { code: code.into(), message: msg.into() } }
    pub fn conflict<S: Into<String>>(code: S, msg: S) -> Self { AppError::Conflict { code: code.into(), message: msg.into() } }
    pub fn config<S: Into<String>>(code: S, msg: S) -> Self { AppError::Config { code: code.into(), message: msg.into() } }
    pub fn internal<S: Into<String>>(code: S, msg: S) -> Self { AppError::Internal { code: code.into(), message: msg.into() } }

    /// The one failure every login path reports upstream, whatever went wrong
    /// underneath (wrong password, no directory reachable, ambiguous identity).
    pub fn invalid_credentials() -> Self { AppError::auth("invalid_credentials", "authentication failed") }

    /// Map to HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            AppError::Auth { .. } => 401,
            AppError::NotFound { .. } => 404,
            AppError::Conflict { .. } => 409,
            AppError::Config { .. } => 500,
            AppError::Internal { .. } => 500,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal { code: "internal_error".into(), message: err.to_string() }
    }
}

/// Failure raised by `Directory::find_user`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("directory timed out: {0}")]
    Timeout(String),
    #[error("directory communication failure: {0}")]
    Communication(String),
    #[error("directory error: {0}")]
    Generic(String),
}

impl DirectoryError {
    pub fn signal(&self) -> Signal {
        match self {
            DirectoryError::Timeout(_) => Signal::Timeout,
            DirectoryError::Communication(_) => Signal::Communication,
            DirectoryError::Generic(_) => Signal::Generic,
        }
    }
}

/// Failure raised by `Authenticator::authenticate`. A timeout is not an error
/// here; authenticators report it as `AuthOutcome::Timeout`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("authenticator communication failure: {0}")]
    Communication(String),
    #[error("password rejected: {0}")]
    PasswordAuthFailed(String),
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("authenticator error: {0}")]
    Generic(String),
}

impl AuthError {
    pub fn signal(&self) -> Signal {
        match self {
            AuthError::Communication(_) => Signal::Communication,
            AuthError::PasswordAuthFailed(_) => Signal::PasswordAuthFailed,
            AuthError::UserNotFound(_) => Signal::UserNotFound,
            AuthError::Generic(_) => Signal::Generic,
        }
    }
}

/// The only resolution failure surfaced to callers: more than one identity
/// survived org filtering, which is a data inconsistency and never auto-resolved.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("non-unique result for user '{username}': {matches} matching entries")]
    NonUnique { username: String, matches: usize },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
