//! Authentication error types.

use axum::http::StatusCode;
use thiserror::Error;

use super::token::TokenError;
use crate::db::StoreError;
use crate::gateway::types::ApiError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("invalid login credential")]
    InvalidCredentials,

    #[error("insert a valid secret code")]
    InvalidSecretCode,

    #[error("username already exists")]
    UsernameTaken,

    #[error("email already exists")]
    EmailTaken,

    #[error("username or email already exists")]
    DuplicateUser,

    #[error(
        "An admin access request for this Telegram ID has already been submitted and is pending review."
    )]
    RequestPending,

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Password hashing error: {0}")]
    Hash(bcrypt::BcryptError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidSecretCode => "INVALID_SECRET_CODE",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::DuplicateUser => "DUPLICATE_USER",
            Self::RequestPending => "REQUEST_PENDING",
            Self::Token(_) => "TOKEN_ERROR",
            Self::Hash(_) => "HASH_ERROR",
            Self::Store(_) => "STORE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::InvalidSecretCode => StatusCode::BAD_REQUEST,
            Self::UsernameTaken | Self::EmailTaken | Self::DuplicateUser | Self::RequestPending => {
                StatusCode::CONFLICT
            }
            Self::Token(_) | Self::Hash(_) | Self::Store(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = err.http_status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            ApiError::internal(format!("[{}] {}", err.code(), err))
        } else {
            ApiError::new(status, err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status() {
        assert_eq!(AuthError::InvalidCredentials.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::UsernameTaken.http_status(), StatusCode::CONFLICT);
        assert_eq!(AuthError::RequestPending.http_status(), StatusCode::CONFLICT);
        assert_eq!(AuthError::InvalidSecretCode.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AuthError::Store(StoreError::Timeout).http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_errors_do_not_leak() {
        let api: ApiError = AuthError::Internal("pool exhausted on 10.0.0.3".to_string()).into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, "internal server error");
    }

    #[test]
    fn test_conflict_message_passes_through() {
        let api: ApiError = AuthError::EmailTaken.into();
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert_eq!(api.message, "email already exists");
    }
}
