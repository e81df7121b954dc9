use sea_orm::DbErr;
use thiserror::Error;

pub type AuthnResult<T> = Result<T, AuthnError>;

#[derive(Debug, Error)]
pub enum AuthnError {
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("password hash error: {0}")]
    Hash(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl AuthnError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }
}
