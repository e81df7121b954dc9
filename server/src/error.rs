use platform_api::ApiError;
use platform_authn::AuthnError;
use products_hr::HrError;

pub(crate) fn hr_error(err: HrError) -> ApiError {
    match err {
        HrError::Validation { field, message } => ApiError::validation(field, message),
        HrError::NotFound { .. } => ApiError::NotFound(err.to_string()),
        HrError::InvalidState(message) => ApiError::InvalidState(message),
        HrError::Database(db) => ApiError::internal(db.into()),
    }
}

pub(crate) fn authn_error(err: AuthnError) -> ApiError {
    match err {
        AuthnError::Validation { field, message } => ApiError::validation(field, message),
        AuthnError::Conflict(message) => ApiError::Conflict(message),
        AuthnError::Unauthorized(message) => ApiError::Unauthorized(message),
        other => ApiError::internal(other.into()),
    }
}
