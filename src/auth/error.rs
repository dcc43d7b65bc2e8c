use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

/// Failures the credential store can hand back to callers. Conflicts and
/// unknown identifiers are expected conditions, not faults; nothing here is
/// retried and storage errors propagate unchanged.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required field is missing/empty, or otherwise unusable.
    #[error("validation error: {0}")]
    Validation(&'static str),

    /// The storage layer's uniqueness constraint rejected the write.
    #[error("{0} is already taken")]
    Duplicate(&'static str),

    /// No user record matches the given identifier.
    #[error("no user matches the given identifier")]
    NotFound,

    /// Hashing failed or a stored hash does not parse. Kept distinct from a
    /// plain password mismatch: a hash that will not parse is corrupt data.
    #[error("password hash error: {0}")]
    BadHash(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Duplicate(_) => StatusCode::CONFLICT,
            AuthError::NotFound => StatusCode::UNAUTHORIZED,
            AuthError::BadHash(_) | AuthError::Internal(_) | AuthError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            AuthError::Storage(e) => error!(error = %e, "storage error"),
            AuthError::BadHash(e) => error!(error = %e, "password hash error"),
            AuthError::Internal(e) => error!(error = %e, "internal error"),
            other => warn!(error = %other, "request rejected"),
        }

        // Unknown identifiers render like a wrong password so the login route
        // does not reveal which accounts exist.
        let body = match self {
            AuthError::NotFound => "Invalid credentials".to_string(),
            AuthError::BadHash(_) | AuthError::Internal(_) | AuthError::Storage(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, body).into_response()
    }
}
