use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::FieldErrors;
use service::auth::errors::AuthError;
use service::errors::ServiceError;
use service::media::MediaError;
use thiserror::Error;
use tracing::error;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const MISSING_CREDENTIALS: &str = "Email and password are required";
pub const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";
pub const INVALID_TOKEN: &str = "Given token not valid for any token type";
pub const FORBIDDEN: &str = "You do not have permission to perform this action.";
pub const PROFILE_NOT_FOUND: &str = "Profile not found. Please complete your profile first.";

/// Errors a handler can return; each maps to one status and a JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400 with the `{field: [messages]}` map as body.
    #[error("invalid fields: {0}")]
    Fields(FieldErrors),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// Logged in full; the client only sees a generic message.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::Fields(fields) => return (StatusCode::BAD_REQUEST, Json(fields)).into_response(),
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m),
            ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::Internal(detail) => {
                error!(error = %detail, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };
        (status, Json(serde_json::json!({"error": msg}))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Invalid(fields) => ApiError::Fields(fields),
            AuthError::MissingCredentials => ApiError::BadRequest(MISSING_CREDENTIALS.into()),
            AuthError::Unauthorized => ApiError::Unauthorized(INVALID_CREDENTIALS.into()),
            AuthError::InvalidToken => ApiError::Unauthorized(INVALID_TOKEN.into()),
            AuthError::NotFound => ApiError::NotFound("User not found".into()),
            AuthError::ProfileNotFound => ApiError::NotFound(PROFILE_NOT_FOUND.into()),
            other @ (AuthError::HashError(_) | AuthError::TokenError(_) | AuthError::Repository(_)) => {
                ApiError::Internal(format!("auth error {}: {}", other.code(), other))
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(fields) => ApiError::Fields(fields),
            ServiceError::BadRequest(m) => ApiError::BadRequest(m),
            ServiceError::NotFound(m) => ApiError::NotFound(m),
            other @ (ServiceError::Db(_) | ServiceError::Model(_)) => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<MediaError> for ApiError {
    fn from(e: MediaError) -> Self {
        match e {
            MediaError::Invalid(fields) => ApiError::Fields(fields),
            MediaError::Io(e) => ApiError::Internal(format!("media write failed: {e}")),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        let cases = [
            (ApiError::Fields(FieldErrors::single("email", "bad")), StatusCode::BAD_REQUEST),
            (ApiError::from(AuthError::MissingCredentials), StatusCode::BAD_REQUEST),
            (ApiError::from(AuthError::Unauthorized), StatusCode::UNAUTHORIZED),
            (ApiError::from(AuthError::ProfileNotFound), StatusCode::NOT_FOUND),
            (ApiError::from(AuthError::Repository("boom".into())), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::from(ServiceError::BadRequest("Invalid status".into())), StatusCode::BAD_REQUEST),
            (ApiError::from(ServiceError::Db("down".into())), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::Forbidden(FORBIDDEN.into()), StatusCode::FORBIDDEN),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
