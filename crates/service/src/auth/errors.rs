use models::errors::{FieldErrors, ModelError};
use thiserror::Error;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Invalid(FieldErrors),
    #[error("email and password are required")]
    MissingCredentials,
    #[error("invalid credentials")]
    Unauthorized,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("user not found")]
    NotFound,
    #[error("profile not found")]
    ProfileNotFound,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Invalid(_) => 1001,
            AuthError::MissingCredentials => 1002,
            AuthError::NotFound => 1003,
            AuthError::Unauthorized => 1004,
            AuthError::InvalidToken => 1005,
            AuthError::ProfileNotFound => 1006,
            AuthError::HashError(_) => 1101,
            AuthError::TokenError(_) => 1102,
            AuthError::Repository(_) => 1200,
        }
    }

    pub fn field(field: &str, message: impl Into<String>) -> Self {
        AuthError::Invalid(FieldErrors::single(field, message))
    }
}

impl From<FieldErrors> for AuthError {
    fn from(e: FieldErrors) -> Self { AuthError::Invalid(e) }
}

impl From<ModelError> for AuthError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Invalid(fields) => AuthError::Invalid(fields),
            other => AuthError::Repository(other.to_string()),
        }
    }
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(e: sea_orm::DbErr) -> Self { AuthError::from(ModelError::from(e)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let all = [
            AuthError::Invalid(FieldErrors::new()),
            AuthError::MissingCredentials,
            AuthError::Unauthorized,
            AuthError::InvalidToken,
            AuthError::NotFound,
            AuthError::ProfileNotFound,
            AuthError::HashError(String::new()),
            AuthError::TokenError(String::new()),
            AuthError::Repository(String::new()),
        ];
        let mut codes: Vec<u16> = all.iter().map(AuthError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn model_field_errors_stay_field_errors() {
        let e: AuthError = ModelError::Invalid(FieldErrors::single("email", "taken")).into();
        assert!(matches!(e, AuthError::Invalid(f) if f.contains("email")));
    }
}
