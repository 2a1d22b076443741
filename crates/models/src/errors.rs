use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("invalid fields: {0}")]
    Invalid(FieldErrors),
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
}

impl From<sea_orm::DbErr> for ModelError {
    fn from(e: sea_orm::DbErr) -> Self {
        match e.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(msg)) => ModelError::Conflict(msg),
            _ => ModelError::Db(e.to_string()),
        }
    }
}

impl ModelError {
    /// For a unique violation, whether the offending constraint mentions `column`.
    pub fn conflicts_on(&self, column: &str) -> bool {
        matches!(self, ModelError::Conflict(msg) if msg.contains(column))
    }
}

/// Field-keyed validation messages, serialized as `{"field": ["message", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self { Self::default() }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errs = Self::new();
        errs.add(field, message);
        errs
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn contains(&self, field: &str) -> bool { self.0.contains_key(field) }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(value)` when no errors were collected.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first { f.write_str("; ")?; }
            first = false;
            write!(f, "{}: {}", field, messages.join(" "))?;
        }
        Ok(())
    }
}

impl From<FieldErrors> for ModelError {
    fn from(errs: FieldErrors) -> Self { ModelError::Invalid(errs) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_field_map() {
        let mut errs = FieldErrors::single("email", "This field is required.");
        errs.add("email", "Enter a valid email address.");
        errs.add("password", "This field is required.");
        let v = serde_json::to_value(&errs).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "email": ["This field is required.", "Enter a valid email address."],
                "password": ["This field is required."]
            })
        );
    }

    #[test]
    fn into_result_respects_emptiness() {
        assert_eq!(FieldErrors::new().into_result(5), Ok(5));
        assert!(FieldErrors::single("x", "bad").into_result(5).is_err());
    }
}
