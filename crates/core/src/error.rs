use std::collections::BTreeMap;

use crate::types::DbId;

/// Per-field validation messages, keyed by the form field name.
///
/// A `BTreeMap` keeps the serialized order stable for clients and tests.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Validation failed for fields: {}", field_names(.0))]
    FieldValidation(FieldErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn field_names(fields: &FieldErrors) -> String {
    fields.keys().cloned().collect::<Vec<_>>().join(", ")
}

/// Collects field-level errors while validating a form.
///
/// Validation keeps going after the first failure so the caller can show
/// every problem at once.
#[derive(Debug, Default)]
pub struct FieldErrorCollector {
    errors: FieldErrors,
}

impl FieldErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`. The first error per field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    /// Record the error from `result`, if any, and pass the value through.
    pub fn check<T>(&mut self, field: &str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.add(field, message);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(())` when nothing was recorded, otherwise a `FieldValidation` error.
    pub fn finish(self) -> Result<(), CoreError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::FieldValidation(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn collector_keeps_first_error_per_field() {
        let mut errors = FieldErrorCollector::new();
        errors.add("phone", "Phone is required");
        errors.add("phone", "Phone must be 10 digits");
        errors.add("name", "Name is required");

        let err = errors.finish().unwrap_err();
        assert_matches!(&err, CoreError::FieldValidation(fields) => {
            assert_eq!(fields.len(), 2);
            assert_eq!(fields["phone"], "Phone is required");
        });
        assert_eq!(err.to_string(), "Validation failed for fields: name, phone");
    }

    #[test]
    fn empty_collector_finishes_ok() {
        assert!(FieldErrorCollector::new().finish().is_ok());
    }
}
