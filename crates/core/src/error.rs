use serde::Serialize;

use crate::types::DbId;

/// A validation failure attached to a single request field.
///
/// Serialized as `{ "error_field": "...", "error_msg": "..." }` inside the
/// `fields` array of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub error_field: String,
    pub error_msg: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            error_field: field.into(),
            error_msg: msg.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Validation failure with per-field messages.
    #[error("Validation failed on {} field(s)", .0.len())]
    FieldValidation(Vec<FieldError>),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a single-field validation failure.
    pub fn field(field: impl Into<String>, msg: impl Into<String>) -> Self {
        CoreError::FieldValidation(vec![FieldError::new(field, msg)])
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let msg = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid ({})", e.code));
                    FieldError::new(field.to_string(), msg)
                })
            })
            .collect();
        fields.sort_by(|a, b| a.error_field.cmp(&b.error_field));
        CoreError::FieldValidation(fields)
    }
}
