//! Error types for the field registry

use thiserror::Error;

/// Result type for field registry operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur in field registry operations
#[derive(Debug, Error)]
pub enum FieldsError {
    /// The field-type catalog has no representation registered under this tag
    #[error("unknown field type: {type_name}")]
    UnknownFieldType { type_name: String },

    /// Field not found by name
    #[error("field not found: {name}")]
    FieldNotFound { name: String },

    /// Duplicate field or type name
    #[error("duplicate name: {name}")]
    DuplicateFieldName { name: String },

    /// A configurator rejected the field it was applied to
    #[error("configuration error on field '{field}': {message}")]
    Configuration { field: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl FieldsError {
    /// Build a configuration error for `field`.
    pub fn configuration(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.into(),
            message: message.into(),
        }
    }
}
