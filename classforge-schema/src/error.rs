//! Error types for schema reading and model building.

use thiserror::Error;

/// Error type for reading schema documents.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON syntax error.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error type for building the type model.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Two properties of one schema share a key or a field name.
    #[error("duplicate property '{key}' in schema '{schema}'")]
    DuplicateProperty {
        /// Schema name.
        schema: String,
        /// Offending property key.
        key: String,
    },

    /// A property key has no usable definition.
    #[error("missing definition for property '{key}' in schema '{schema}'")]
    MissingDefinition {
        /// Schema name.
        schema: String,
        /// Property key.
        key: String,
    },

    /// Two different object shapes resolve to the same type name.
    #[error("conflicting definitions for type '{name}'")]
    ConflictingDefinition {
        /// Computed type name.
        name: String,
    },

    /// A type contains itself.
    #[error("circular type reference detected: {path}")]
    CircularReference {
        /// Chain of type names ending in the repeated one.
        path: String,
    },

    /// The document does not have the expected shape.
    #[error("invalid schema document: {message}")]
    InvalidDocument {
        /// Error message.
        message: String,
    },

    /// An identifier normalizes to an empty name.
    #[error("identifier '{identifier}' does not produce a valid name")]
    InvalidIdentifier {
        /// Original identifier.
        identifier: String,
    },
}

impl SchemaError {
    /// Creates an invalid document error.
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }

    /// Creates a duplicate property error.
    pub fn duplicate(schema: impl Into<String>, key: impl Into<String>) -> Self {
        Self::DuplicateProperty {
            schema: schema.into(),
            key: key.into(),
        }
    }

    /// Creates a missing definition error.
    pub fn missing(schema: impl Into<String>, key: impl Into<String>) -> Self {
        Self::MissingDefinition {
            schema: schema.into(),
            key: key.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SchemaError::duplicate("Person", "age");
        assert_eq!(err.to_string(), "duplicate property 'age' in schema 'Person'");

        let err = SchemaError::missing("Person", "address");
        assert_eq!(
            err.to_string(),
            "missing definition for property 'address' in schema 'Person'"
        );

        let err = SchemaError::invalid_document("root is not an object");
        assert!(err.to_string().contains("root is not an object"));
    }

    #[test]
    fn test_parse_error_converts() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SchemaError = ParseError::from(json_err).into();
        assert!(matches!(err, SchemaError::Parse(ParseError::Json(_))));
    }
}
