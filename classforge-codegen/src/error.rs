//! Error types for code generation.

use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Schema parse error.
    #[error("schema parse error: {0}")]
    Parse(#[from] classforge_schema::ParseError),

    /// Schema error.
    #[error("schema error: {0}")]
    Schema(#[from] classforge_schema::SchemaError),

    /// Class-file encoding error.
    #[error("class file error: {0}")]
    ClassFile(#[from] classforge_core::Error),

    /// A property refers to a type that is not part of the model.
    #[error("unknown type '{type_name}' in field '{field}'")]
    UnknownType {
        /// Type name.
        type_name: String,
        /// Field name.
        field: String,
    },

    /// An accessor would clash with a generated method.
    #[error("accessor '{name}{descriptor}' clashes with a generated method")]
    ReservedMember {
        /// Method name.
        name: String,
        /// Method descriptor.
        descriptor: String,
    },

    /// The package prefix is not a valid dotted name.
    #[error("invalid package name '{package}'")]
    InvalidPackage {
        /// Package name.
        package: String,
    },

    /// The original-key annotation is not a class descriptor.
    #[error("invalid annotation descriptor '{descriptor}', expected the form 'Lpkg/Name;'")]
    InvalidAnnotation {
        /// Descriptor.
        descriptor: String,
    },

    /// Code generation error.
    #[error("generation error: {message}")]
    Generation {
        /// Error message.
        message: String,
    },
}

impl CodegenError {
    /// Creates a generation error with the given message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }
}
